// Shared helpers for end-to-end check runs against a local HTTP server.

pub mod check_run_tests;
pub mod failure_report_tests;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uatu_stockcheck::config::FetchConfig;
use uatu_stockcheck::core::{JsonStateStore, Source};
use uatu_stockcheck::plugins::Notifier;
use uatu_stockcheck::{Checker, HttpFetcher, SourceRegistry};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str) -> uatu_stockcheck::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn listing_page(products: usize) -> String {
    let rows: String = (0..products)
        .map(|i| format!(r#"<div class="product_row">Redbreast {}</div>"#, i))
        .collect();
    format!("<html><body><h1>Search</h1>{}</body></html>", rows)
}

pub async fn serve_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub struct TestEnv {
    pub dir: TempDir,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    pub fn checker(&self, sources: Vec<Source>) -> Checker {
        let fetcher = HttpFetcher::new(&FetchConfig {
            timeout_secs: 5,
            user_agent: "UatuStockcheck-Test/1.0".to_string(),
        })
        .unwrap();

        Checker::new(
            SourceRegistry::new(sources).unwrap(),
            Arc::new(fetcher),
            self.notifier.clone(),
            Arc::new(JsonStateStore::new(self.state_path().to_string_lossy())),
        )
    }
}
