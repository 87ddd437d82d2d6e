use super::*;
use std::collections::HashMap;
use uatu_stockcheck::core::{Expectation, ExtractionRule};
use uatu_stockcheck::{AppConfig, RunOutcome};

fn read_state(env: &TestEnv) -> HashMap<String, u64> {
    let data = std::fs::read_to_string(env.state_path()).unwrap();
    serde_json::from_str(&data).unwrap()
}

fn row_query() -> ExtractionRule {
    ExtractionRule::StructuralQuery {
        query: r#"//div[@class="product_row"]"#.to_string(),
    }
}

#[tokio::test]
async fn test_fixed_baseline_scenario() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/search", listing_page(5)).await;

    let env = TestEnv::new();
    let location = format!("{}/search", server.uri());
    let checker = env.checker(vec![Source::new(
        "Blackwell",
        location.clone(),
        row_query(),
        Expectation::FixedBaseline(6),
    )]);

    let outcome = checker.run().await?;
    let digest = outcome.digest().expect("mismatch should alert");
    assert_eq!(digest.len(), 1);

    let line = &digest.lines()[0];
    assert!(line.contains("found 5"));
    assert!(line.contains("expected 6"));
    assert!(line.contains(&location));

    let messages = env.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains(line.as_str()));

    // Fixed baselines never touch the state file
    assert!(!env.state_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_dynamic_source_lifecycle() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/new", "Redbreast 12, REDBREAST 15".to_string()).await;

    let env = TestEnv::new();
    let sources = || {
        vec![Source::new(
            "K&L - New Product Page",
            format!("{}/new", server.uri()),
            ExtractionRule::PatternMatch {
                pattern: "redbreast".to_string(),
                case_insensitive: true,
            },
            Expectation::Dynamic,
        )]
    };

    // First run seeds without alerting
    let outcome = env.checker(sources()).run().await?;
    assert!(matches!(outcome, RunOutcome::Unchanged { .. }));
    assert!(env.notifier.messages().is_empty());
    assert_eq!(read_state(&env)["K&L - New Product Page"], 2);

    // Same count again: silent, state untouched
    let before = std::fs::read(env.state_path())?;
    let outcome = env.checker(sources()).run().await?;
    assert!(matches!(outcome, RunOutcome::Unchanged { .. }));
    assert!(env.notifier.messages().is_empty());
    assert_eq!(std::fs::read(env.state_path())?, before);

    // Page changes: one alert, state follows
    server.reset().await;
    serve_page(&server, "/new", "redbreast redbreast Redbreast".to_string()).await;

    let outcome = env.checker(sources()).run().await?;
    assert!(matches!(outcome, RunOutcome::Alerted { .. }));
    let messages = env.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains("found 3 pattern results, expected 2"));
    assert_eq!(read_state(&env)["K&L - New Product Page"], 3);

    // And it does not alert twice for the same transition
    env.checker(sources()).run().await?;
    assert_eq!(env.notifier.messages().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_digest_follows_registry_order() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/a", listing_page(1)).await;
    serve_page(&server, "/b", listing_page(2)).await;
    serve_page(&server, "/c", listing_page(3)).await;

    let env = TestEnv::new();
    std::fs::write(env.state_path(), r#"{"zeta": 0, "alpha": 3, "untracked": 11}"#)?;

    let checker = env.checker(vec![
        Source::new("zeta", format!("{}/a", server.uri()), row_query(), Expectation::Dynamic),
        Source::new("mid", format!("{}/b", server.uri()), row_query(), Expectation::FixedBaseline(0)),
        Source::new("alpha", format!("{}/c", server.uri()), row_query(), Expectation::Dynamic),
    ]);

    let outcome = checker.run().await?;
    let lines = outcome.digest().unwrap().lines().to_vec();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("zeta:"));
    assert!(lines[1].starts_with("mid:"));

    let state = read_state(&env);
    assert_eq!(state["zeta"], 1);
    assert_eq!(state["alpha"], 3);
    assert_eq!(state["untracked"], 11);
    assert!(!state.contains_key("mid"));
    Ok(())
}

#[tokio::test]
async fn test_registry_from_config_file() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/products",
        r#"<div class="tf-product-description x">1</div><div class="tf-product-description">2</div>"#
            .to_string(),
    )
    .await;

    let config = AppConfig::from_toml_str(&format!(
        r#"
        [[sources]]
        name = "K&L - Redbreast Product Search"
        url = "{}/products"
        query = '//div[contains(@class, "tf-product-description")]'
        expected = 2
        "#,
        server.uri()
    ))?;

    let registry = SourceRegistry::from_config(&config.sources)?;
    let env = TestEnv::new();
    let sources: Vec<Source> = registry.iter().cloned().collect();

    let outcome = env.checker(sources).run().await?;
    assert!(matches!(outcome, RunOutcome::Unchanged { .. }));
    assert_eq!(outcome.results()[0].fetched_count, 2);
    Ok(())
}
