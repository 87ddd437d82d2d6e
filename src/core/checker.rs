use std::sync::Arc;
use tracing::{debug, info};

use crate::core::detector::{self, CheckResult, Digest};
use crate::core::extractor;
use crate::core::registry::SourceRegistry;
use crate::core::state::StateStore;
use crate::plugins::traits::{Fetcher, Notifier};
use crate::utils::error::Result;

pub const DEFAULT_SUBJECT: &str = "STOCK ALERT!";

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No source changed; nothing was sent.
    Unchanged { results: Vec<CheckResult> },
    /// At least one source changed and the digest was sent.
    Alerted {
        results: Vec<CheckResult>,
        digest: Digest,
    },
}

impl RunOutcome {
    pub fn results(&self) -> &[CheckResult] {
        match self {
            RunOutcome::Unchanged { results } | RunOutcome::Alerted { results, .. } => results,
        }
    }

    pub fn digest(&self) -> Option<&Digest> {
        match self {
            RunOutcome::Unchanged { .. } => None,
            RunOutcome::Alerted { digest, .. } => Some(digest),
        }
    }
}

/// Runs every source in the registry once, in order.
pub struct Checker {
    registry: SourceRegistry,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn StateStore>,
    subject: String,
}

impl Checker {
    pub fn new(
        registry: SourceRegistry,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            notifier,
            store,
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Performs one check run.
    ///
    /// Any fetch, extraction, state or notification failure aborts the run
    /// immediately; later sources are not fetched.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut state = self.store.load()?;
        let mut digest = Digest::new();
        let mut results = Vec::with_capacity(self.registry.len());
        let mut dirty = false;

        for source in &self.registry {
            info!("Looking in {}...", source.id);

            let document = self.fetcher.fetch(&source.location).await?;
            let count = extractor::extract(source, &document)?;
            let result = detector::evaluate(source, count, state.get(&source.id));
            debug!(
                "{}: found {}, expected {:?}, changed {}",
                source.id, result.fetched_count, result.expected_count, result.changed
            );

            if result.changed {
                digest.push(detector::alert_line(source, &result));
            }
            if let Some(count) = result.state_update(source.expectation) {
                state.set(source.id.clone(), count);
                dirty = true;
            }
            results.push(result);
        }

        let outcome = if digest.is_empty() {
            info!("Nothing has changed");
            RunOutcome::Unchanged { results }
        } else {
            info!("{} source(s) changed, sending digest", digest.len());
            self.notifier
                .send(&self.subject, &digest.body(&self.subject))
                .await?;
            RunOutcome::Alerted { results, digest }
        };

        // Only dynamic sources that changed or were seen for the first time
        // produce updates; fixed baselines never touch the store.
        if dirty {
            self.store.save(&state)?;
        }

        Ok(outcome)
    }
}
