use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

use crate::plugins::traits::Notifier;
use crate::utils::error::{AppError, Result};

pub const DEFAULT_FAILURE_SUBJECT: &str = "STOCK CHECK ERROR";
pub const FAILURE_MESSAGE: &str = "The stock checker has crashed and needs fixing.";

/// Sends a "the checker itself is broken" alert when a run fails.
pub struct FailureReporter {
    notifier: Arc<dyn Notifier>,
    subject: String,
}

impl FailureReporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            subject: DEFAULT_FAILURE_SUBJECT.to_string(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Awaits `run`. On failure the alert is sent best-effort and the
    /// original error is returned unchanged.
    pub async fn watch<T, F>(&self, run: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match run.await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!("Check run failed: {}", err);
                self.report(&err).await;
                Err(err)
            }
        }
    }

    async fn report(&self, err: &AppError) {
        let body = format!("{}\n\n{}", FAILURE_MESSAGE, err);
        if let Err(send_err) = self.notifier.send(&self.subject, &body).await {
            warn!("Failed to send failure notification: {}", send_err);
        }
    }
}
