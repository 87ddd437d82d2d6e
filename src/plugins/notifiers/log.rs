use async_trait::async_trait;

use crate::plugins::traits::Notifier;
use crate::utils::error::Result;

/// Writes notifications to the log instead of delivering them. Used for dry runs.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        LogNotifier
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        tracing::info!(subject, "Dry run, not sending:\n{}", body);
        Ok(())
    }
}
