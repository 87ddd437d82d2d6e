use async_trait::async_trait;

use crate::utils::error::Result;

/// Trait for implementing notification methods (email, log, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message. Failures surface as [`AppError::Notify`](crate::AppError::Notify).
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
