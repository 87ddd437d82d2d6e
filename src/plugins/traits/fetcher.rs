use async_trait::async_trait;

use crate::utils::error::Result;

/// Retrieves the document behind a source location.
///
/// Any transport failure or non-success status must surface as
/// [`AppError::Fetch`](crate::AppError::Fetch).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}
