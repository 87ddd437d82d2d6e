pub mod config;
pub mod core;
pub mod fetcher;
pub mod plugins;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::core::{Checker, RunOutcome, SourceRegistry};
pub use crate::core::reporter::FailureReporter;
pub use fetcher::HttpFetcher;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
