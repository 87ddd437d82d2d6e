pub mod fetcher;
pub mod notifier;

pub use fetcher::Fetcher;
pub use notifier::Notifier;
