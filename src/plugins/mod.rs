pub mod traits;
pub mod notifiers;

pub use traits::{Fetcher, Notifier};
pub use notifiers::{EmailNotifier, LogNotifier};
