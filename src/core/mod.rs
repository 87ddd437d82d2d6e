pub mod checker;
pub mod detector;
pub mod extractor;
pub mod query;
pub mod registry;
pub mod reporter;
pub mod state;

pub use checker::{Checker, RunOutcome};
pub use detector::{CheckResult, Digest};
pub use registry::{Expectation, ExtractionRule, Source, SourceRegistry};
pub use state::{JsonStateStore, StateRecord, StateStore};
