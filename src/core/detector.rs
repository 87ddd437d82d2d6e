use serde::{Deserialize, Serialize};

use crate::core::registry::{Expectation, Source};

/// Outcome of checking one source during one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    pub source_id: String,
    pub fetched_count: u64,
    pub expected_count: Option<u64>,
    pub changed: bool,
}

impl CheckResult {
    /// The value the state store should hold for this source after the run,
    /// or `None` when it must not be touched.
    pub fn state_update(&self, expectation: Expectation) -> Option<u64> {
        match expectation {
            Expectation::FixedBaseline(_) => None,
            Expectation::Dynamic => match self.expected_count {
                None => Some(self.fetched_count),
                Some(_) if self.changed => Some(self.fetched_count),
                Some(_) => None,
            },
        }
    }
}

/// Compares a fresh count with the source's expectation. `prior` is the
/// remembered count and is only consulted in dynamic mode.
pub fn evaluate(source: &Source, fetched_count: u64, prior: Option<u64>) -> CheckResult {
    let (expected_count, changed) = match source.expectation {
        Expectation::FixedBaseline(expected) => (Some(expected), fetched_count != expected),
        // First sighting only seeds the state
        Expectation::Dynamic => match prior {
            None => (None, false),
            Some(prior) => (Some(prior), fetched_count != prior),
        },
    };

    CheckResult {
        source_id: source.id.clone(),
        fetched_count,
        expected_count,
        changed,
    }
}

/// Human-readable line for a changed source.
pub fn alert_line(source: &Source, result: &CheckResult) -> String {
    let expected = result
        .expected_count
        .map_or_else(|| "nothing".to_string(), |count| count.to_string());
    format!(
        "{}: found {} {} results, expected {} in {}",
        source.id,
        result.fetched_count,
        source.rule.kind(),
        expected,
        source.location
    )
}

/// Ordered alert lines for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    lines: Vec<String>,
}

impl Digest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full notification body, headed by `subject`.
    pub fn body(&self, subject: &str) -> String {
        format!(
            "{}\n\nWe found the following results:\n{}",
            subject,
            self.lines.join("\n")
        )
    }
}
