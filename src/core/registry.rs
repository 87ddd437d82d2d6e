use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{ExpectedSetting, SourceConfig};
use crate::utils::error::{AppError, Result};

/// How a fetched document is turned into a count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionRule {
    /// Count of nodes matched by a CSS selector or XPath-style query.
    StructuralQuery { query: String },
    /// Count of non-overlapping regex matches over the raw text.
    PatternMatch {
        pattern: String,
        case_insensitive: bool,
    },
}

impl ExtractionRule {
    /// Short label used in alert lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionRule::StructuralQuery { .. } => "query",
            ExtractionRule::PatternMatch { .. } => "pattern",
        }
    }
}

/// What a fresh count is compared against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    FixedBaseline(u64),
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub location: String,
    pub rule: ExtractionRule,
    pub expectation: Expectation,
}

impl Source {
    pub fn new(
        id: impl Into<String>,
        location: impl Into<String>,
        rule: ExtractionRule,
        expectation: Expectation,
    ) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            rule,
            expectation,
        }
    }
}

impl TryFrom<&SourceConfig> for Source {
    type Error = AppError;

    fn try_from(config: &SourceConfig) -> Result<Self> {
        // Unnamed sources fall back to their URL as identity
        let id = config
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| config.url.clone());

        let rule = match (&config.query, &config.pattern) {
            (Some(query), None) => ExtractionRule::StructuralQuery {
                query: query.clone(),
            },
            (None, Some(pattern)) => ExtractionRule::PatternMatch {
                pattern: pattern.clone(),
                case_insensitive: config.case_insensitive,
            },
            (Some(_), Some(_)) => {
                return Err(AppError::Registry(format!(
                    "source '{}' sets both query and pattern",
                    id
                )));
            }
            (None, None) => {
                return Err(AppError::Registry(format!(
                    "source '{}' needs either a query or a pattern",
                    id
                )));
            }
        };

        let expectation = match &config.expected {
            ExpectedSetting::Count(count) => Expectation::FixedBaseline(*count),
            ExpectedSetting::Keyword(word) if word.eq_ignore_ascii_case("dynamic") => {
                Expectation::Dynamic
            }
            ExpectedSetting::Keyword(word) => {
                return Err(AppError::Registry(format!(
                    "source '{}' has unknown expectation '{}'",
                    id, word
                )));
            }
        };

        Ok(Source::new(id, config.url.clone(), rule, expectation))
    }
}

/// Ordered, immutable set of sources. Identities are unique.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Source>) -> Result<Self> {
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.id.as_str()) {
                return Err(AppError::Registry(format!(
                    "duplicate source identity '{}'",
                    source.id
                )));
            }
        }
        Ok(Self { sources })
    }

    pub fn from_config(configs: &[SourceConfig]) -> Result<Self> {
        let sources = configs
            .iter()
            .map(Source::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(sources)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.id == id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
