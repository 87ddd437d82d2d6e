use regex::RegexBuilder;
use scraper::{Html, Selector};

use crate::core::query;
use crate::core::registry::{ExtractionRule, Source};
use crate::utils::error::{AppError, Result};

/// Counts what `source`'s rule matches in `document`.
pub fn extract(source: &Source, document: &str) -> Result<u64> {
    let count = match &source.rule {
        ExtractionRule::StructuralQuery { query } => count_nodes(document, query),
        ExtractionRule::PatternMatch {
            pattern,
            case_insensitive,
        } => count_matches(document, pattern, *case_insensitive),
    }
    .map_err(|message| AppError::Extraction {
        source_id: source.id.clone(),
        message,
    })?;

    Ok(count as u64)
}

/// Parses `document` leniently as HTML and counts the nodes matched by `query`.
pub fn count_nodes(document: &str, query: &str) -> std::result::Result<usize, String> {
    let css = query::to_css_selector(query)
        .map_err(|e| format!("invalid query '{}': {}", query, e))?;
    let selector =
        Selector::parse(&css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))?;

    let document = Html::parse_document(document);
    Ok(document.select(&selector).count())
}

/// Counts non-overlapping matches of `pattern` in the raw text.
pub fn count_matches(
    text: &str,
    pattern: &str,
    case_insensitive: bool,
) -> std::result::Result<usize, String> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;

    Ok(regex.find_iter(text).count())
}
