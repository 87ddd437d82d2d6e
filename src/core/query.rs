//! Translation of the small XPath subset used in source definitions into CSS
//! selectors understood by `scraper`.
//!
//! Supported: `//tag` and `/tag` steps, the `*` wildcard, and the predicates
//! `[@attr="v"]`, `[@attr]` and `[contains(@attr, "v")]`. Queries that do not
//! start with `/` are taken to be CSS already and pass through untouched.

use regex::Regex;
use std::sync::LazyLock;

static ATTR_EQUALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^@([A-Za-z_][\w-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')$"#).unwrap()
});

static ATTR_PRESENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z_][\w-]*)$").unwrap());

static ATTR_CONTAINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^contains\(\s*@([A-Za-z_][\w-]*)\s*,\s*(?:"([^"]*)"|'([^']*)')\s*\)$"#)
        .unwrap()
});

pub fn is_xpath(query: &str) -> bool {
    query.trim_start().starts_with('/')
}

/// Returns the CSS selector equivalent of `query`.
pub fn to_css_selector(query: &str) -> Result<String, String> {
    let query = query.trim();
    if !is_xpath(query) {
        return Ok(query.to_string());
    }

    let mut css = String::new();
    let mut rest = query;
    let mut first = true;

    while !rest.is_empty() {
        let (descendant, after) = if let Some(after) = rest.strip_prefix("//") {
            (true, after)
        } else if let Some(after) = rest.strip_prefix('/') {
            (false, after)
        } else {
            return Err(format!("expected '/' at '{}'", rest));
        };

        let (step, remainder) = split_step(after)?;
        let compiled = compile_step(step)?;

        match (first, descendant) {
            (true, true) => css.push_str(&compiled),
            (true, false) => {
                css.push_str(&compiled);
                css.push_str(":root");
            }
            (false, true) => {
                css.push(' ');
                css.push_str(&compiled);
            }
            (false, false) => {
                css.push_str(" > ");
                css.push_str(&compiled);
            }
        }

        first = false;
        rest = remainder;
    }

    Ok(css)
}

/// Splits off one location step, stopping at the next `/` outside brackets and quotes.
fn split_step(input: &str) -> Result<(&str, &str), String> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced ']' in '{}'", input))?;
            }
            (None, '/') if depth == 0 => {
                if index == 0 {
                    return Err("empty location step".to_string());
                }
                return Ok((&input[..index], &input[index..]));
            }
            _ => {}
        }
    }

    if quote.is_some() || depth != 0 {
        return Err(format!("unterminated predicate in '{}'", input));
    }
    if input.is_empty() {
        return Err("empty location step".to_string());
    }
    Ok((input, ""))
}

fn compile_step(step: &str) -> Result<String, String> {
    let name_end = step.find('[').unwrap_or(step.len());
    let name = step[..name_end].trim();

    let valid_name = name == "*"
        || (!name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    if !valid_name {
        return Err(format!("unsupported element name '{}'", name));
    }

    let mut css = name.to_string();
    let mut predicates = &step[name_end..];

    while !predicates.is_empty() {
        let close = closing_bracket(predicates)
            .ok_or_else(|| format!("unterminated predicate in '{}'", step))?;
        css.push_str(&compile_predicate(predicates[1..close].trim())?);
        predicates = predicates[close + 1..].trim_start();
        if !predicates.is_empty() && !predicates.starts_with('[') {
            return Err(format!("unexpected '{}' after predicate", predicates));
        }
    }

    Ok(css)
}

fn closing_bracket(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, c) in input.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, ']') => return Some(index),
            _ => {}
        }
    }
    None
}

fn compile_predicate(predicate: &str) -> Result<String, String> {
    if let Some(caps) = ATTR_EQUALS.captures(predicate) {
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        return Ok(format!("[{}=\"{}\"]", &caps[1], escape(value)));
    }
    if let Some(caps) = ATTR_CONTAINS.captures(predicate) {
        let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        return Ok(format!("[{}*=\"{}\"]", &caps[1], escape(value)));
    }
    if let Some(caps) = ATTR_PRESENT.captures(predicate) {
        return Ok(format!("[{}]", &caps[1]));
    }
    Err(format!("unsupported XPath predicate '[{}]'", predicate))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
