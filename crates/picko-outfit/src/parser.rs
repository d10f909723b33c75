//! Parse model output into a [`StructuredRecommendation`].
//!
//! Model output is untrusted: any input yields either a recommendation or a
//! [`ParseFailure`], never a panic.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseFailure;
use crate::types::{ClothingToken, StructuredRecommendation};

// Pattern is a literal; compiling it cannot fail.
#[allow(clippy::unwrap_used)]
fn summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?im)^[ \t]*SUMMARY:(.*)$").unwrap())
}

// Pattern is a literal; compiling it cannot fail.
#[allow(clippy::unwrap_used)]
fn clothing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?im)^[ \t]*CLOTHING:(.*)$").unwrap())
}

fn first_payload<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Split a `CLOTHING:` payload into lower-cased tokens, dropping empties.
/// Duplicates are kept.
pub fn split_tokens(payload: &str) -> Vec<ClothingToken> {
    payload
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .map(ClothingToken::from)
        .collect()
}

/// Extract the first `SUMMARY:` and `CLOTHING:` lines (case-insensitive).
pub fn parse(raw: &str) -> Result<StructuredRecommendation, ParseFailure> {
    let summary = first_payload(summary_pattern(), raw)
        .filter(|s| !s.is_empty())
        .ok_or(ParseFailure::MissingSummary)?;

    let clothing = first_payload(clothing_pattern(), raw).ok_or(ParseFailure::MissingClothing)?;
    let clothing_items = split_tokens(clothing);
    if clothing_items.is_empty() {
        return Err(ParseFailure::EmptyClothing);
    }

    Ok(StructuredRecommendation {
        summary: summary.to_string(),
        clothing_items,
    })
}
