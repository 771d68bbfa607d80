//! Recover a JSON object from free-form model output.
//!
//! Models wrap their JSON in prose, fence it in markdown, leave trailing
//! commas, or let control characters through. Three candidate strategies run
//! in order and the first hit wins; the candidate is then sanitized and
//! parsed. Failure is an ordinary value, never a panic.

use once_cell::sync::OnceCell;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON object found in response text")]
    NoJsonFound,
    #[error("candidate JSON failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extract the first recoverable JSON object from `raw`.
///
/// Strategies, first match wins:
/// 1. interior of a fenced code block (``` or ```json),
/// 2. first balanced top-level `{...}` span by brace depth,
/// 3. leftmost `{` through rightmost `}` (weakest, may over-capture).
pub fn extract_json(raw: &str) -> Result<serde_json::Value, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::NoJsonFound);
    }

    let candidate = fenced_block(trimmed)
        .or_else(|| balanced_object(trimmed))
        .or_else(|| widest_span(trimmed))
        .ok_or(ExtractError::NoJsonFound)?;

    let cleaned = repair_trailing_commas(&strip_control_chars(candidate));
    Ok(serde_json::from_str(&cleaned)?)
}

fn fenced_block(text: &str) -> Option<&str> {
    static RE_FENCE: OnceCell<Regex> = OnceCell::new();
    let re = RE_FENCE
        .get_or_init(|| Regex::new(r"(?is)```(?:json)?\s*(\{.*\})\s*```").expect("fence regex"));
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// First balanced top-level object: depth goes positive at the first `{` and
/// the span ends where it returns to zero. Braces inside strings are not
/// interpreted; the parse step is the arbiter of validity.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth: i32 = 0;
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if let Some(s) = start {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[s..i + ch.len_utf8()]);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn widest_span(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (first < last).then(|| &text[first..=last])
}

/// Strip C0 controls (except JSON whitespace), DEL, and the C1 range.
fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{0000}'..='\u{0008}'
                    | '\u{000B}'
                    | '\u{000C}'
                    | '\u{000E}'..='\u{001F}'
                    | '\u{007F}'..='\u{009F}'
            )
        })
        .collect()
}

/// Remove commas that immediately precede a closing brace/bracket. Iterated
/// to a fixed point: one removal can expose the next trailing comma in
/// nested malformed output.
fn repair_trailing_commas(s: &str) -> String {
    static RE_TRAILING: OnceCell<Regex> = OnceCell::new();
    let re = RE_TRAILING
        .get_or_init(|| Regex::new(r",(\s*[}\]])").expect("trailing comma regex"));

    let mut current = s.to_string();
    loop {
        let next = re.replace_all(&current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
