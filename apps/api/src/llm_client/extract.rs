//! Resilient Result Extractor: recovers a JSON object from free-form model output.
//!
//! Model output is untrusted: valid JSON wrapped in prose, fenced in markdown,
//! quoted the wrong way, or missing entirely. The input side is maximally
//! tolerant; the output side is strict: an object that contains the required
//! key, or an empty map. Extraction never returns an error to the caller.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// A JSON object recovered from model output. Empty when extraction failed.
pub type Extracted = Map<String, Value>;

/// A fence that opens a line, its optional language tag, and the newline that
/// follows it. Fence markers in the middle of a line are removed without a tag.
const FENCE_PATTERN: &str = r"(?m)^[ \t]*```[A-Za-z0-9_+\-]*[ \t]*\r?\n?";
const PREVIEW_CHARS: usize = 300;

/// Extracts the outermost JSON object from `text` and returns it only if it
/// contains `required_key`.
///
/// Steps:
/// 1. strip markdown fence markers (with or without a language tag)
/// 2. turn `"""` into `"`
/// 3. slice from the first `{` to the last `}` (greedy outer match)
/// 4. parse as strict JSON, then with a JSON5 parser (single quotes, trailing
///    commas, comments, bare keys) when strict parsing fails
/// 5. keep the result only if it is an object holding `required_key`
///
/// The value under `required_key` is not inspected; `null` still counts as present.
pub fn extract_json_with_key(text: &str, required_key: &str) -> Extracted {
    debug!("Raw LLM output for '{required_key}': {:?}", preview(text));

    let cleaned = strip_code_fences(text).replace("\"\"\"", "\"");

    let Some(candidate) = outer_object_span(&cleaned) else {
        debug!("No JSON object boundaries found for '{required_key}'");
        return Map::new();
    };

    match parse_candidate(candidate) {
        Ok(Value::Object(object)) if object.contains_key(required_key) => {
            debug!("Found JSON object with key '{required_key}'");
            object
        }
        Ok(_) => {
            debug!("Parsed JSON has no '{required_key}' key");
            Map::new()
        }
        Err(e) => {
            debug!(
                "Failed to parse JSON candidate for '{required_key}': {e}; candidate: {:?}",
                preview(candidate)
            );
            Map::new()
        }
    }
}

/// Value under `key`, or `empty` when the key is absent or null.
pub fn field_or(extracted: &Extracted, key: &str, empty: Value) -> Value {
    match extracted.get(key) {
        Some(Value::Null) | None => empty,
        Some(value) => value.clone(),
    }
}

/// Strict JSON keeps the full `u64` range (and falls back to `f64` beyond it),
/// which the JSON5 parser rejects above `i64::MAX`.
fn parse_candidate(candidate: &str) -> Result<Value, json5::Error> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Ok(value),
        Err(_) => json5::from_str::<Value>(candidate),
    }
}

fn fence_regex() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).ok()).as_ref()
}

fn strip_code_fences(text: &str) -> String {
    match fence_regex() {
        Some(re) => re.replace_all(text, "").replace("```", ""),
        None => text.replace("```", ""),
    }
}

/// Span from the first `{` to the last `}` inclusive, if they appear in that order.
fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
