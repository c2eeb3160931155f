//! Newline-delimited streamed bodies.
//!
//! The legacy streaming endpoint answers with one JSON object per line, each a more
//! complete rendition of the reply. The last complete object is authoritative, unless
//! it is an `{"abort": ...}` marker.

use crate::{Error, Result};
use serde_json::Value;

/// Non-empty, trimmed lines of a streamed body.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// The last line that parses as a complete JSON value.
///
/// A truncated trailing line (connection cut mid-object) is skipped in favour of the
/// previous complete one.
pub fn last_complete_object(text: &str) -> Option<Value> {
    lines(text)
        .into_iter()
        .rev()
        .find_map(|line| serde_json::from_str::<Value>(line).ok())
}

/// True when a decoded line is the service's abort marker.
pub fn is_abort(value: &Value) -> bool {
    match value.get("abort") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Resolve the final reply of a streamed chat body.
///
/// - last line is an abort marker: [`Error::Filtered`], or with `non_filtering` the
///   previous line's object (still `Filtered` when there is no previous line);
/// - otherwise the last complete object;
/// - nothing decodable: [`Error::MalformedResponse`] carrying the raw body.
pub fn final_reply(text: &str, non_filtering: bool) -> Result<Value> {
    let lines = lines(text);
    let Some(last) = lines.last() else {
        return Err(Error::malformed("empty streamed response", text));
    };

    let last_value = serde_json::from_str::<Value>(last).ok();
    let aborted = match &last_value {
        Some(v) => is_abort(v),
        None => last.starts_with("{\"abort\""),
    };

    if aborted {
        if !non_filtering {
            return Err(Error::filtered());
        }
        let penultimate = lines
            .len()
            .checked_sub(2)
            .and_then(|i| lines.get(i))
            .ok_or_else(Error::filtered)?;
        return serde_json::from_str(penultimate)
            .map_err(|e| Error::malformed(format!("unable to decode partial reply: {e}"), text));
    }

    match last_value {
        Some(v) => Ok(v),
        None => last_complete_object(text)
            .ok_or_else(|| Error::malformed("no complete JSON object in streamed response", text)),
    }
}
