//! Turning raw model output into phase fields.
//!
//! Models often wrap JSON in a markdown code fence even when told not to.
//! [`normalize`] strips an optional fence, then parses the remainder as one
//! JSON object. The object's fields are not re-validated: absent fields and
//! fields of the wrong JSON type both come back as `None`.

use std::fmt;
use std::ops::Range;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Fields a model returns for one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedPhaseFields {
    pub deliverable: Option<String>,
    pub tasks: Option<Vec<String>>,
    pub commit_condition: Option<String>,
    pub example_input: Option<String>,
    pub example_output: Option<String>,
}

/// Why a response could not be parsed.
#[derive(Debug)]
pub enum MalformedReason {
    /// Nothing left after trimming and fence stripping.
    Empty,
    /// Not JSON.
    Json(serde_json::Error),
    /// Valid JSON, but not an object.
    NotAnObject,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("response is empty"),
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
            Self::NotAnObject => f.write_str("expected a JSON object"),
        }
    }
}

/// The backend returned text that cannot be read as phase fields.
#[derive(Debug, Error)]
#[error("malformed response for phase {phase}: {reason}")]
pub struct MalformedResponse {
    pub phase: u32,
    pub reason: MalformedReason,
    /// The backend text exactly as received.
    pub raw: String,
}

/// Characters that end a line. `\r\n` counts as a single break.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Byte ranges of each line, split on every character in [`LINE_BREAKS`].
/// A trailing break does not produce an empty last line.
fn line_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        spans.push(start..i);
        start = i + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

/// Remove a surrounding markdown code fence, if present.
///
/// When the trimmed text starts with three backticks, the first line (the
/// opening fence and any language tag) and the last line (the closing fence)
/// are dropped. Lines in between are kept byte for byte. The result is
/// trimmed either way.
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim_matches(is_blank);
    if !text.starts_with("```") {
        return text.to_owned();
    }
    let spans = line_spans(text);
    if spans.len() < 3 {
        return String::new();
    }
    let body = spans[1].start..spans[spans.len() - 2].end;
    text[body].trim_matches(is_blank).to_owned()
}

/// Strip fences from `raw` and parse it as the fields for `phase`.
pub fn normalize(phase: u32, raw: &str) -> Result<ParsedPhaseFields, MalformedResponse> {
    let malformed = |reason| MalformedResponse {
        phase,
        reason,
        raw: raw.to_owned(),
    };

    let stripped = strip_code_fences(raw);
    if stripped.is_empty() {
        return Err(malformed(MalformedReason::Empty));
    }

    let value: Value =
        serde_json::from_str(&stripped).map_err(|e| malformed(MalformedReason::Json(e)))?;
    let Value::Object(mut object) = value else {
        return Err(malformed(MalformedReason::NotAnObject));
    };

    Ok(ParsedPhaseFields {
        deliverable: take_field(phase, &mut object, "deliverable"),
        tasks: take_field(phase, &mut object, "tasks"),
        commit_condition: take_field(phase, &mut object, "commit_condition"),
        example_input: take_field(phase, &mut object, "example_input"),
        example_output: take_field(phase, &mut object, "example_output"),
    })
}

/// Remove `key` from `object` and decode it. `null` and wrong-typed values
/// are treated as absent.
fn take_field<T: DeserializeOwned>(
    phase: u32,
    object: &mut Map<String, Value>,
    key: &str,
) -> Option<T> {
    let value = object.remove(key).filter(|v| !v.is_null())?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(phase, field = key, error = %e, "response field has wrong type; ignoring it");
            None
        }
    }
}
