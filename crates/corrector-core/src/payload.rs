//! Upstream completion payload decoding.
//!
//! Models sometimes wrap their JSON in markdown fences despite being told not
//! to. Fences are removed, then the text must parse as a JSON object. No
//! further repair is attempted: if the text is not valid JSON, the raw text
//! is returned to the caller for diagnostics.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::verdict::GradingVerdict;

lazy_static! {
    /// Opening fence with a `json` language tag, any case.
    static ref JSON_FENCE: Regex = Regex::new(r"(?i)```json").expect("valid fence pattern");
}

/// Errors from decoding a completion payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("completion is not valid JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion is JSON but not an object (found {kind})")]
    NotAnObject { raw: String, kind: &'static str },
}

impl PayloadError {
    /// The fence-stripped completion text that failed to decode.
    pub fn raw(&self) -> &str {
        match self {
            PayloadError::InvalidJson { raw, .. } | PayloadError::NotAnObject { raw, .. } => raw,
        }
    }
}

/// Remove markdown code-fence markup and surrounding whitespace.
///
/// Every "```json" (any case) and every remaining "```" is removed, wherever
/// it occurs.
pub fn strip_code_fences(text: &str) -> String {
    JSON_FENCE.replace_all(text, "").replace("```", "").trim().to_string()
}

/// Decode a completion into a verdict.
pub fn parse_verdict(completion: &str) -> Result<GradingVerdict, PayloadError> {
    let raw = strip_code_fences(completion);

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(source) => return Err(PayloadError::InvalidJson { raw, source }),
    };

    match value {
        Value::Object(object) => Ok(GradingVerdict::from_object(&object)),
        other => Err(PayloadError::NotAnObject {
            kind: json_kind(&other),
            raw,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
