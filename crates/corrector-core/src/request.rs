//! Grading request decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding a grading request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A request to grade one piece of text against a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingRequest {
    /// Optional task the text answers, used as context only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// The text to analyse
    pub answer: String,

    /// Grading instructions, followed verbatim
    pub rule: String,
}

impl GradingRequest {
    /// Create a request without question context.
    pub fn new(answer: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            question: None,
            answer: answer.into(),
            rule: rule.into(),
        }
    }

    /// Attach the question the answer responds to.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Decode a request from a raw HTTP body.
    ///
    /// A body that is empty, not JSON, or not an object is treated as an
    /// empty object, so it fails on the missing fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self::from_value(&value)
    }

    /// Decode a request from an already-parsed JSON value.
    ///
    /// `answer` and `rule` must be non-empty strings. Whitespace counts as
    /// content; every field is kept verbatim.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let answer = non_empty(value, "answer");
        let rule = non_empty(value, "rule");

        match (answer, rule) {
            (Some(answer), Some(rule)) => Ok(Self {
                question: non_empty(value, "question"),
                answer,
                rule,
            }),
            (answer, rule) => {
                let mut missing = Vec::new();
                if answer.is_none() {
                    missing.push("answer");
                }
                if rule.is_none() {
                    missing.push("rule");
                }
                Err(RequestError::MissingFields(missing))
            }
        }
    }
}

fn non_empty(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
