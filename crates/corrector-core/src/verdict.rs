//! Grading verdict model and field-level normalization.
//!
//! The upstream model is asked for a fixed JSON shape, but nothing forces it
//! to comply. [`GradingVerdict::from_object`] turns any syntactically valid
//! JSON object into a usable verdict by applying deterministic defaults per
//! field. Wrong-typed values are discarded, never converted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of entries kept in `points_positifs`.
pub const MAX_POSITIVE_POINTS: usize = 4;

/// Maximum number of entries kept in `points_a_ameliorer`.
pub const MAX_IMPROVEMENT_POINTS: usize = 8;

/// Suggestion returned when the upstream model did not provide one.
pub const SUGGESTION_PLACEHOLDER: &str = "Analyse terminée. (Aucune suggestion fournie.)";

/// Overall grading outcome.
///
/// Serialized with the French labels shown to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerdictStatus {
    /// No major error.
    #[serde(rename = "Conforme")]
    Compliant,

    /// A few minor, correctable issues.
    #[default]
    #[serde(rename = "À améliorer")]
    NeedsImprovement,

    /// Numerous errors or comprehension severely impaired.
    #[serde(rename = "Non conforme")]
    NonCompliant,
}

impl VerdictStatus {
    /// All statuses, in decreasing order of quality.
    pub const ALL: [VerdictStatus; 3] = [
        VerdictStatus::Compliant,
        VerdictStatus::NeedsImprovement,
        VerdictStatus::NonCompliant,
    ];

    /// The label used on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            VerdictStatus::Compliant => "Conforme",
            VerdictStatus::NeedsImprovement => "À améliorer",
            VerdictStatus::NonCompliant => "Non conforme",
        }
    }

    /// Match a label as produced by the model.
    ///
    /// Surrounding whitespace and letter case are ignored; accents are not.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The structured grading result returned for every successful request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingVerdict {
    /// Overall outcome
    pub status: VerdictStatus,

    /// Strengths of the text (0 to 4 entries)
    pub points_positifs: Vec<String>,

    /// Located mistakes with their correction (0 to 8 entries)
    pub points_a_ameliorer: Vec<String>,

    /// Full formatted report, including the corrected text
    pub suggestion: String,
}

impl Default for GradingVerdict {
    fn default() -> Self {
        Self {
            status: VerdictStatus::default(),
            points_positifs: Vec::new(),
            points_a_ameliorer: Vec::new(),
            suggestion: SUGGESTION_PLACEHOLDER.to_string(),
        }
    }
}

impl GradingVerdict {
    /// Build a verdict from a decoded JSON object, defaulting each field
    /// that is missing or has the wrong type.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let status = object
            .get("status")
            .and_then(Value::as_str)
            .and_then(VerdictStatus::from_label)
            .unwrap_or_default();

        let suggestion = object
            .get("suggestion")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(SUGGESTION_PLACEHOLDER)
            .to_string();

        Self {
            status,
            points_positifs: string_list(object.get("points_positifs"), MAX_POSITIVE_POINTS),
            points_a_ameliorer: string_list(
                object.get("points_a_ameliorer"),
                MAX_IMPROVEMENT_POINTS,
            ),
            suggestion,
        }
    }
}

/// Keep the string entries of a JSON array, up to `cap` of them.
fn string_list(value: Option<&Value>, cap: usize) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .take(cap)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
