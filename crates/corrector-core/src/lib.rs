//! # corrector-core
//!
//! Deterministic building blocks for grading French text with an LLM.
//!
//! This crate never performs I/O. It answers three questions:
//! - Is this request gradable? ([`GradingRequest::from_slice`])
//! - What exactly do we ask the model? ([`build_grading_prompt`])
//! - What verdict does the model's reply amount to? ([`parse_verdict`])
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: the same request always yields the same prompt
//! 2. **Strict parsing**: only code fences are stripped; anything else that
//!    is not a JSON object is rejected with the raw text preserved
//! 3. **Total normalization**: any JSON object yields a complete verdict
//!
//! ## Example
//!
//! ```rust
//! use corrector_core::{parse_verdict, VerdictStatus, SUGGESTION_PLACEHOLDER};
//!
//! let verdict = parse_verdict("```json\n{\"status\":\"Conforme\"}\n```").unwrap();
//! assert_eq!(verdict.status, VerdictStatus::Compliant);
//! assert!(verdict.points_positifs.is_empty());
//! assert_eq!(verdict.suggestion, SUGGESTION_PLACEHOLDER);
//! ```

pub mod payload;
pub mod prompt;
pub mod request;
pub mod verdict;

pub use payload::{parse_verdict, strip_code_fences, PayloadError};
pub use prompt::{build_grading_prompt, SYSTEM_PROMPT};
pub use request::{GradingRequest, RequestError};
pub use verdict::{
    GradingVerdict, VerdictStatus, MAX_IMPROVEMENT_POINTS, MAX_POSITIVE_POINTS,
    SUGGESTION_PLACEHOLDER,
};
