use fxhash::FxHashMap;
use serde::Serialize;

/// The kind of a failed validation, keyed by its camelCase wire name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ErrorKind {
    Required,
    Email,
    MinLength,
    MaxLength,
    Match,
    Range,
}

/// Structured detail attached to a failing validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain boolean-style failure with no extra information.
    Flag(bool),
    #[serde(rename_all = "camelCase")]
    Length { required_length: usize, actual_length: usize },
    Range { min: f64, max: f64, actual: Option<f64> },
}

/// The error set of a control: the union of the currently-failing
/// validators' outputs. Empty means valid.
pub type ErrorMap = FxHashMap<ErrorKind, ErrorDetail>;

/// Operational failures of control-tree operations.
///
/// Validation failures never end up here; they are represented in
/// [`ErrorMap`]s. These errors cover malformed access: a path that does
/// not resolve, an index past the end of a collection, or a patch that
/// does not fit the tree's shape. None of them mutate existing state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Control path not found: {path}")]
    NotFound { path: String },

    #[error("Collection index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Control at {path} is not a field")]
    NotAField { path: String },

    #[error("Control at {path} is not a group")]
    NotAGroup { path: String },

    #[error("Control at {path} is not a collection")]
    NotACollection { path: String },

    #[error("Patch value does not fit the control shape at {path}")]
    InvalidPatch { path: String },
}
