//! Settings field identifiers and field-level validation errors.
//!
//! The settings form addresses every value as `{kind}_{index}` (for example
//! `suffix_3` or `type_3`). Validation problems are reported against those
//! identifiers so an administrator sees every rejected field of a save at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three field groups that make up one settings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Suffix,
    Type,
    Contents,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Suffix, FieldKind::Type, FieldKind::Contents];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Suffix => "suffix",
            FieldKind::Type => "type",
            FieldKind::Contents => "contents",
        }
    }

    /// Form key for this kind at a 1-based row index: `suffix_1`, `type_4`, ...
    pub fn key(&self, index: usize) -> String {
        format!("{}_{}", self.as_str(), index)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidSuffix,
    MissingMimeType,
    InvalidMimeType,
    MissingMimeSubtype,
    InvalidMimeSubtype,
    MissingMimeAttribute,
    InvalidMimeAttribute,
    MissingMimeValue,
    InvalidMimeValue,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSuffix => "invalid_suffix",
            ErrorCode::MissingMimeType => "missing_mime_type",
            ErrorCode::InvalidMimeType => "invalid_mime_type",
            ErrorCode::MissingMimeSubtype => "missing_mime_subtype",
            ErrorCode::InvalidMimeSubtype => "invalid_mime_subtype",
            ErrorCode::MissingMimeAttribute => "missing_mime_attribute",
            ErrorCode::InvalidMimeAttribute => "invalid_mime_attribute",
            ErrorCode::MissingMimeValue => "missing_mime_value",
            ErrorCode::InvalidMimeValue => "invalid_mime_value",
        }
    }

    /// True for every Content-Type sub-code.
    pub fn is_content_type(&self) -> bool {
        !matches!(self, ErrorCode::InvalidSuffix)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected field: `(field id, code, human readable message)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.code, self.message)
    }
}
