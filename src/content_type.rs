//! Content-Type validation for administrator supplied values.
//!
//! Accepts `type "/" subtype *(";" attribute "=" value)` using a simplified
//! RFC 1341 grammar. It is intentionally permissive: the goal is to keep
//! malformed `Content-Type` headers out of responses, not full RFC 2045/6838
//! compliance. Media top-level types (`image`, `audio`, `video`) are rejected.
//!
//! ```
//! use wellknown::content_type::validate;
//!
//! let ok = validate(" Application/json ; charset=utf-8");
//! assert_eq!(ok.normalized, "application/json; charset=utf-8");
//! assert!(ok.is_valid());
//!
//! let rejected = validate("image/png");
//! assert_eq!(rejected.normalized, "");
//! assert!(!rejected.is_valid());
//! ```

use crate::field::{ErrorCode, FieldError};

/// Punctuation allowed in a token besides ASCII letters and digits.
pub const TOKEN_CHARS: &str = "!#$%&*+^_`{|}~-";

/// Top-level types accepted without an `x-` prefix.
pub const DISCRETE_TYPES: [&str; 4] = ["application", "message", "multipart", "text"];

const DEFAULT_FIELD: &str = "type";

/// Outcome of validating one Content-Type value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    /// Reconstructed value, or empty when any error was found.
    pub normalized: String,
    pub errors: Vec<FieldError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error codes in the order they were found.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }
}

/// Validate a raw Content-Type, reporting errors against the `type` field.
pub fn validate(raw: &str) -> Validation {
    validate_field(DEFAULT_FIELD, raw)
}

/// Validate a raw Content-Type, reporting errors against `field` (e.g. `type_3`).
///
/// Every violation is collected. A trimmed empty value is valid and normalizes
/// to the empty string, which means "serve the default type".
pub fn validate_field(field: &str, raw: &str) -> Validation {
    let raw = raw.trim();
    if raw.is_empty() {
        return Validation::default();
    }

    let (main, params) = match raw.split_once(';') {
        Some((main, params)) => (main, Some(params)),
        None => (raw, None),
    };
    let (media_type, subtype) = main.split_once('/').unwrap_or((main, ""));
    let media_type = media_type.trim().to_ascii_lowercase();
    let subtype = subtype.trim();

    let mut errors = Vec::new();
    check_type(field, &media_type, &mut errors);
    check_subtype(field, subtype, &mut errors);

    let mut parameters = Vec::new();
    for param in params.into_iter().flat_map(|p| p.split(';')) {
        let (attribute, value) = param.split_once('=').unwrap_or((param, ""));
        let (attribute, value) = (attribute.trim(), value.trim());
        check_parameter(field, attribute, value, &mut errors);
        parameters.push((attribute, value));
    }

    if !errors.is_empty() {
        return Validation {
            normalized: String::new(),
            errors,
        };
    }

    let mut normalized = format!("{media_type}/{subtype}");
    for (attribute, value) in parameters {
        normalized.push_str("; ");
        normalized.push_str(attribute);
        normalized.push('=');
        normalized.push_str(value);
    }

    Validation {
        normalized,
        errors,
    }
}

fn check_type(field: &str, media_type: &str, errors: &mut Vec<FieldError>) {
    if media_type.is_empty() {
        errors.push(FieldError::new(
            field,
            ErrorCode::MissingMimeType,
            "Content type is missing its top-level type",
        ));
    }

    let allowed = DISCRETE_TYPES.contains(&media_type)
        || (media_type.starts_with("x-") && is_token(media_type));
    if !allowed {
        errors.push(FieldError::new(
            field,
            ErrorCode::InvalidMimeType,
            format!(
                "Top-level type '{media_type}' must be one of {} or an x- extension",
                DISCRETE_TYPES.join(", ")
            ),
        ));
    }
}

fn check_subtype(field: &str, subtype: &str, errors: &mut Vec<FieldError>) {
    if subtype.is_empty() {
        errors.push(FieldError::new(
            field,
            ErrorCode::MissingMimeSubtype,
            "Content type is missing its subtype",
        ));
    }
    if !is_token(subtype) {
        errors.push(FieldError::new(
            field,
            ErrorCode::InvalidMimeSubtype,
            format!("Subtype '{subtype}' contains characters outside the token grammar"),
        ));
    }
}

fn check_parameter(field: &str, attribute: &str, value: &str, errors: &mut Vec<FieldError>) {
    if attribute.is_empty() {
        errors.push(FieldError::new(
            field,
            ErrorCode::MissingMimeAttribute,
            "Parameter is missing its attribute name",
        ));
    }
    if !is_token(attribute) {
        errors.push(FieldError::new(
            field,
            ErrorCode::InvalidMimeAttribute,
            format!("Parameter attribute '{attribute}' contains characters outside the token grammar"),
        ));
    }
    if value.is_empty() {
        errors.push(FieldError::new(
            field,
            ErrorCode::MissingMimeValue,
            format!("Parameter '{attribute}' is missing its value"),
        ));
    }
    if !is_token(value) && !is_quoted_string(value) {
        errors.push(FieldError::new(
            field,
            ErrorCode::InvalidMimeValue,
            format!("Parameter value '{value}' is neither a token nor a quoted string"),
        ));
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || TOKEN_CHARS.contains(c)
}

/// One or more token characters.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// `"` followed by one or more token characters or `\"` escapes, then `"`.
pub fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };
    if inner.is_empty() {
        return false;
    }

    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next() != Some('"') {
                    return false;
                }
            }
            c if is_token_char(c) => {}
            _ => return false,
        }
    }
    true
}
