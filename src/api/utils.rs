//! API utility functions
//!
//! Pure, stateless helpers for HTTP request processing.

use crate::api::error::ApiError;

/// Encodings accepted for a settings save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEncoding {
    Json,
    Form,
}

/// Parses the Content-Type of a settings save
///
/// Accepts:
/// - `application/json` (optionally with charset)
/// - `application/x-www-form-urlencoded`
///
/// Rejects everything else, including malformed media types.
pub fn parse_settings_content_type(content_type: &str) -> Result<SettingsEncoding, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() == mime::APPLICATION && media_type.subtype() == mime::JSON {
        return Ok(SettingsEncoding::Json);
    }
    if media_type.type_() == mime::APPLICATION
        && media_type.subtype() == mime::WWW_FORM_URLENCODED
    {
        return Ok(SettingsEncoding::Form);
    }

    Err(ApiError::InvalidPayload(format!(
        "Content-Type must be application/json or application/x-www-form-urlencoded, got: {}/{}",
        media_type.type_(),
        media_type.subtype()
    )))
}

/// Extracts the token from an `Authorization: Bearer <token>` value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
