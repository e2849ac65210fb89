use super::models::Config;
use crate::content_type::is_token;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Site charset '{charset}' must be a non-empty token")]
    InvalidCharset { charset: String },

    #[error("max_body_bytes must be positive")]
    InvalidMaxBodyBytes,

    #[error("Admin token is set but empty")]
    EmptyAdminToken,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_site(config)?;
    validate_server(config)?;
    validate_admin(config)?;
    Ok(())
}

/// The charset ends up verbatim in a Content-Type header
fn validate_site(config: &Config) -> Result<(), ValidationError> {
    if !is_token(&config.site.charset) {
        return Err(ValidationError::InvalidCharset {
            charset: config.site.charset.clone(),
        });
    }
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::InvalidMaxBodyBytes);
    }
    Ok(())
}

fn validate_admin(config: &Config) -> Result<(), ValidationError> {
    if config.admin.enabled && config.admin.token.as_deref() == Some("") {
        return Err(ValidationError::EmptyAdminToken);
    }
    Ok(())
}
