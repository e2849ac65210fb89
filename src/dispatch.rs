//! Request suffix resolution.
//!
//! Entries are tried in index order and the first one whose suffix is a
//! byte-wise prefix of the request suffix answers. There is no longest-match
//! rule: the stored order is the tie-break. When nothing matches, registered
//! providers are tried by exact suffix before falling back to a plain-text 404.

use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::debug;

use crate::providers::ProviderRegistry;
use crate::settings::{self, ConfigList, ConfigStore};

pub const NOT_FOUND_BODY: &str = "Not Found";
pub const NOT_CONFIGURED_BODY: &str = "Not configured";

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Configured entry at this 1-based index.
    Matched { index: usize },
    /// Registered provider.
    Provided,
    /// Entries exist but none matched.
    NotFound,
    /// No entries are configured.
    NotConfigured,
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Matched { .. } | Outcome::Provided => StatusCode::OK,
            Outcome::NotFound | Outcome::NotConfigured => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownResponse {
    pub outcome: Outcome,
    pub content_type: String,
    pub body: Bytes,
}

impl WellKnownResponse {
    pub fn status(&self) -> StatusCode {
        self.outcome.status()
    }
}

impl IntoResponse for WellKnownResponse {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("text/plain"));
        (
            self.outcome.status(),
            [(header::CONTENT_TYPE, content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Resolves request suffixes against the stored entries.
#[derive(Clone)]
pub struct Dispatcher {
    charset: String,
    store: Arc<dyn ConfigStore>,
    providers: ProviderRegistry,
}

impl Dispatcher {
    pub fn new(charset: impl Into<String>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            charset: charset.into(),
            store,
            providers: ProviderRegistry::new(),
        }
    }

    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// `text/plain; charset=<site charset>`
    pub fn default_content_type(&self) -> String {
        format!("text/plain; charset={}", self.charset)
    }

    /// Load the current list from the store and resolve `suffix` against it.
    pub fn serve(&self, suffix: &str) -> settings::Result<WellKnownResponse> {
        let entries = self.store.load()?;
        Ok(self.resolve(suffix, &entries))
    }

    /// Resolve `suffix` against `entries`. Never fails; a miss is a 404 response.
    pub fn resolve(&self, suffix: &str, entries: &ConfigList) -> WellKnownResponse {
        let hit = entries
            .iter_indexed()
            .find(|(_, entry)| !entry.suffix.is_empty() && suffix.starts_with(&entry.suffix));

        if let Some((index, entry)) = hit {
            debug!(suffix = %suffix, index, "Matched configured entry");
            let content_type = if entry.content_type.is_empty() {
                self.default_content_type()
            } else {
                entry.content_type.clone()
            };
            return WellKnownResponse {
                outcome: Outcome::Matched { index },
                content_type,
                body: Bytes::from(entry.contents.clone()),
            };
        }

        if let Some(provider) = self.providers.get(suffix) {
            debug!(suffix = %suffix, "Answered by provider");
            let provided = provider.respond(suffix);
            return WellKnownResponse {
                outcome: Outcome::Provided,
                content_type: provided
                    .content_type
                    .unwrap_or_else(|| self.default_content_type()),
                body: provided.body,
            };
        }

        let (outcome, body) = if entries.is_empty() {
            (Outcome::NotConfigured, NOT_CONFIGURED_BODY)
        } else {
            (Outcome::NotFound, NOT_FOUND_BODY)
        };
        debug!(suffix = %suffix, ?outcome, "No entry matched");

        WellKnownResponse {
            outcome,
            content_type: self.default_content_type(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }
}
