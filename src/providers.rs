//! Programmatic well-known responders.
//!
//! Code can register a responder for an exact suffix (for example a generated
//! `host-meta` document). Providers are consulted only when no configured
//! entry matched, so administrator entries always take precedence.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Body and optional Content-Type produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedResponse {
    /// `None` means the site default type.
    pub content_type: Option<String>,
    pub body: Bytes,
}

pub trait WellKnownProvider: Send + Sync {
    fn respond(&self, suffix: &str) -> ProvidedResponse;
}

/// Provider returning a fixed document.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    response: ProvidedResponse,
}

impl StaticProvider {
    pub fn new(content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            response: ProvidedResponse {
                content_type: content_type.map(str::to_owned),
                body: body.into(),
            },
        }
    }
}

impl WellKnownProvider for StaticProvider {
    fn respond(&self, _suffix: &str) -> ProvidedResponse {
        self.response.clone()
    }
}

/// Registry mapping exact suffixes to providers
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn WellKnownProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, suffix: impl Into<String>, provider: Arc<dyn WellKnownProvider>) {
        self.providers.insert(suffix.into(), provider);
    }

    pub fn get(&self, suffix: &str) -> Option<Arc<dyn WellKnownProvider>> {
        self.providers.get(suffix).cloned()
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.suffixes()).finish()
    }
}
