//! Admin and operator API payloads.
//!
//! The well-known route itself answers with raw entry contents; everything
//! here is JSON for the admin surface:
//!
//! - `GET /admin/settings` returns a [`SettingsResponse`]
//! - `POST /admin/settings` accepts a sparse form and returns a [`SaveResponse`]
//! - `POST /admin/content-type` checks one value ([`CheckTypeRequest`])
//!
//! A save submission, as JSON:
//!
//! ```json
//! {
//!   "suffix_1": "host-meta",
//!   "type_1": "application/xrd+xml",
//!   "contents_1": "<XRD/>",
//!   "suffix_2": "",
//!   "contents_2": "deleted row"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content_type::Validation;
use crate::field::FieldError;
use crate::observability::MetricsSnapshot;
use crate::settings::{ConfigList, Revision, SparseForm};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub index: usize,
    pub suffix: String,
    pub content_type: String,
    pub contents: String,
}

impl EntryView {
    pub fn from_list(list: &ConfigList) -> Vec<Self> {
        list.iter_indexed()
            .map(|(index, entry)| EntryView {
                index,
                suffix: entry.suffix.clone(),
                content_type: entry.content_type.clone(),
                contents: entry.contents.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SettingsResponse {
    pub entries: Vec<EntryView>,
    pub form: SparseForm,
    /// Type served for entries without one
    pub default_content_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SaveResponse {
    pub revision: Revision,
    pub entries: Vec<EntryView>,
    /// Rejected fields; the rest of the form was saved
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckTypeRequest {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckTypeResponse {
    pub valid: bool,
    pub normalized: String,
    pub errors: Vec<FieldError>,
}

impl From<Validation> for CheckTypeResponse {
    fn from(validation: Validation) -> Self {
        Self {
            valid: validation.is_valid(),
            normalized: validation.normalized,
            errors: validation.errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
