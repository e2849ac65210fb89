use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::compaction::compact;
use crate::field::FieldKind;

/// Flat `{kind}_{index}` -> value map, as submitted by the settings form and
/// as persisted in the store.
pub type SparseForm = BTreeMap<String, String>;

/// One configured well-known responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct Entry {
    /// Literal prefix matched against the path after `/.well-known/`.
    #[builder(into)]
    pub suffix: String,
    /// Normalized Content-Type, or empty for the site default.
    #[builder(into, default)]
    #[serde(default)]
    pub content_type: String,
    #[builder(into, default)]
    #[serde(default)]
    pub contents: String,
}

/// Ordered entries, addressed 1..=N without gaps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigList {
    entries: Vec<Entry>,
}

impl ConfigList {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the canonical list from a sparse form, compacting it first.
    pub fn from_form(form: &SparseForm) -> Self {
        let compacted = compact(form);
        let field = |kind: FieldKind, index: usize| {
            compacted
                .get(&kind.key(index))
                .cloned()
                .unwrap_or_default()
        };

        let entries = (1..)
            .map_while(|index| {
                compacted.get(&FieldKind::Suffix.key(index)).map(|suffix| Entry {
                    suffix: suffix.clone(),
                    content_type: field(FieldKind::Type, index),
                    contents: field(FieldKind::Contents, index),
                })
            })
            .collect();

        Self { entries }
    }

    /// Contiguous sparse form: `suffix_1`, `type_1`, `contents_1`, `suffix_2`, ...
    pub fn to_form(&self) -> SparseForm {
        let mut form = SparseForm::new();
        for (index, entry) in self.iter_indexed() {
            form.insert(FieldKind::Suffix.key(index), entry.suffix.clone());
            form.insert(FieldKind::Type.key(index), entry.content_type.clone());
            form.insert(FieldKind::Contents.key(index), entry.contents.clone());
        }
        form
    }

    /// Entry at a 1-based index.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Entries paired with their 1-based index, in order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries.iter().enumerate().map(|(i, entry)| (i + 1, entry))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for ConfigList {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
