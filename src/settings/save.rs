use tracing::debug;

use super::compaction::split_key;
use super::models::{ConfigList, Entry, SparseForm};
use crate::content_type;
use crate::field::{ErrorCode, FieldError, FieldKind};

/// Result of applying a submitted settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Canonical list to persist.
    pub list: ConfigList,
    /// Every rejected field; rejected fields keep their previous value.
    pub errors: Vec<FieldError>,
}

/// Validate a submitted form against the currently stored list and compact it.
///
/// Fields are checked independently: an invalid suffix or type keeps the
/// value the row had in `previous` (or nothing for a new row) while the rest
/// of the row, and every other row, is still applied. Keys that are not
/// `suffix_N`, `type_N` or `contents_N` are ignored.
pub fn apply_form(previous: &ConfigList, form: &SparseForm) -> SaveOutcome {
    let mut candidate = SparseForm::new();
    let mut errors = Vec::new();

    for (key, value) in form {
        let Some((kind, index)) = split_key(key).and_then(|(kind, index)| {
            parse_kind(kind).map(|kind| (kind, index))
        }) else {
            debug!(key = %key, "Ignoring unknown settings field");
            continue;
        };
        let before = previous.get(index);

        let accepted = match kind {
            FieldKind::Suffix => {
                let suffix = value.trim();
                if suffix.contains('/') {
                    errors.push(FieldError::new(
                        key.as_str(),
                        ErrorCode::InvalidSuffix,
                        format!("Suffix '{suffix}' must not contain '/'"),
                    ));
                    previous_field(before, kind)
                } else {
                    suffix.to_string()
                }
            }
            FieldKind::Type => {
                let validation = content_type::validate_field(key, value);
                if validation.is_valid() {
                    validation.normalized
                } else {
                    errors.extend(validation.errors);
                    previous_field(before, kind)
                }
            }
            FieldKind::Contents => value.clone(),
        };

        candidate.insert(key.clone(), accepted);
    }

    SaveOutcome {
        list: ConfigList::from_form(&candidate),
        errors,
    }
}

fn parse_kind(kind: &str) -> Option<FieldKind> {
    FieldKind::ALL.into_iter().find(|k| k.as_str() == kind)
}

fn previous_field(entry: Option<&Entry>, kind: FieldKind) -> String {
    entry
        .map(|entry| match kind {
            FieldKind::Suffix => entry.suffix.clone(),
            FieldKind::Type => entry.content_type.clone(),
            FieldKind::Contents => entry.contents.clone(),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> SparseForm {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn stored() -> ConfigList {
        ConfigList::new(vec![
            Entry::builder()
                .suffix("host-meta")
                .content_type("application/xrd+xml")
                .contents("<XRD/>")
                .build(),
            Entry::builder().suffix("security.txt").contents("Contact: a").build(),
        ])
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let outcome = apply_form(
            &ConfigList::empty(),
            &form(&[
                ("suffix_1", "  nodeinfo "),
                ("type_1", " Application/json ; charset=utf-8"),
                ("contents_1", "{}"),
            ]),
        );

        assert!(outcome.errors.is_empty());
        let entry = outcome.list.get(1).unwrap();
        assert_eq!(entry.suffix, "nodeinfo");
        assert_eq!(entry.content_type, "application/json; charset=utf-8");
        assert_eq!(entry.contents, "{}");
    }

    #[test]
    fn test_slash_in_suffix_keeps_previous_suffix() {
        let outcome = apply_form(
            &stored(),
            &form(&[
                ("suffix_1", "a/b"),
                ("type_1", ""),
                ("contents_1", "updated"),
            ]),
        );

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "suffix_1");
        assert_eq!(outcome.errors[0].code, ErrorCode::InvalidSuffix);

        let entry = outcome.list.get(1).unwrap();
        assert_eq!(entry.suffix, "host-meta");
        assert_eq!(entry.contents, "updated");
    }

    #[test]
    fn test_slash_in_new_row_never_persists() {
        let outcome = apply_form(
            &ConfigList::empty(),
            &form(&[("suffix_1", "a/b"), ("contents_1", "body")]),
        );

        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.list.is_empty());
        assert!(outcome.list.iter_indexed().all(|(_, e)| !e.suffix.contains('/')));
    }

    #[test]
    fn test_invalid_type_keeps_previous_type_and_saves_rest() {
        let outcome = apply_form(
            &stored(),
            &form(&[
                ("suffix_1", "host-meta.json"),
                ("type_1", "image/png"),
                ("contents_1", "{\"links\":[]}"),
                ("suffix_2", "security.txt"),
                ("type_2", "text/"),
                ("contents_2", "Contact: b"),
            ]),
        );

        let fields: Vec<&str> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["type_1", "type_2", "type_2"]);

        let first = outcome.list.get(1).unwrap();
        assert_eq!(first.suffix, "host-meta.json");
        assert_eq!(first.content_type, "application/xrd+xml");
        assert_eq!(first.contents, "{\"links\":[]}");

        let second = outcome.list.get(2).unwrap();
        assert_eq!(second.content_type, "");
        assert_eq!(second.contents, "Contact: b");
    }

    #[test]
    fn test_deleting_row_compacts() {
        let outcome = apply_form(
            &stored(),
            &form(&[
                ("suffix_1", ""),
                ("contents_1", "<XRD/>"),
                ("suffix_2", "security.txt"),
                ("contents_2", "Contact: a"),
                ("suffix_3", "new"),
                ("contents_3", "fresh"),
            ]),
        );

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.list.len(), 2);
        assert_eq!(outcome.list.get(1).unwrap().suffix, "security.txt");
        assert_eq!(outcome.list.get(2).unwrap().contents, "fresh");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let outcome = apply_form(
            &ConfigList::empty(),
            &form(&[("suffix_1", "a"), ("submit", "Save"), ("color_1", "red")]),
        );

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.list.len(), 1);
        assert_eq!(outcome.list.to_form().len(), 3);
    }
}
