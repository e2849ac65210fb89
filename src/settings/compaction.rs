//! Renumbering of sparse settings forms.
//!
//! Rows are correlated only by their numeric index, so the form is first read
//! into an explicit `index -> (kind -> value)` table and whole rows are moved
//! from there. Rows are probed from 1 upwards and the scan stops at the first
//! index without a `suffix_N` key.

use std::collections::BTreeMap;

use super::models::SparseForm;
use crate::field::FieldKind;

type Row<'a> = BTreeMap<&'a str, &'a str>;

/// Drop rows with an empty suffix and renumber the survivors 1..=N, keeping
/// their relative order and every field of each row together.
///
/// The result is already canonical: `compact(&compact(x)) == compact(x)`.
pub fn compact(sparse: &SparseForm) -> SparseForm {
    let table = field_table(sparse);
    let suffix = FieldKind::Suffix.as_str();

    let mut compacted = SparseForm::new();
    let mut next = 1;
    for index in 1.. {
        let Some(row) = table.get(&index) else {
            break;
        };
        let Some(row_suffix) = row.get(suffix) else {
            break;
        };
        if row_suffix.is_empty() {
            continue;
        }

        for (kind, value) in row {
            compacted.insert(format!("{kind}_{next}"), (*value).to_string());
        }
        next += 1;
    }

    compacted
}

fn field_table(sparse: &SparseForm) -> BTreeMap<usize, Row<'_>> {
    let mut table: BTreeMap<usize, Row<'_>> = BTreeMap::new();
    for (key, value) in sparse {
        if let Some((kind, index)) = split_key(key) {
            table.entry(index).or_default().insert(kind, value.as_str());
        }
    }
    table
}

/// Split `kind_N` into its kind and positive index.
///
/// The index must be written canonically: `suffix_01` is not row 1.
pub fn split_key(key: &str) -> Option<(&str, usize)> {
    let (kind, digits) = key.rsplit_once('_')?;
    if kind.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.starts_with('0') {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((kind, index))
}
