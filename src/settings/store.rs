use std::path::Path;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::Result;
use super::models::{ConfigList, SparseForm};

/// Key holding the canonical sparse form in the `options` partition.
pub const OPTION_KEY: &str = "option:well_known";
/// Key holding the last [`Revision`] in the `metadata` partition.
pub const REVISION_KEY: &str = "meta:revision";

/// Persistence for the entry list.
///
/// Saves replace the whole value; concurrent saves are last-write-wins.
pub trait ConfigStore: Send + Sync {
    /// Current canonical list; an unset or malformed value loads as empty.
    fn load(&self) -> Result<ConfigList>;

    /// Replace the stored list.
    fn save(&self, list: &ConfigList) -> Result<Revision>;
}

/// Bookkeeping for one successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: Uuid,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub saved_at: chrono::DateTime<chrono::Utc>,
    pub entries: usize,
}

impl Revision {
    pub fn for_list(list: &ConfigList) -> Self {
        Self {
            id: Uuid::now_v7(),
            saved_at: chrono::Utc::now(),
            entries: list.len(),
        }
    }
}

/// Decode a stored blob into a sparse form.
///
/// Anything other than a JSON object means "never configured". Non-string
/// scalars are kept in their JSON text form; nulls and nested values are
/// dropped.
pub fn decode_blob(value: &Value) -> SparseForm {
    let Value::Object(map) = value else {
        return SparseForm::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Fjall-backed settings store
#[derive(Clone)]
pub struct FjallConfigStore {
    keyspace: Keyspace,
    options: PartitionHandle,
    metadata: PartitionHandle,
}

impl FjallConfigStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening settings store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;
        let options = keyspace.open_partition("options", PartitionCreateOptions::default())?;
        let metadata = keyspace.open_partition("metadata", PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            options,
            metadata,
        })
    }

    /// Raw sparse form as stored, before compaction.
    pub fn load_form(&self) -> Result<SparseForm> {
        match self.options.get(OPTION_KEY)? {
            Some(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Ok(decode_blob(&value)),
                Err(err) => {
                    warn!(error = %err, "Stored settings are not valid JSON, treating as empty");
                    Ok(SparseForm::new())
                }
            },
            None => Ok(SparseForm::new()),
        }
    }

    /// Last recorded save, if any
    pub fn revision(&self) -> Result<Option<Revision>> {
        match self.metadata.get(REVISION_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl ConfigStore for FjallConfigStore {
    fn load(&self) -> Result<ConfigList> {
        let form = self.load_form()?;
        Ok(ConfigList::from_form(&form))
    }

    fn save(&self, list: &ConfigList) -> Result<Revision> {
        let revision = Revision::for_list(list);

        self.options
            .insert(OPTION_KEY.as_bytes(), serde_json::to_vec(&list.to_form())?)?;
        self.metadata
            .insert(REVISION_KEY.as_bytes(), serde_json::to_vec(&revision)?)?;
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;

        debug!(revision = %revision.id, entries = revision.entries, "Saved settings");
        Ok(revision)
    }
}
