use std::sync::RwLock;

use super::error::{Result, StoreError};
use super::models::{ConfigList, SparseForm};
use super::store::{ConfigStore, Revision};

/// In-process store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    form: RwLock<SparseForm>,
    revision: RwLock<Option<Revision>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a list
    pub fn with_list(list: &ConfigList) -> Self {
        Self {
            form: RwLock::new(list.to_form()),
            revision: RwLock::new(None),
        }
    }

    pub fn revision(&self) -> Result<Option<Revision>> {
        let revision = self.revision.read().map_err(|_| StoreError::Poisoned)?;
        Ok(revision.clone())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<ConfigList> {
        let form = self.form.read().map_err(|_| StoreError::Poisoned)?;
        Ok(ConfigList::from_form(&form))
    }

    fn save(&self, list: &ConfigList) -> Result<Revision> {
        let revision = Revision::for_list(list);
        *self.form.write().map_err(|_| StoreError::Poisoned)? = list.to_form();
        *self.revision.write().map_err(|_| StoreError::Poisoned)? = Some(revision.clone());
        Ok(revision)
    }
}
