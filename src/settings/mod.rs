//! Configured well-known entries: data model, compaction, save path and
//! persistence.
//!
//! ## Flow
//!
//! An administrator submits a sparse form (`suffix_N`, `type_N`,
//! `contents_N`). [`apply_form`] validates each field independently against
//! the stored list, then [`compact`] drops deleted rows and renumbers the
//! rest. The resulting [`ConfigList`] is written through a [`ConfigStore`],
//! which is the only thing the dispatcher ever reads.
//!
//! ```rust,ignore
//! use wellknown::settings::{apply_form, ConfigStore, FjallConfigStore};
//!
//! let store = FjallConfigStore::open("data/settings")?;
//! let outcome = apply_form(&store.load()?, &submitted);
//! store.save(&outcome.list)?;
//! ```

pub mod compaction;
pub mod error;
pub mod memory;
pub mod models;
pub mod save;
pub mod store;

pub use compaction::compact;
pub use error::{Result, StoreError};
pub use memory::MemoryConfigStore;
pub use models::{ConfigList, Entry, SparseForm};
pub use save::{SaveOutcome, apply_form};
pub use store::{ConfigStore, FjallConfigStore, Revision};
