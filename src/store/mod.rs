//! In-memory state
//!
//! The ingredient catalog, its built-in defaults, and the settings store.

mod catalog;
mod defaults;
mod settings;

pub use catalog::{load_catalog, parse_catalog, Catalog};
pub use defaults::default_catalog;
pub use settings::{MemorySettingsStore, SettingsStore};
