//! Content loaders for reading timing data from files.
//!
//! RON holds the per-ability and per-condition tables, TOML the engine
//! configuration. Every loader reports the offending file in its error.

pub mod abilities;
pub mod conditions;
pub mod config;
pub mod factory;

pub use abilities::{AbilityCatalog, AbilityEntry, AbilityLoader};
pub use conditions::{ConditionCatalog, ConditionLoader};
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
