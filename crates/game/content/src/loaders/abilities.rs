//! Ability timing table loader.

use std::path::Path;

use ability_core::{AbilityKey, TimingProfile};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::table::AbilityTable;

/// One row of the ability table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub key: AbilityKey,
    pub profile: TimingProfile,
}

/// Ability table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityEntry>,
}

/// Loader for ability timing tables from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load and validate an ability table from a RON file.
    ///
    /// Fails on duplicate ability keys and on any profile that would be
    /// rejected by `CooldownState::from_profile`.
    pub fn load(path: &Path) -> LoadResult<AbilityTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid ability table {}: {}", path.display(), e))
    }

    /// Parse and validate an ability table from RON text.
    pub fn parse(content: &str) -> LoadResult<AbilityTable> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability table RON: {}", e))?;

        let mut table = AbilityTable::new();
        for entry in catalog.abilities {
            entry
                .profile
                .validate()
                .map_err(|e| anyhow::anyhow!("ability {}: {}", entry.key, e))?;
            if table.insert(entry.key, entry.profile).is_some() {
                anyhow::bail!("ability {} is defined more than once", entry.key);
            }
        }
        Ok(table)
    }
}
