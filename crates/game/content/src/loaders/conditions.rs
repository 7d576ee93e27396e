//! Condition table loader.

use std::path::Path;

use ability_core::ConditionChecker;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::table::ConditionSpec;

/// Condition table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionCatalog {
    pub conditions: Vec<ConditionSpec>,
}

/// Loader for condition checker tables from RON files.
pub struct ConditionLoader;

impl ConditionLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ConditionSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid condition table {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ConditionSpec>> {
        let catalog: ConditionCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse condition table RON: {}", e))?;

        for (index, spec) in catalog.conditions.iter().enumerate() {
            if !(0.0..=1.0).contains(&spec.probability) {
                anyhow::bail!("condition #{index}: probability {} outside [0, 1]", spec.probability);
            }
            if spec.cooldown < 0.0 {
                anyhow::bail!("condition #{index}: cooldown must not be negative");
            }
        }
        Ok(catalog.conditions)
    }

    /// Loads a table and builds one checker per entry.
    pub fn load_checkers(path: &Path) -> LoadResult<Vec<ConditionChecker>> {
        Ok(Self::load(path)?.iter().map(ConditionSpec::build).collect())
    }
}
