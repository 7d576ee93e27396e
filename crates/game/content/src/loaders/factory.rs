//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use ability_core::EngineConfig;

use crate::loaders::{AbilityLoader, ConditionLoader, ConfigLoader, LoadResult};
use crate::table::{AbilityTable, ConditionSpec};

/// Everything the runtime needs to start simulating.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: EngineConfig,
    pub abilities: AbilityTable,
    pub conditions: Vec<ConditionSpec>,
}

/// Content factory that loads timing content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── engine.toml
/// ├── abilities.ron
/// └── conditions.ron   (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load engine configuration from `engine.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        ConfigLoader::load(&self.data_dir.join("engine.toml"))
    }

    /// Load the ability timing table from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityTable> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load condition specs from `conditions.ron`; a missing file means none.
    pub fn load_conditions(&self) -> LoadResult<Vec<ConditionSpec>> {
        let path = self.data_dir.join("conditions.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ConditionLoader::load(&path)
    }

    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            config: self.load_config()?,
            abilities: self.load_abilities()?,
            conditions: self.load_conditions()?,
        })
    }
}
