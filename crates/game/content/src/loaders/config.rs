//! Engine configuration loader.

use std::path::Path;

use ability_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.snapshot_interval_ticks == 0 {
            anyhow::bail!("snapshot_interval_ticks must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("game_seed = 99").unwrap();
        assert_eq!(config.game_seed, 99);
        assert_eq!(
            config.timestamp_tolerance_ms,
            EngineConfig::DEFAULT_TIMESTAMP_TOLERANCE_MS
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp_tolerance_ms = 2500\nsnapshot_interval_ticks = 10").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.timestamp_tolerance_ms, 2500);
        assert_eq!(config.snapshot_interval_ticks, 10);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(ConfigLoader::parse("snapshot_interval_ticks = 0").is_err());
    }
}
