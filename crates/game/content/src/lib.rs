//! Data-driven timing content and loaders.
//!
//! This crate turns content files into the values `ability-core` is
//! constructed from:
//! - Ability timing tables (RON): one [`TimingProfile`](ability_core::TimingProfile) per ability
//! - Condition tables (RON): trigger conditions for equipment and skills
//! - Engine configuration (TOML): tolerances, snapshot cadence, game seed
//!
//! Content is read once at startup and handed to the runtime; it never
//! appears in snapshots.

pub mod table;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use table::{AbilityTable, ConditionSpec};

#[cfg(feature = "loaders")]
pub use loaders::{AbilityLoader, ConditionLoader, ConfigLoader, ContentBundle, ContentFactory};
