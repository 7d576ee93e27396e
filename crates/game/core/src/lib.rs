//! Deterministic ability timing shared by client prediction and the server.
//!
//! `ability-core` tracks, per actor and ability, whether an ability is usable,
//! advances combos, reacts to animation keyframes and reconciles predicted
//! state with authoritative snapshots. Everything here is pure: no I/O, no
//! clocks, no logging. The tick loop lives in `ability-runtime`.
//!
//! - [`cooldown`]: the four timing state machines behind [`CooldownState`]
//! - [`snapshot`]: flat snapshots, epsilon comparison and the pinned wire layout
//! - [`command`]: command envelope, ids, payloads and validation
//! - [`condition`]: rate-limited trigger conditions for equipment/skill effects
//! - [`env`]: oracles for connection authority and deterministic rolls
pub mod ability;
pub mod command;
pub mod condition;
pub mod config;
pub mod cooldown;
pub mod env;
pub mod error;
pub mod snapshot;

pub use ability::{AbilityKey, EventTag};
pub use command::{
    Authority, CommandEnvelope, CommandId, CommandIdGenerator, CommandPayload, CommandType,
    CommandValidator, ConnectionId, ValidationError, ValidationResult,
};
pub use condition::{
    ConditionChecker, ConditionEvent, ConditionHeader, ConditionKind, ConditionOutcome,
    TargetType, TriggerType,
};
pub use config::EngineConfig;
pub use cooldown::{
    Cooldown, CooldownHeader, CooldownKind, CooldownState, Keyframe, KeyframeEvent, ProfileError,
    TimingProfile,
};
pub use env::{AuthorityOracle, PcgRng, RollOracle, compute_seed};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use snapshot::{CooldownSnapshot, SnapshotError, SnapshotFields};
