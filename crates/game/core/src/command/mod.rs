//! Command envelope, identifiers, payloads and the validation pipeline.
//!
//! Commands are the only way game state changes. The outer loop wraps every
//! input or server decision in a [`CommandEnvelope`], runs it through
//! [`CommandValidator`] and the authority check, and applies it only if both
//! pass.

mod envelope;
mod id;
mod kind;
pub mod payload;
mod validator;

pub use envelope::{Authority, CommandEnvelope, ConnectionId};
pub use id::{CommandId, CommandIdGenerator};
pub use kind::CommandType;
pub use payload::{
    AbilityUseCommand, AdvanceTimeCommand, AnimationCommand, AttackCommand, ChatCommand,
    CommandPayload, EmoteCommand, EquipCommand, InputCommand, InteractionCommand, ItemDropCommand,
    ItemPickupCommand, ItemUseCommand, MoveCommand, PropertyCommand, RespawnCommand, RollCommand,
    SkillCommand, SnapshotRequestCommand, TargetList, TriggerCommand,
};
pub use validator::{CommandValidator, ValidationError, ValidationResult};
