//! Command payloads.
//!
//! Each payload knows its [`CommandType`] and checks its own structural
//! invariants in `is_valid`. Entity ids are `u32` with `0` reserved as "none".

use arrayvec::ArrayVec;

use super::CommandType;
use crate::ability::AbilityKey;
use crate::condition::ConditionEvent;
use crate::config::EngineConfig;

/// Target entity ids named by an attack or skill.
pub type TargetList = ArrayVec<u32, { EngineConfig::MAX_COMMAND_TARGETS }>;

fn finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn unit_axis(x: f32, y: f32) -> bool {
    finite(&[x, y]) && x * x + y * y <= 1.0 + EngineConfig::SNAPSHOT_EPSILON
}

// ============================================================================
// Timing
// ============================================================================

/// Sets a numeric property on an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyCommand {
    pub entity: u32,
    pub property: u16,
    pub value: f32,
}

/// Changes the playback speed of an ability's animation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationCommand {
    pub ability: AbilityKey,
    pub playback_speed: f32,
}

/// Basic attack against one or more targets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackCommand {
    pub ability: AbilityKey,
    pub targets: TargetList,
}

/// Skill cast. An empty target list is a self-cast.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCommand {
    pub ability: AbilityKey,
    pub targets: TargetList,
}

/// Uses an ability with no target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityUseCommand {
    pub ability: AbilityKey,
}

/// Advances every timer of the issuing actor by `dt` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvanceTimeCommand {
    pub dt: f32,
}

// ============================================================================
// Movement & input
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputCommand {
    pub buttons: u32,
    pub axis_x: f32,
    pub axis_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    pub direction_x: f32,
    pub direction_y: f32,
    pub run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollCommand {
    pub direction_x: f32,
    pub direction_y: f32,
}

// ============================================================================
// Items & interaction
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemUseCommand {
    pub slot: u8,
    pub item: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPickupCommand {
    pub item_entity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDropCommand {
    pub slot: u8,
    pub quantity: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipCommand {
    pub slot: u8,
    pub item: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionCommand {
    pub target: u32,
}

// ============================================================================
// Social & lifecycle
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmoteCommand {
    pub emote: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChatCommand {
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespawnCommand {
    pub spawn_point: u16,
}

/// Reports a gameplay event to the issuing actor's condition checkers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCommand {
    pub event: ConditionEvent,
}

/// Asks for the current snapshots of the listed abilities (all if empty).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotRequestCommand {
    pub abilities: Vec<AbilityKey>,
}

// ============================================================================
// Payload union
// ============================================================================

/// The body of a [`CommandEnvelope`](super::CommandEnvelope).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandPayload {
    Property(PropertyCommand),
    Animation(AnimationCommand),
    Attack(AttackCommand),
    Skill(SkillCommand),
    AbilityUse(AbilityUseCommand),
    AdvanceTime(AdvanceTimeCommand),
    Input(InputCommand),
    Move(MoveCommand),
    Jump,
    Roll(RollCommand),
    ItemUse(ItemUseCommand),
    ItemPickup(ItemPickupCommand),
    ItemDrop(ItemDropCommand),
    Equip(EquipCommand),
    Interaction(InteractionCommand),
    Emote(EmoteCommand),
    Chat(ChatCommand),
    Respawn(RespawnCommand),
    Trigger(TriggerCommand),
    SnapshotRequest(SnapshotRequestCommand),
}

impl CommandPayload {
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Property(_) => CommandType::Property,
            Self::Animation(_) => CommandType::Animation,
            Self::Attack(_) => CommandType::Attack,
            Self::Skill(_) => CommandType::Skill,
            Self::AbilityUse(_) => CommandType::AbilityUse,
            Self::AdvanceTime(_) => CommandType::AdvanceTime,
            Self::Input(_) => CommandType::Input,
            Self::Move(_) => CommandType::Move,
            Self::Jump => CommandType::Jump,
            Self::Roll(_) => CommandType::Roll,
            Self::ItemUse(_) => CommandType::ItemUse,
            Self::ItemPickup(_) => CommandType::ItemPickup,
            Self::ItemDrop(_) => CommandType::ItemDrop,
            Self::Equip(_) => CommandType::Equip,
            Self::Interaction(_) => CommandType::Interaction,
            Self::Emote(_) => CommandType::Emote,
            Self::Chat(_) => CommandType::Chat,
            Self::Respawn(_) => CommandType::Respawn,
            Self::Trigger(_) => CommandType::Trigger,
            Self::SnapshotRequest(_) => CommandType::SnapshotRequest,
        }
    }

    /// Payload-specific structural checks.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Property(cmd) => cmd.entity > 0 && cmd.value.is_finite(),
            Self::Animation(cmd) => cmd.playback_speed.is_finite(),
            Self::Attack(cmd) => !cmd.targets.is_empty() && cmd.targets.iter().all(|t| *t > 0),
            Self::Skill(cmd) => cmd.ability.is_skill() && cmd.targets.iter().all(|t| *t > 0),
            Self::AbilityUse(_) | Self::Jump | Self::Emote(_) | Self::Respawn(_) => true,
            Self::AdvanceTime(cmd) => cmd.dt.is_finite(),
            Self::Input(cmd) => unit_axis(cmd.axis_x, cmd.axis_y),
            Self::Move(cmd) => unit_axis(cmd.direction_x, cmd.direction_y),
            Self::Roll(cmd) => unit_axis(cmd.direction_x, cmd.direction_y),
            Self::ItemUse(cmd) => cmd.item > 0,
            Self::ItemPickup(cmd) => cmd.item_entity > 0,
            Self::ItemDrop(cmd) => cmd.quantity > 0,
            Self::Equip(cmd) => cmd.item > 0,
            Self::Interaction(cmd) => cmd.target > 0,
            Self::Chat(cmd) => {
                !cmd.message.trim().is_empty() && cmd.message.len() <= EngineConfig::MAX_CHAT_LEN
            }
            Self::Trigger(cmd) => cmd.event.is_valid(),
            Self::SnapshotRequest(cmd) => cmd.abilities.len() <= u8::MAX as usize,
        }
    }

    /// The ability this payload uses, if it is a use.
    pub fn used_ability(&self) -> Option<AbilityKey> {
        match self {
            Self::Attack(cmd) => Some(cmd.ability),
            Self::Skill(cmd) => Some(cmd.ability),
            Self::AbilityUse(cmd) => Some(cmd.ability),
            Self::Jump => Some(AbilityKey::Jump),
            Self::Roll(_) => Some(AbilityKey::Roll),
            Self::Interaction(_) => Some(AbilityKey::Interact),
            Self::Emote(_) => Some(AbilityKey::Emote),
            _ => None,
        }
    }
}
