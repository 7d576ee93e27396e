//! Declarative trigger conditions for equipment and skill effects.
//!
//! A [`ConditionChecker`] watches gameplay events (attacks landed, hits taken,
//! kills, resource thresholds...) and decides whether an effect fires. It
//! rate-limits itself with the same [`CooldownHeader`](crate::cooldown::CooldownHeader)
//! primitive the ability timers use, and its probability roll is
//! deterministic so client and server agree on the outcome.

mod checker;
mod header;

pub use checker::{ConditionChecker, ConditionKind};
pub use header::{ConditionHeader, ConditionParams};

use crate::ability::AbilityKey;

/// Gameplay event category a checker listens to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TriggerType {
    Attack,
    Hit,
    Skill,
    Kill,
    HpChanged,
    MpChanged,
    Critical,
    Dodge,
}

/// Who receives the effect of a fired condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetType {
    #[default]
    Owner,
    EventTarget,
    NearbyEnemies,
    NearbyAllies,
}

/// Something that happened to the owner of a checker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionEvent {
    /// The owner landed an attack on `target`.
    Attack { ability: AbilityKey, target: u32 },
    /// The owner was hit by `attacker`.
    Hit { attacker: u32 },
    /// The owner cast a skill.
    Skill { ability: AbilityKey },
    /// The owner killed `victim`.
    Kill { victim: u32 },
    /// The owner's HP changed; `ratio` is current / max.
    HpChanged { ratio: f32 },
    /// The owner's MP changed; `ratio` is current / max.
    MpChanged { ratio: f32 },
    /// The owner dealt a critical hit on `target`.
    Critical { target: u32 },
    /// The owner dodged an attack from `attacker`.
    Dodge { attacker: u32 },
}

impl ConditionEvent {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Attack { .. } => TriggerType::Attack,
            Self::Hit { .. } => TriggerType::Hit,
            Self::Skill { .. } => TriggerType::Skill,
            Self::Kill { .. } => TriggerType::Kill,
            Self::HpChanged { .. } => TriggerType::HpChanged,
            Self::MpChanged { .. } => TriggerType::MpChanged,
            Self::Critical { .. } => TriggerType::Critical,
            Self::Dodge { .. } => TriggerType::Dodge,
        }
    }

    /// Structural check used by command validation.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Attack { target, .. } | Self::Critical { target } => target > 0,
            Self::Hit { attacker } | Self::Dodge { attacker } => attacker > 0,
            Self::Kill { victim } => victim > 0,
            Self::HpChanged { ratio } | Self::MpChanged { ratio } => (0.0..=1.0).contains(&ratio),
            Self::Skill { ability } => ability.is_skill(),
        }
    }
}

/// What a fired condition asks the effect layer to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionOutcome {
    pub target_type: TargetType,
    pub target_count: u8,
}
