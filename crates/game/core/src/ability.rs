//! Ability identifiers shared by client and server.
//!
//! [`AbilityKey`] names an animation-driven ability. Its numeric code is part of
//! the snapshot wire contract, so existing codes must never be renumbered;
//! new abilities are appended.

use core::fmt;

/// Opaque identifier for an animation/ability.
///
/// Stable across client and server; keys one `CooldownState` per actor.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u16)]
pub enum AbilityKey {
    #[default]
    Idle = 0,
    Move = 1,
    Run = 2,
    Attack = 3,
    HeavyAttack = 4,
    Roll = 5,
    Dash = 6,
    Jump = 7,
    Hit = 8,
    Dead = 9,
    Skill1 = 10,
    Skill2 = 11,
    Skill3 = 12,
    Ultimate = 13,
    Interact = 14,
    Emote = 15,
}

impl AbilityKey {
    /// Returns the wire code of this key.
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Decodes a wire code. Returns `None` for codes this build does not know.
    pub const fn from_code(code: u16) -> Option<Self> {
        let key = match code {
            0 => Self::Idle,
            1 => Self::Move,
            2 => Self::Run,
            3 => Self::Attack,
            4 => Self::HeavyAttack,
            5 => Self::Roll,
            6 => Self::Dash,
            7 => Self::Jump,
            8 => Self::Hit,
            9 => Self::Dead,
            10 => Self::Skill1,
            11 => Self::Skill2,
            12 => Self::Skill3,
            13 => Self::Ultimate,
            14 => Self::Interact,
            15 => Self::Emote,
            _ => return None,
        };
        Some(key)
    }

    /// Returns true for abilities that represent skills rather than basic moves.
    pub const fn is_skill(self) -> bool {
        matches!(
            self,
            Self::Skill1 | Self::Skill2 | Self::Skill3 | Self::Ultimate
        )
    }
}

/// Tag emitted when playback crosses a keyframe.
///
/// Tags are opaque to the engine; the animation/VFX layer maps them to effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventTag(pub u16);

impl EventTag {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}
