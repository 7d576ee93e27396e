//! Per-ability timing state machines.
//!
//! Every ability an actor owns is tracked by one [`CooldownState`]. The state
//! is a closed union over four timing disciplines:
//!
//! - `Simple`: a plain cooldown
//! - `ComboWindow`: multi-stage combo advanced by input inside bounded windows
//! - `KeyframeTimeline`: availability and events follow animation playback
//! - `KeyframeCombo`: combo stages gated by reaching each stage's keyframe
//!
//! All variants share [`CooldownHeader`] and are driven the same way: the tick
//! loop calls [`Cooldown::update`] with the elapsed seconds and
//! [`Cooldown::use_ability`] for every accepted use command. Nothing here
//! performs I/O, so client prediction and the authoritative server step the
//! same code.

pub mod combo;
pub mod header;
pub mod keyframe;
pub mod keyframe_combo;
pub mod profile;
pub mod simple;
pub mod timeline;

pub use combo::{ComboWindowCooldown, ComboWindows};
pub use header::{CooldownHeader, non_negative};
pub use keyframe::{FiredKeyframes, KeyframeEvent, Keyframes};
pub use keyframe_combo::KeyframeComboCooldown;
pub use profile::{Keyframe, ProfileError, TimingProfile};
pub use simple::SimpleCooldown;
pub use timeline::KeyframeTimelineCooldown;

use crate::ability::AbilityKey;

/// Operations every timing discipline supports.
pub trait Cooldown {
    /// The ability this state tracks.
    fn ability_key(&self) -> AbilityKey;

    /// True if a use issued now would be accepted.
    fn is_ready(&self) -> bool;

    /// Attempts to use the ability. Returns false (and changes nothing) if it
    /// is not ready.
    fn use_ability(&mut self) -> bool;

    /// Advances all timers by `dt` seconds. Negative input is treated as zero.
    fn update(&mut self, dt: f32);
}

/// Wire tag of a timing discipline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum CooldownKind {
    Simple = 1,
    ComboWindow = 2,
    KeyframeTimeline = 3,
    KeyframeCombo = 4,
}

impl CooldownKind {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Simple),
            2 => Some(Self::ComboWindow),
            3 => Some(Self::KeyframeTimeline),
            4 => Some(Self::KeyframeCombo),
            _ => None,
        }
    }
}

/// Timing state of one ability on one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CooldownState {
    Simple(SimpleCooldown),
    ComboWindow(ComboWindowCooldown),
    KeyframeTimeline(KeyframeTimelineCooldown),
    KeyframeCombo(KeyframeComboCooldown),
}

macro_rules! dispatch {
    ($state:expr, $inner:ident => $body:expr) => {
        match $state {
            CooldownState::Simple($inner) => $body,
            CooldownState::ComboWindow($inner) => $body,
            CooldownState::KeyframeTimeline($inner) => $body,
            CooldownState::KeyframeCombo($inner) => $body,
        }
    };
}

impl CooldownState {
    /// Builds the state described by `profile`.
    ///
    /// The profile is validated first; keyframe timelines are sorted by
    /// trigger offset while combo stages keep their configured order.
    pub fn from_profile(ability_key: AbilityKey, profile: &TimingProfile) -> Result<Self, ProfileError> {
        profile.validate()?;

        let state = match profile {
            TimingProfile::Simple { cooldown } => {
                Self::Simple(SimpleCooldown::new(ability_key, *cooldown))
            }
            TimingProfile::ComboWindow { windows, cooldown } => {
                Self::ComboWindow(ComboWindowCooldown::new(ability_key, windows, *cooldown))
            }
            TimingProfile::KeyframeTimeline { keyframes, cooldown } => Self::KeyframeTimeline(
                KeyframeTimelineCooldown::new(ability_key, keyframes, *cooldown),
            ),
            TimingProfile::KeyframeCombo { stages, cooldown } => {
                Self::KeyframeCombo(KeyframeComboCooldown::new(ability_key, stages, *cooldown))
            }
        };
        Ok(state)
    }

    pub fn kind(&self) -> CooldownKind {
        match self {
            Self::Simple(_) => CooldownKind::Simple,
            Self::ComboWindow(_) => CooldownKind::ComboWindow,
            Self::KeyframeTimeline(_) => CooldownKind::KeyframeTimeline,
            Self::KeyframeCombo(_) => CooldownKind::KeyframeCombo,
        }
    }

    pub fn header(&self) -> &CooldownHeader {
        dispatch!(self, state => &state.header)
    }

    pub fn current_countdown(&self) -> f32 {
        self.header().current_countdown
    }

    pub fn playback_speed(&self) -> f32 {
        dispatch!(self, state => state.playback_speed)
    }

    /// Sets the playback speed multiplier. Negative input is clamped to zero.
    pub fn set_playback_speed(&mut self, multiplier: f32) {
        dispatch!(self, state => state.set_playback_speed(multiplier))
    }

    /// Current combo stage; always zero for variants without stages.
    pub fn current_stage(&self) -> u8 {
        match self {
            Self::Simple(_) | Self::KeyframeTimeline(_) => 0,
            Self::ComboWindow(combo) => combo.current_stage,
            Self::KeyframeCombo(combo) => combo.current_stage,
        }
    }

    /// Number of configured stages; zero for variants without stages.
    pub fn max_stage(&self) -> u8 {
        match self {
            Self::Simple(_) | Self::KeyframeTimeline(_) => 0,
            Self::ComboWindow(combo) => combo.max_stage(),
            Self::KeyframeCombo(combo) => combo.stage_count(),
        }
    }

    /// Takes the keyframe events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<KeyframeEvent> {
        match self {
            Self::Simple(_) | Self::ComboWindow(_) => Vec::new(),
            Self::KeyframeTimeline(timeline) => timeline.drain_events(),
            Self::KeyframeCombo(combo) => combo.drain_events(),
        }
    }
}

impl Cooldown for CooldownState {
    fn ability_key(&self) -> AbilityKey {
        dispatch!(self, state => state.ability_key)
    }

    fn is_ready(&self) -> bool {
        dispatch!(self, state => state.is_ready())
    }

    fn use_ability(&mut self) -> bool {
        dispatch!(self, state => state.use_ability())
    }

    fn update(&mut self, dt: f32) {
        dispatch!(self, state => state.update(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::EventTag;

    fn all_variants() -> Vec<CooldownState> {
        let profiles = [
            (AbilityKey::Roll, TimingProfile::Simple { cooldown: 1.5 }),
            (
                AbilityKey::Attack,
                TimingProfile::ComboWindow {
                    windows: vec![0.5, 0.4, 0.3],
                    cooldown: 1.0,
                },
            ),
            (
                AbilityKey::Skill1,
                TimingProfile::KeyframeTimeline {
                    keyframes: vec![
                        Keyframe::new(0.2, 0.05, EventTag(1)),
                        Keyframe::new(0.5, 0.05, EventTag(2)).with_reset_window(0.3),
                    ],
                    cooldown: 0.8,
                },
            ),
            (
                AbilityKey::HeavyAttack,
                TimingProfile::KeyframeCombo {
                    stages: vec![
                        Keyframe::new(0.25, 0.05, EventTag(10)),
                        Keyframe::new(0.25, 0.05, EventTag(11)).with_reset_window(0.4),
                        Keyframe::new(0.3, 0.05, EventTag(12)).with_reset_window(0.4),
                    ],
                    cooldown: 2.0,
                },
            ),
        ];

        profiles
            .iter()
            .map(|(key, profile)| CooldownState::from_profile(*key, profile).unwrap())
            .collect()
    }

    #[test]
    fn invariants_hold_for_every_variant() {
        let steps = [0.05, 0.1, 0.3, 0.0, 0.7, 0.15, 1.2, 0.02, 0.45, 2.5];

        for mut state in all_variants() {
            for round in 0..200usize {
                if round % 3 != 1 {
                    state.use_ability();
                }
                state.update(steps[round % steps.len()]);
                if round % 7 == 0 {
                    state.update(-1.0);
                }

                assert!(state.current_countdown() >= 0.0, "{:?}", state.kind());
                assert!(state.current_stage() <= state.max_stage(), "{:?}", state.kind());
                state.drain_events();
            }
        }
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let err = CooldownState::from_profile(
            AbilityKey::Attack,
            &TimingProfile::ComboWindow {
                windows: vec![],
                cooldown: 1.0,
            },
        )
        .unwrap_err();
        assert_eq!(err, ProfileError::EmptyCombo);

        let err = CooldownState::from_profile(AbilityKey::Roll, &TimingProfile::Simple { cooldown: -1.0 })
            .unwrap_err();
        assert_eq!(err, ProfileError::NegativeDuration { field: "cooldown" });
    }

    #[test]
    fn negative_playback_speed_is_clamped() {
        for mut state in all_variants() {
            state.set_playback_speed(-2.0);
            assert_eq!(state.playback_speed(), 0.0);
        }
    }

    #[test]
    fn kind_tags_round_trip() {
        use strum::IntoEnumIterator;
        for kind in CooldownKind::iter() {
            assert_eq!(CooldownKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(CooldownKind::from_tag(0), None);
    }
}
