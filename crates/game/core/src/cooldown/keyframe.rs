//! Keyframe bookkeeping shared by the timeline and keyframe-combo variants.

use arrayvec::ArrayVec;

use super::profile::Keyframe;
use crate::ability::{AbilityKey, EventTag};
use crate::config::EngineConfig;

/// Keyframes sorted by `trigger_offset`.
pub type Keyframes = ArrayVec<Keyframe, { EngineConfig::MAX_KEYFRAMES }>;

/// Copies keyframes into fixed storage, sorted by trigger offset.
pub(crate) fn sorted_keyframes(source: &[Keyframe], capacity: usize) -> Keyframes {
    let mut keyframes: Keyframes = source.iter().take(capacity).copied().collect();
    keyframes.sort_by(|a, b| a.trigger_offset.total_cmp(&b.trigger_offset));
    keyframes
}

/// Notification pushed when playback reaches a keyframe.
///
/// Consumed by the animation/VFX layer; never part of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyframeEvent {
    pub ability: AbilityKey,
    pub tag: EventTag,
    /// Keyframe index on a timeline, or the combo stage that was reached.
    pub stage: u8,
    /// Playback time at which the keyframe was detected.
    pub playback_time: f32,
}

/// Set of keyframe indices that already fired this cycle.
///
/// Stored as a 16-bit mask so it travels on the wire unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiredKeyframes(u16);

impl FiredKeyframes {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every index below `count` marked as fired.
    pub fn all(count: usize) -> Self {
        if count >= 16 {
            Self(u16::MAX)
        } else {
            Self((1u16 << count) - 1)
        }
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, index: usize) -> bool {
        index < 16 && self.0 & (1 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        if index < 16 {
            self.0 |= 1 << index;
        }
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// True once every index below `count` has fired.
    pub fn is_complete(self, count: usize) -> bool {
        self.0 & Self::all(count).0 == Self::all(count).0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}
