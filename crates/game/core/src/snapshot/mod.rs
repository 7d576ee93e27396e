//! Flat, wire-ready copies of cooldown states.
//!
//! A [`CooldownSnapshot`] carries the superset of every variant's fields,
//! tagged by ability and variant. The authoritative side builds one with
//! [`CooldownSnapshot::create`], checks it against later state with
//! [`CooldownSnapshot::matches`] to decide whether to resend, and ships it as
//! the fixed layout in [`wire`]. The receiving side reconciles with
//! [`CooldownState::refresh`](crate::cooldown::CooldownState::refresh).

mod codec;
pub mod fields;
pub mod wire;

pub use fields::SnapshotFields;
pub use wire::{SNAPSHOT_VERSION, SNAPSHOT_WIRE_LEN, SnapshotError};

use crate::ability::AbilityKey;
use crate::cooldown::CooldownKind;

/// Union of all cooldown fields, keyed by ability.
///
/// Field order mirrors the wire layout and must not change.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownSnapshot {
    pub ability_key: AbilityKey,
    pub kind: CooldownKind,
    pub fields: SnapshotFields,

    pub configured_cooldown: f32,
    pub current_countdown: f32,
    pub playback_speed: f32,

    pub current_stage: u8,
    pub max_stage: u8,
    pub window_remaining: f32,
    pub in_window: bool,
    pub combo_started: bool,

    pub playback_time: f32,
    pub fired_mask: u16,
    pub reset_window_remaining: f32,
    pub reset_window_armed: bool,
}

impl CooldownSnapshot {
    /// An all-zero snapshot of `kind` for `ability_key`.
    pub fn empty(ability_key: AbilityKey, kind: CooldownKind) -> Self {
        Self {
            ability_key,
            kind,
            fields: SnapshotFields::for_kind(kind),
            configured_cooldown: 0.0,
            current_countdown: 0.0,
            playback_speed: 0.0,
            current_stage: 0,
            max_stage: 0,
            window_remaining: 0.0,
            in_window: false,
            combo_started: false,
            playback_time: 0.0,
            fired_mask: 0,
            reset_window_remaining: 0.0,
            reset_window_armed: false,
        }
    }

    /// True if the snapshot carries exactly its variant's field groups.
    ///
    /// Partial snapshots are never compared or applied.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.fields == SnapshotFields::for_kind(self.kind)
    }
}
