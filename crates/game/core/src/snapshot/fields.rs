use bitflags::bitflags;

use crate::cooldown::CooldownKind;

bitflags! {
    /// Which groups of [`CooldownSnapshot`](super::CooldownSnapshot) fields a
    /// snapshot carries.
    ///
    /// Each timing variant owns a fixed mask. Fields outside the mask are zero
    /// on the wire and ignored by comparison and reconciliation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SnapshotFields: u16 {
        /// `configured_cooldown` and `current_countdown`.
        const COOLDOWN       = 1 << 0;
        const PLAYBACK_SPEED = 1 << 1;
        /// `current_stage` and `max_stage`.
        const STAGE          = 1 << 2;
        /// `window_remaining` and `in_window`.
        const WINDOW         = 1 << 3;
        const COMBO_STARTED  = 1 << 4;
        const PLAYBACK       = 1 << 5;
        const FIRED          = 1 << 6;
        /// `reset_window_remaining` and `reset_window_armed`.
        const RESET_WINDOW   = 1 << 7;
    }
}

impl SnapshotFields {
    /// The field groups a variant carries.
    pub const fn for_kind(kind: CooldownKind) -> Self {
        let base = Self::COOLDOWN.union(Self::PLAYBACK_SPEED);
        match kind {
            CooldownKind::Simple => base,
            CooldownKind::ComboWindow => base.union(Self::STAGE).union(Self::WINDOW),
            CooldownKind::KeyframeTimeline => base
                .union(Self::PLAYBACK)
                .union(Self::FIRED)
                .union(Self::RESET_WINDOW),
            CooldownKind::KeyframeCombo => base
                .union(Self::STAGE)
                .union(Self::WINDOW)
                .union(Self::COMBO_STARTED)
                .union(Self::PLAYBACK),
        }
    }
}
