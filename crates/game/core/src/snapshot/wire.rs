//! Pinned little-endian layout of a [`CooldownSnapshot`].
//!
//! ```text
//! offset size field
//!      0    1 version (= 1)
//!      1    2 ability_key code
//!      3    1 variant tag
//!      4    2 field mask
//!      6    4 configured_cooldown
//!     10    4 current_countdown
//!     14    4 playback_speed
//!     18    1 current_stage
//!     19    1 max_stage
//!     20    4 window_remaining
//!     24    1 in_window
//!     25    1 combo_started
//!     26    4 playback_time
//!     30    2 fired_mask
//!     32    4 reset_window_remaining
//!     36    1 reset_window_armed
//! ```
//!
//! The layout is part of the client/server contract. Fields are only ever
//! appended behind a version bump.

use super::{CooldownSnapshot, SnapshotFields};
use crate::ability::AbilityKey;
use crate::cooldown::CooldownKind;
use crate::error::{ErrorSeverity, GameError};

pub const SNAPSHOT_VERSION: u8 = 1;
pub const SNAPSHOT_WIRE_LEN: usize = 37;

/// Errors raised while decoding snapshot bytes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot needs {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown ability code {0}")]
    UnknownAbility(u16),

    #[error("unknown cooldown variant tag {0}")]
    UnknownKind(u8),

    #[error("field mask {mask:#06x} is not the mask of variant {kind}")]
    FieldMismatch { kind: CooldownKind, mask: u16 },
}

impl GameError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Truncated { .. } | Self::UnknownAbility(_) | Self::FieldMismatch { .. } => {
                ErrorSeverity::Validation
            }
            Self::UnsupportedVersion(_) | Self::UnknownKind(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "SNAPSHOT_TRUNCATED",
            Self::UnsupportedVersion(_) => "SNAPSHOT_UNSUPPORTED_VERSION",
            Self::UnknownAbility(_) => "SNAPSHOT_UNKNOWN_ABILITY",
            Self::UnknownKind(_) => "SNAPSHOT_UNKNOWN_KIND",
            Self::FieldMismatch { .. } => "SNAPSHOT_FIELD_MISMATCH",
        }
    }
}

struct Writer<'a> {
    buf: &'a mut [u8; SNAPSHOT_WIRE_LEN],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    fn u16(&mut self, value: u16) {
        self.put(&value.to_le_bytes());
    }

    fn f32(&mut self, value: f32) {
        self.put(&value.to_le_bytes());
    }

    fn bool(&mut self, value: bool) {
        self.u8(u8::from(value));
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    fn bool(&mut self) -> bool {
        self.u8() != 0
    }
}

impl CooldownSnapshot {
    /// Encodes into the fixed wire layout.
    pub fn encode(&self) -> [u8; SNAPSHOT_WIRE_LEN] {
        let mut buf = [0u8; SNAPSHOT_WIRE_LEN];
        let mut w = Writer {
            buf: &mut buf,
            pos: 0,
        };

        w.u8(SNAPSHOT_VERSION);
        w.u16(self.ability_key.code());
        w.u8(self.kind.tag());
        w.u16(self.fields.bits());
        w.f32(self.configured_cooldown);
        w.f32(self.current_countdown);
        w.f32(self.playback_speed);
        w.u8(self.current_stage);
        w.u8(self.max_stage);
        w.f32(self.window_remaining);
        w.bool(self.in_window);
        w.bool(self.combo_started);
        w.f32(self.playback_time);
        w.u16(self.fired_mask);
        w.f32(self.reset_window_remaining);
        w.bool(self.reset_window_armed);
        debug_assert_eq!(w.pos, SNAPSHOT_WIRE_LEN);

        buf
    }

    /// Decodes one snapshot from the front of `bytes`. Trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < SNAPSHOT_WIRE_LEN {
            return Err(SnapshotError::Truncated {
                expected: SNAPSHOT_WIRE_LEN,
                actual: bytes.len(),
            });
        }

        let mut r = Reader { buf: bytes, pos: 0 };

        let version = r.u8();
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }
        let code = r.u16();
        let ability_key = AbilityKey::from_code(code).ok_or(SnapshotError::UnknownAbility(code))?;
        let tag = r.u8();
        let kind = CooldownKind::from_tag(tag).ok_or(SnapshotError::UnknownKind(tag))?;
        let mask = r.u16();
        let fields = SnapshotFields::for_kind(kind);
        if mask != fields.bits() {
            return Err(SnapshotError::FieldMismatch { kind, mask });
        }

        Ok(Self {
            ability_key,
            kind,
            fields,
            configured_cooldown: r.f32(),
            current_countdown: r.f32(),
            playback_speed: r.f32(),
            current_stage: r.u8(),
            max_stage: r.u8(),
            window_remaining: r.f32(),
            in_window: r.bool(),
            combo_started: r.bool(),
            playback_time: r.f32(),
            fired_mask: r.u16(),
            reset_window_remaining: r.f32(),
            reset_window_armed: r.bool(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::{Cooldown, CooldownState, TimingProfile};

    fn simple_attack() -> CooldownSnapshot {
        let mut state =
            CooldownState::from_profile(AbilityKey::Attack, &TimingProfile::Simple { cooldown: 2.0 })
                .unwrap();
        state.use_ability();
        state.update(1.0);
        CooldownSnapshot::create(&state)
    }

    #[test]
    fn layout_is_pinned() {
        let bytes = simple_attack().encode();
        let expected = concat!(
            "01", "0300", "01", "0300",
            "00000040", "0000803f", "0000803f",
            "00", "00", "00000000", "00", "00",
            "00000000", "0000", "00000000", "00",
        );
        assert_eq!(hex::encode(bytes), expected);
    }

    #[test]
    fn decode_restores_encoded_snapshot() {
        let snapshot = simple_attack();
        let decoded = CooldownSnapshot::decode(&snapshot.encode()).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn rejects_bad_input() {
        let bytes = simple_attack().encode();

        assert_eq!(
            CooldownSnapshot::decode(&bytes[..10]),
            Err(SnapshotError::Truncated {
                expected: SNAPSHOT_WIRE_LEN,
                actual: 10
            })
        );

        let mut bad = bytes;
        bad[0] = 9;
        assert_eq!(
            CooldownSnapshot::decode(&bad),
            Err(SnapshotError::UnsupportedVersion(9))
        );

        let mut bad = bytes;
        bad[3] = 7;
        let err = CooldownSnapshot::decode(&bad).unwrap_err();
        assert_eq!(err, SnapshotError::UnknownKind(7));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);

        let mut bad = bytes;
        bad[1] = 0xff;
        assert_eq!(
            CooldownSnapshot::decode(&bad),
            Err(SnapshotError::UnknownAbility(0x00ff))
        );

        let mut bad = bytes;
        bad[4] = 0b0100;
        assert!(matches!(
            CooldownSnapshot::decode(&bad),
            Err(SnapshotError::FieldMismatch { .. })
        ));
    }

    #[test]
    fn partial_field_masks_are_refused() {
        let bytes = simple_attack().encode();

        let mut empty = bytes;
        empty[4] = 0;
        empty[5] = 0;
        assert_eq!(
            CooldownSnapshot::decode(&empty),
            Err(SnapshotError::FieldMismatch {
                kind: CooldownKind::Simple,
                mask: 0
            })
        );

        let mut cooldown_only = bytes;
        cooldown_only[4] = SnapshotFields::COOLDOWN.bits() as u8;
        assert!(matches!(
            CooldownSnapshot::decode(&cooldown_only),
            Err(SnapshotError::FieldMismatch { mask: 1, .. })
        ));
    }
}
