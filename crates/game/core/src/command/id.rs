//! 32-bit command identifiers.
//!
//! ```text
//!  31 | 30 ........ 16 | 15 ........ 0
//! srv |  time segment  |   sequence
//! ```
//!
//! The time segment is the second within the current hour, so two commands
//! from the same origin collide only if their sequences wrap inside the same
//! second of an hour-aligned cycle.

use core::fmt;

/// Packed origin flag, time segment and sequence number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandId(pub u32);

impl CommandId {
    const SERVER_BIT: u32 = 1 << 31;
    const TIME_SHIFT: u32 = 16;
    const TIME_MASK: u32 = 0x7fff;
    const SEQUENCE_MASK: u32 = 0xffff;

    /// Seconds per time-segment cycle.
    pub const SEGMENT_CYCLE_SECS: i64 = 3_600;

    pub const fn compose(is_server: bool, time_segment: u16, sequence: u16) -> Self {
        let origin = if is_server { Self::SERVER_BIT } else { 0 };
        let time = (time_segment as u32 & Self::TIME_MASK) << Self::TIME_SHIFT;
        Self(origin | time | sequence as u32)
    }

    /// Time segment for a wall-clock timestamp in milliseconds.
    pub const fn time_segment_at(now_ms: i64) -> u16 {
        (now_ms.div_euclid(1_000).rem_euclid(Self::SEGMENT_CYCLE_SECS)) as u16
    }

    pub const fn is_server(self) -> bool {
        self.0 & Self::SERVER_BIT != 0
    }

    pub const fn time_segment(self) -> u16 {
        ((self.0 >> Self::TIME_SHIFT) & Self::TIME_MASK) as u16
    }

    pub const fn sequence(self) -> u16 {
        (self.0 & Self::SEQUENCE_MASK) as u16
    }

    /// Splits the id into `(is_server, time_segment, sequence)`.
    pub const fn deconstruct(self) -> (bool, u16, u16) {
        (self.is_server(), self.time_segment(), self.sequence())
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = if self.is_server() { "srv" } else { "cli" };
        write!(f, "{origin}:{}:{}", self.time_segment(), self.sequence())
    }
}

/// Issues command ids with one wrapping sequence per origin.
#[derive(Clone, Debug, Default)]
pub struct CommandIdGenerator {
    client_sequence: u16,
    server_sequence: u16,
}

impl CommandIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, is_server: bool, now_ms: i64) -> CommandId {
        let counter = if is_server {
            &mut self.server_sequence
        } else {
            &mut self.client_sequence
        };
        let sequence = *counter;
        *counter = counter.wrapping_add(1);
        CommandId::compose(is_server, CommandId::time_segment_at(now_ms), sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_in_the_same_second_differ_by_sequence() {
        let mut ids = CommandIdGenerator::new();
        let now = 1_700_000_123_456;

        let a = ids.next(false, now);
        let b = ids.next(false, now + 200);
        assert_ne!(a, b);
        assert_ne!(a.sequence(), b.sequence());

        let (server_a, segment_a, _) = a.deconstruct();
        let (server_b, segment_b, _) = b.deconstruct();
        assert!(!server_a && !server_b);
        assert_eq!(segment_a, segment_b);
        assert_eq!(segment_a, CommandId::time_segment_at(now));
    }

    #[test]
    fn origins_keep_separate_sequences() {
        let mut ids = CommandIdGenerator::new();
        let client = ids.next(false, 0);
        let server = ids.next(true, 0);

        assert_eq!(client.sequence(), 0);
        assert_eq!(server.sequence(), 0);
        assert!(server.is_server());
        assert!(!client.is_server());
    }

    #[test]
    fn compose_round_trips() {
        let id = CommandId::compose(true, 3_599, u16::MAX);
        assert_eq!(id.deconstruct(), (true, 3_599, u16::MAX));
        assert_eq!(id.to_string(), "srv:3599:65535");
    }

    #[test]
    fn sequence_wraps() {
        let mut ids = CommandIdGenerator {
            client_sequence: u16::MAX,
            server_sequence: 0,
        };
        assert_eq!(ids.next(false, 0).sequence(), u16::MAX);
        assert_eq!(ids.next(false, 0).sequence(), 0);
    }
}
