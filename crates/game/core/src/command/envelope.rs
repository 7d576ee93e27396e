use core::fmt;

use super::{CommandId, CommandPayload, CommandType};

/// Network connection that issued a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    /// Connection slot used for commands issued by the host itself.
    pub const HOST: Self = Self(0);
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Trust level of a command's origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Authority {
    /// Player input; the connection must be active.
    Client,
    /// Authoritative decision; an authoritative context must be running.
    Server,
    /// Engine-internal; always trusted.
    System,
}

/// A tick-stamped, timestamped, authority-tagged command.
///
/// Built once at the point of input or decision, validated once, then applied
/// or dropped. `command_type` is the raw wire code so an unknown or
/// inconsistent code can be reported instead of failing to parse.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandEnvelope {
    pub connection_id: ConnectionId,
    pub tick: i64,
    pub command_type: u16,
    pub command_id: CommandId,
    pub timestamp_ms: i64,
    pub authority: Authority,
    pub payload: CommandPayload,
}

impl CommandEnvelope {
    /// Builds an envelope whose type code agrees with `payload`.
    pub fn new(
        connection_id: ConnectionId,
        tick: i64,
        command_id: CommandId,
        timestamp_ms: i64,
        authority: Authority,
        payload: CommandPayload,
    ) -> Self {
        Self {
            connection_id,
            tick,
            command_type: payload.command_type().code(),
            command_id,
            timestamp_ms,
            authority,
            payload,
        }
    }

    /// The decoded command type, if the code is known.
    pub fn kind(&self) -> Option<CommandType> {
        CommandType::from_code(self.command_type)
    }
}
