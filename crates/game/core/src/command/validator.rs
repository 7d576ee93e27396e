//! Command validation pipeline.
//!
//! Validation is read-only: it collects every rule a command breaks into a
//! [`ValidationResult`] and never touches game state. Only commands that pass
//! both [`CommandValidator::validate`] and the authority check may be applied.

use super::{Authority, CommandEnvelope, CommandType, ConnectionId};
use crate::config::EngineConfig;
use crate::env::AuthorityOracle;
use crate::error::{ErrorContext, ErrorSeverity, GameError};

/// One broken validation rule. `Display` is the human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    #[error("Invalid tick value")]
    InvalidTick { tick: i64 },

    #[error("Timestamp skew of {skew_ms}ms exceeds tolerance of {tolerance_ms}ms")]
    TimestampSkew { skew_ms: i64, tolerance_ms: u64 },

    #[error("Unknown command type {0}")]
    UnknownCommandType(u16),

    #[error("Command type {declared} does not match payload {payload}")]
    TypeMismatch {
        declared: CommandType,
        payload: CommandType,
    },

    #[error("Command specific validation failed")]
    InvalidPayload,

    #[error("Connection {0} is not active")]
    InactiveConnection(ConnectionId),

    #[error("No active authoritative context")]
    ServerInactive,

    #[error("Command {0} requires server or system authority")]
    ClientNotPermitted(CommandType),
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TimestampSkew { .. } | Self::InactiveConnection(_) | Self::ServerInactive => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidTick { .. }
            | Self::UnknownCommandType(_)
            | Self::InvalidPayload
            | Self::ClientNotPermitted(_) => ErrorSeverity::Validation,
            Self::TypeMismatch { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTick { .. } => "COMMAND_INVALID_TICK",
            Self::TimestampSkew { .. } => "COMMAND_TIMESTAMP_SKEW",
            Self::UnknownCommandType(_) => "COMMAND_UNKNOWN_TYPE",
            Self::TypeMismatch { .. } => "COMMAND_TYPE_MISMATCH",
            Self::InvalidPayload => "COMMAND_INVALID_PAYLOAD",
            Self::InactiveConnection(_) => "COMMAND_INACTIVE_CONNECTION",
            Self::ServerInactive => "COMMAND_SERVER_INACTIVE",
            Self::ClientNotPermitted(_) => "COMMAND_CLIENT_NOT_PERMITTED",
        }
    }
}

/// Every rule a command broke, with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    pub context: ErrorContext,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(context: ErrorContext) -> Self {
        Self {
            context,
            errors: Vec::new(),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Human-readable error strings, in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// True if any error has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.error_code() == code)
    }

    /// The most severe error collected, `None` when the command is valid.
    pub fn worst_severity(&self) -> Option<ErrorSeverity> {
        self.errors
            .iter()
            .map(GameError::severity)
            .max_by_key(|severity| match severity {
                ErrorSeverity::Recoverable => 0,
                ErrorSeverity::Validation => 1,
                ErrorSeverity::Internal => 2,
                ErrorSeverity::Fatal => 3,
            })
    }
}

/// Stateless validator configured with the timestamp tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandValidator {
    tolerance_ms: u64,
}

impl CommandValidator {
    pub fn new(tolerance_ms: u64) -> Self {
        Self { tolerance_ms }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.timestamp_tolerance_ms)
    }

    pub fn tolerance_ms(&self) -> u64 {
        self.tolerance_ms
    }

    /// Structural, temporal, type and payload checks.
    pub fn validate(&self, command: &CommandEnvelope, now_ms: i64) -> ValidationResult {
        let mut result = ValidationResult::new(
            ErrorContext::new(command.tick).with_connection(command.connection_id),
        );

        if command.tick < 0 {
            result.push(ValidationError::InvalidTick { tick: command.tick });
        }

        let skew_ms = now_ms.saturating_sub(command.timestamp_ms);
        if skew_ms.unsigned_abs() > self.tolerance_ms {
            result.push(ValidationError::TimestampSkew {
                skew_ms,
                tolerance_ms: self.tolerance_ms,
            });
        }

        match command.kind() {
            None => result.push(ValidationError::UnknownCommandType(command.command_type)),
            Some(declared) => {
                let payload = command.payload.command_type();
                if declared != payload {
                    result.push(ValidationError::TypeMismatch { declared, payload });
                }
            }
        }

        if !command.payload.is_valid() {
            result.push(ValidationError::InvalidPayload);
        }

        result
    }

    /// Checks the command's origin against the connection registry.
    pub fn check_authority<A>(command: &CommandEnvelope, oracle: &A) -> Result<(), ValidationError>
    where
        A: AuthorityOracle + ?Sized,
    {
        match command.authority {
            Authority::Client if !oracle.is_connection_active(command.connection_id) => {
                Err(ValidationError::InactiveConnection(command.connection_id))
            }
            Authority::Client if command.payload.command_type().is_server_only() => Err(
                ValidationError::ClientNotPermitted(command.payload.command_type()),
            ),
            Authority::Server if !oracle.is_server_active() => Err(ValidationError::ServerInactive),
            _ => Ok(()),
        }
    }

    /// `Client` needs an active connection and may not drive simulation time,
    /// `Server` needs an active authoritative context; `System` always passes.
    pub fn validate_authority<A>(command: &CommandEnvelope, oracle: &A) -> bool
    where
        A: AuthorityOracle + ?Sized,
    {
        Self::check_authority(command, oracle).is_ok()
    }
}
