//! Common error infrastructure for ability-core.
//!
//! This module provides shared types and traits used across all error types in
//! ability-core. Domain-specific errors (e.g., `ProfileError`, `SnapshotError`,
//! `ValidationError`) are defined next to the code that produces them.
//!
//! # Design Principles
//!
//! - **Values, not unwinding**: rejected commands and mismatched snapshots are
//!   reported as data and never propagate into the outer tick loop
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Deterministic**: all types are plain data, identical on client and server

use crate::command::ConnectionId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: transient conditions (stale timestamp, inactive connection)
/// - **Validation**: structurally invalid input that should be dropped
/// - **Internal**: unexpected inconsistencies that require investigation
/// - **Fatal**: corrupted data that cannot be interpreted at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - may succeed on a later tick.
    ///
    /// Examples: timestamp outside tolerance, connection not yet registered
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: negative tick, empty target list
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: command type code disagrees with payload
    Internal,

    /// Fatal error - data cannot be interpreted.
    ///
    /// Examples: unknown snapshot variant tag on the wire
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Connection that issued the offending command (if applicable).
    pub connection: Option<ConnectionId>,

    /// Simulation tick stamped on the offending command.
    pub tick: i64,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context at the given tick.
    #[must_use]
    pub const fn new(tick: i64) -> Self {
        Self {
            connection: None,
            tick,
            message: None,
        }
    }

    /// Attaches a connection to this context (builder pattern).
    #[must_use]
    pub const fn with_connection(mut self, connection: ConnectionId) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all ability-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and for asserting on errors in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
