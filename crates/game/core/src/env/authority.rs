use crate::command::ConnectionId;

/// Read-only view of the connection registry used by authority validation.
pub trait AuthorityOracle {
    /// True if `connection` is currently connected and allowed to issue commands.
    fn is_connection_active(&self, connection: ConnectionId) -> bool;

    /// True while an authoritative simulation context is running.
    fn is_server_active(&self) -> bool;
}

impl<T: AuthorityOracle + ?Sized> AuthorityOracle for &T {
    fn is_connection_active(&self, connection: ConnectionId) -> bool {
        (**self).is_connection_active(connection)
    }

    fn is_server_active(&self) -> bool {
        (**self).is_server_active()
    }
}
