//! Connection registry backing authority validation.

use std::collections::BTreeSet;

use ability_core::{AuthorityOracle, ConnectionId};

/// Active connections and whether an authoritative context is running.
#[derive(Clone, Debug, Default)]
pub struct ConnectionRegistry {
    active: BTreeSet<ConnectionId>,
    server_active: bool,
}

impl ConnectionRegistry {
    pub fn new(server_active: bool) -> Self {
        Self {
            active: BTreeSet::new(),
            server_active,
        }
    }

    /// Marks a connection active. Returns false if it already was.
    pub fn connect(&mut self, connection: ConnectionId) -> bool {
        self.active.insert(connection)
    }

    /// Marks a connection inactive. Returns false if it was not active.
    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        self.active.remove(&connection)
    }

    pub fn set_server_active(&mut self, active: bool) {
        self.server_active = active;
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.active.iter().copied()
    }
}

impl AuthorityOracle for ConnectionRegistry {
    fn is_connection_active(&self, connection: ConnectionId) -> bool {
        self.active.contains(&connection)
    }

    fn is_server_active(&self) -> bool {
        self.server_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_connections() {
        let mut registry = ConnectionRegistry::new(true);
        assert!(registry.connect(ConnectionId(3)));
        assert!(!registry.connect(ConnectionId(3)));
        assert!(registry.is_connection_active(ConnectionId(3)));

        assert!(registry.disconnect(ConnectionId(3)));
        assert!(!registry.is_connection_active(ConnectionId(3)));
        assert!(registry.is_server_active());
    }
}
