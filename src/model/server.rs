use crate::model::{ConnectionId, ServerId};
use std::collections::HashSet;

/// Observed state of one server: whether the driver considers it connected, and which of its
/// connections are currently open.
#[derive(Clone, Debug)]
pub struct ServerModel {
    server_id: ServerId,
    connected: bool,
    connections: HashSet<ConnectionId>,
}

impl ServerModel {
    pub(crate) fn new(server_id: ServerId) -> Self {
        ServerModel {
            server_id,
            connected: false,
            connections: HashSet::new(),
        }
    }

    pub fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.connections.iter()
    }

    pub fn contains_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    /// Open connections, regardless of whether the server is connected.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections are only usable while the server itself is connected.
    pub fn usable_connection_count(&self) -> usize {
        if self.connected {
            self.connections.len()
        } else {
            0
        }
    }

    /// Return true if we mutated state.
    pub(crate) fn add_connection(&mut self, connection_id: ConnectionId) -> bool {
        self.connections.insert(connection_id)
    }

    /// Return true if we mutated state.
    pub(crate) fn remove_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id)
    }

    /// Return true if we mutated state.
    pub(crate) fn set_connected(&mut self, connected: bool) -> bool {
        if self.connected == connected {
            return false;
        }
        self.connected = connected;
        true
    }

    /// Two servers are equivalent if they'd report the same thing to a consumer: same connectivity,
    /// same number of connections.
    pub(crate) fn is_equivalent_to(&self, other: &ServerModel) -> bool {
        self.connected == other.connected && self.connections.len() == other.connections.len()
    }
}
