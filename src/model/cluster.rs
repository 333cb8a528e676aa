use crate::model::{ConnectionId, ServerId, ServerModel};
use std::collections::HashMap;
use std::fmt;

/// ClusterModel is the aggregate view of every server the driver knows about and the connections it
/// holds to each of them.
///
/// Instances are treated as immutable once published. The consolidation loop clones the published
/// instance, applies a batch of mutations to the clone, and publishes the clone. Cloning is deep:
/// every server and every connection set is copied, so readers holding an older instance never see
/// later mutations.
///
/// The mutating methods follow a CAS-like convention: they return true iff they changed state.
#[derive(Clone, Debug, Default)]
pub struct ClusterModel {
    primary_server_id: Option<ServerId>,
    servers: HashMap<ServerId, ServerModel>,
}

impl ClusterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary_server_id(&self) -> Option<&ServerId> {
        self.primary_server_id.as_ref()
    }

    pub fn server(&self, server_id: &ServerId) -> Option<&ServerModel> {
        self.servers.get(server_id)
    }

    pub fn servers(&self) -> impl Iterator<Item = &ServerModel> {
        self.servers.values()
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// Usable connections to the primary. The primary may have been removed from `servers` (or never
    /// seen), in which case there is nothing usable.
    pub fn primary_connection_count(&self) -> usize {
        self.primary()
            .map(ServerModel::usable_connection_count)
            .unwrap_or(0)
    }

    fn primary(&self) -> Option<&ServerModel> {
        self.primary_server_id
            .as_ref()
            .and_then(|server_id| self.servers.get(server_id))
    }

    /// Creates the server entry on first sight.
    pub fn add_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.server_entry(connection_id.server_id())
            .add_connection(connection_id.clone())
    }

    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> bool {
        match self.servers.get_mut(connection_id.server_id()) {
            Some(server) => server.remove_connection(connection_id),
            None => false,
        }
    }

    pub fn remove_server(&mut self, server_id: &ServerId) -> bool {
        self.servers.remove(server_id).is_some()
    }

    /// The primary isn't required to be a known server.
    pub fn set_primary(&mut self, server_id: Option<ServerId>) -> bool {
        if self.primary_server_id == server_id {
            return false;
        }
        self.primary_server_id = server_id;
        true
    }

    /// Creates the server entry on first sight.
    pub fn set_server_connected(&mut self, server_id: &ServerId, connected: bool) -> bool {
        self.server_entry(server_id).set_connected(connected)
    }

    fn server_entry(&mut self, server_id: &ServerId) -> &mut ServerModel {
        self.servers
            .entry(server_id.clone())
            .or_insert_with(|| ServerModel::new(server_id.clone()))
    }

    /// Returns true if a consumer couldn't tell the two models apart: same primary, same usable
    /// primary connection count, same set of servers, and each server has the same connectivity
    /// and number of connections.
    ///
    /// Which particular connections are open is deliberately not compared. The relation is
    /// symmetric: a server known to only one side makes the models differ.
    pub fn is_equivalent_to(&self, other: &ClusterModel) -> bool {
        self.primary_server_id == other.primary_server_id
            && self.primary_connection_count() == other.primary_connection_count()
            && self.servers.len() == other.servers.len()
            && self.servers.iter().all(|(server_id, server)| {
                other
                    .servers
                    .get(server_id)
                    .map_or(false, |other_server| server.is_equivalent_to(other_server))
            })
    }
}

/// One line per server with its usable connection count, ordered by server.
impl fmt::Display for ClusterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut servers: Vec<_> = self.servers.values().collect();
        servers.sort_by(|a, b| a.server_id().cmp(b.server_id()));

        writeln!(f, "Connections:")?;
        for server in servers {
            writeln!(f, "- {}: {}", server.server_id(), server.usable_connection_count())?;
        }

        Ok(())
    }
}
