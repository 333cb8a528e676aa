use crate::model::{ConnectionId, ServerId};

/// Lifecycle events reported by the driver. This is the complete set the monitor consumes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClusterEvent {
    ConnectionOpened {
        connection_id: ConnectionId,
    },
    ConnectionClosed {
        connection_id: ConnectionId,
    },
    ConnectionFailed {
        connection_id: ConnectionId,
    },
    ServerRemoved {
        server_id: ServerId,
    },
    ClusterDescriptionChanged {
        old: ClusterDescription,
        new: ClusterDescription,
    },
    ServerDescriptionChanged {
        server_id: ServerId,
        old: ServerDescription,
        new: ServerDescription,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ServerType {
    Unknown,
    Standalone,
    ReplicaSetPrimary,
    ReplicaSetSecondary,
    ReplicaSetArbiter,
    ReplicaSetOther,
    ShardRouter,
}

impl ServerType {
    /// A standalone server is its own primary.
    pub fn is_primary(&self) -> bool {
        matches!(self, ServerType::Standalone | ServerType::ReplicaSetPrimary)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ServerState {
    Disconnected,
    Connected,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerDescription {
    pub server_id: ServerId,
    pub server_type: ServerType,
    pub state: ServerState,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusterDescription {
    pub servers: Vec<ServerDescription>,
}

impl ClusterDescription {
    /// The first server acting as primary, if any.
    pub fn primary(&self) -> Option<&ServerDescription> {
        self.servers.iter().find(|server| server.server_type.is_primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(name: &str, server_type: ServerType) -> ServerDescription {
        ServerDescription {
            server_id: ServerId::new(name),
            server_type,
            state: ServerState::Connected,
        }
    }

    #[test]
    fn primary_is_first_primary_or_standalone() {
        let cluster = ClusterDescription {
            servers: vec![
                description("a", ServerType::ReplicaSetSecondary),
                description("b", ServerType::Standalone),
                description("c", ServerType::ReplicaSetPrimary),
            ],
        };

        assert_eq!(cluster.primary().map(|s| s.server_id.endpoint()), Some("b"));
    }

    #[test]
    fn no_primary() {
        let cluster = ClusterDescription {
            servers: vec![
                description("a", ServerType::ReplicaSetSecondary),
                description("b", ServerType::ReplicaSetArbiter),
                description("c", ServerType::Unknown),
            ],
        };

        assert!(cluster.primary().is_none());
        assert!(ClusterDescription::default().primary().is_none());
    }
}
