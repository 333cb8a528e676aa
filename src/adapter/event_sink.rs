use crate::adapter::{ClusterEvent, ServerState, ServerType};
use crate::consolidator::{Mutation, MutationError};
use crate::model::{ClusterModel, ConnectionId, ServerId};
use crate::queue::SlottedQueue;
use std::sync::Arc;

/// EventSink is the producer side of the monitor. It translates driver events into mutations and
/// queues them for the next consolidation cycle; nothing is applied on the caller's thread.
///
/// Cheap to clone, and safe to call from any number of threads at once. Calls never wait on the
/// consolidation loop.
#[derive(Clone)]
pub struct EventSink {
    logger: slog::Logger,
    queue: Arc<SlottedQueue<Mutation>>,
}

impl EventSink {
    pub(crate) fn new(logger: slog::Logger, queue: Arc<SlottedQueue<Mutation>>) -> Self {
        EventSink { logger, queue }
    }

    pub fn handle_event(&self, event: ClusterEvent) {
        match event {
            ClusterEvent::ConnectionOpened { connection_id } => self.connection_opened(connection_id),
            ClusterEvent::ConnectionClosed { connection_id } => self.connection_removed(connection_id, "closed"),
            ClusterEvent::ConnectionFailed { connection_id } => self.connection_removed(connection_id, "failed"),
            ClusterEvent::ServerRemoved { server_id } => self.server_removed(server_id),
            ClusterEvent::ClusterDescriptionChanged { old, new } => {
                let old_primary = old.primary().map(|server| server.server_id.clone());
                let new_primary = new.primary().map(|server| server.server_id.clone());
                self.cluster_primary_changed(old_primary, new_primary);
            }
            ClusterEvent::ServerDescriptionChanged { server_id, old, new } => {
                if old.server_type != new.server_type && new.server_type == ServerType::ReplicaSetPrimary {
                    self.server_became_primary(server_id.clone());
                }
                self.server_state_changed(server_id, old.state, new.state);
            }
        }
    }

    /// Queues an arbitrary mutation. It runs on the consolidation loop, in order with every other
    /// event from this thread.
    pub fn enqueue<F>(&self, mutation: F)
    where
        F: FnOnce(&mut ClusterModel) -> Result<(), MutationError> + Send + 'static,
    {
        self.queue.enqueue(Box::new(mutation));
    }

    fn connection_opened(&self, connection_id: ConnectionId) {
        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            if cluster.add_connection(&connection_id) {
                slog::debug!(logger, "Connection opened: {}", connection_id);
            }
            Ok(())
        });
    }

    fn connection_removed(&self, connection_id: ConnectionId, reason: &'static str) {
        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            if cluster.remove_connection(&connection_id) {
                slog::debug!(logger, "Connection {}: {}", reason, connection_id);
            }
            Ok(())
        });
    }

    fn server_removed(&self, server_id: ServerId) {
        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            if cluster.remove_server(&server_id) {
                slog::debug!(logger, "Server removed: {}", server_id);
            }
            Ok(())
        });
    }

    /// Losing the primary (no primary in the new description) is not recorded; the last known
    /// primary stays until another one is elected.
    fn cluster_primary_changed(&self, old_primary: Option<ServerId>, new_primary: Option<ServerId>) {
        let new_primary = match new_primary {
            Some(new_primary) if old_primary.as_ref() != Some(&new_primary) => new_primary,
            _ => return,
        };

        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            if cluster.set_primary(Some(new_primary.clone())) {
                slog::debug!(logger, "Primary changed: {:?} -> {}", old_primary, new_primary);
            }
            Ok(())
        });
    }

    fn server_became_primary(&self, server_id: ServerId) {
        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            if cluster.set_primary(Some(server_id.clone())) {
                slog::debug!(logger, "Setting primary: {}", server_id);
            }
            Ok(())
        });
    }

    fn server_state_changed(&self, server_id: ServerId, old_state: ServerState, new_state: ServerState) {
        let logger = self.logger.clone();
        self.enqueue(move |cluster| {
            let connected = new_state == ServerState::Connected;
            if cluster.set_server_connected(&server_id, connected) {
                slog::debug!(
                    logger,
                    "Server state changed: {}: {:?} -> {:?}",
                    server_id,
                    old_state,
                    new_state
                );
            }
            Ok(())
        });
    }
}
