use crate::consolidator::ChangeNotifier;
use crate::model::ClusterModel;
use std::sync::Arc;

#[derive(Debug, Default, PartialEq)]
pub(super) struct DiffOutcome {
    pub(super) primary_connection_count_changed: bool,
    pub(super) cluster_changed: bool,
}

/// Compares the previously published model to the newly published one and notifies subscribers of
/// whatever changed. Nothing fires if a consumer couldn't tell the two apart.
pub(super) fn notify_changes(
    logger: &slog::Logger,
    notifier: &ChangeNotifier,
    previous: &ClusterModel,
    updated: &Arc<ClusterModel>,
) -> DiffOutcome {
    let mut outcome = DiffOutcome::default();
    if updated.is_equivalent_to(previous) {
        return outcome;
    }

    let primary_connection_count = updated.primary_connection_count();
    if primary_connection_count != previous.primary_connection_count() {
        slog::info!(
            logger,
            "Primary connection count changed: {} -> {}",
            previous.primary_connection_count(),
            primary_connection_count
        );
        notifier.notify_primary_connection_count(primary_connection_count);
        outcome.primary_connection_count_changed = true;
    }

    // Count and equivalence are separate criteria; the cluster may still differ elsewhere (or not).
    if updated.is_equivalent_to(previous) {
        return outcome;
    }

    notifier.notify_cluster_changed(updated.clone());
    outcome.cluster_changed = true;
    slog::debug!(logger, "{}", updated);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionId, ServerId};
    use crate::test_utils;

    fn server(name: &str) -> ServerId {
        ServerId::new(format!("{}:27017", name))
    }

    fn connected_server(cluster: &mut ClusterModel, name: &str, connections: u64) {
        let server_id = server(name);
        for i in 0..connections {
            cluster.add_connection(&ConnectionId::new(server_id.clone(), i));
        }
        cluster.set_server_connected(&server_id, true);
    }

    #[test]
    fn equivalent_models_fire_nothing() {
        // -- setup --
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let mut counts = notifier.subscribe_primary_connection_count();
        let mut clusters = notifier.subscribe_cluster_changes();
        let mut previous = ClusterModel::new();
        connected_server(&mut previous, "a", 2);

        // -- execute --
        let outcome = notify_changes(
            &test_utils::discard_logger(),
            &notifier,
            &previous,
            &Arc::new(previous.clone()),
        );

        // -- verify --
        assert_eq!(outcome, DiffOutcome::default());
        assert!(counts.try_recv().is_err());
        assert!(clusters.try_recv().is_err());
    }

    #[test]
    fn primary_switch_fires_both() {
        // -- setup --
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let mut counts = notifier.subscribe_primary_connection_count();
        let mut clusters = notifier.subscribe_cluster_changes();
        let mut previous = ClusterModel::new();
        connected_server(&mut previous, "a", 3);
        connected_server(&mut previous, "b", 1);
        previous.set_primary(Some(server("a")));

        let mut updated = previous.clone();
        updated.set_primary(Some(server("b")));
        let updated = Arc::new(updated);

        // -- execute --
        let outcome = notify_changes(&test_utils::discard_logger(), &notifier, &previous, &updated);

        // -- verify --
        assert!(outcome.primary_connection_count_changed);
        assert!(outcome.cluster_changed);
        assert_eq!(counts.try_recv().unwrap(), 1);
        assert!(counts.try_recv().is_err());
        assert!(Arc::ptr_eq(&clusters.try_recv().unwrap(), &updated));
    }

    #[test]
    fn non_primary_change_fires_cluster_only() {
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let mut counts = notifier.subscribe_primary_connection_count();
        let mut clusters = notifier.subscribe_cluster_changes();
        let mut previous = ClusterModel::new();
        connected_server(&mut previous, "a", 3);
        previous.set_primary(Some(server("a")));

        let mut updated = previous.clone();
        connected_server(&mut updated, "b", 2);

        let outcome = notify_changes(
            &test_utils::discard_logger(),
            &notifier,
            &previous,
            &Arc::new(updated),
        );

        assert!(!outcome.primary_connection_count_changed);
        assert!(outcome.cluster_changed);
        assert!(counts.try_recv().is_err());
        assert!(clusters.try_recv().is_ok());
    }
}
