use crate::model::ClusterModel;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Subscriber to {topic} has disconnected")]
    SubscriberDisconnected { topic: &'static str },
}

/// ChangeNotifier fans out change notifications to every subscriber of each topic. Each subscriber
/// has its own unbounded channel, so a slow or dead subscriber can't hold up the others or the
/// consolidation loop. The flip side is that a live subscriber which never reads keeps every value
/// sent to it until it is dropped.
pub(crate) struct ChangeNotifier {
    logger: slog::Logger,
    primary_connection_count: SubscriberList<usize>,
    cluster: SubscriberList<Arc<ClusterModel>>,
}

impl ChangeNotifier {
    pub(crate) fn new(logger: slog::Logger) -> Self {
        ChangeNotifier {
            logger,
            primary_connection_count: SubscriberList::new("primary connection count"),
            cluster: SubscriberList::new("cluster changes"),
        }
    }

    pub(crate) fn subscribe_primary_connection_count(&self) -> mpsc::UnboundedReceiver<usize> {
        self.primary_connection_count.subscribe()
    }

    pub(crate) fn subscribe_cluster_changes(&self) -> mpsc::UnboundedReceiver<Arc<ClusterModel>> {
        self.cluster.subscribe()
    }

    pub(super) fn notify_primary_connection_count(&self, count: usize) -> usize {
        self.primary_connection_count.publish(&self.logger, count)
    }

    pub(super) fn notify_cluster_changed(&self, cluster: Arc<ClusterModel>) -> usize {
        self.cluster.publish(&self.logger, cluster)
    }
}

struct SubscriberList<T> {
    topic: &'static str,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<T>>>,
}

impl<T: Clone> SubscriberList<T> {
    fn new(topic: &'static str) -> Self {
        SubscriberList {
            topic,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<T> {
        let (snd, rcv) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("SubscriberList.subscribe() mutex guard poison")
            .push(snd);

        rcv
    }

    /// Returns the number of subscribers the value was delivered to. Subscribers that have gone away
    /// are logged and pruned.
    fn publish(&self, logger: &slog::Logger, value: T) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("SubscriberList.publish() mutex guard poison");

        subscribers.retain(|subscriber| match subscriber.send(value.clone()) {
            Ok(()) => true,
            Err(_) => {
                let e = NotificationError::SubscriberDisconnected { topic: self.topic };
                slog::warn!(logger, "{}", e);
                false
            }
        });

        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn every_subscriber_receives() {
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let mut first = notifier.subscribe_primary_connection_count();
        let mut second = notifier.subscribe_primary_connection_count();

        assert_eq!(notifier.notify_primary_connection_count(3), 2);

        assert_eq!(first.try_recv().unwrap(), 3);
        assert_eq!(second.try_recv().unwrap(), 3);
    }

    #[test]
    fn dropped_subscriber_does_not_affect_others() {
        // -- setup --
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let dropped = notifier.subscribe_cluster_changes();
        let mut kept = notifier.subscribe_cluster_changes();
        drop(dropped);

        // -- execute --
        let delivered = notifier.notify_cluster_changed(Arc::new(ClusterModel::new()));

        // -- verify --
        assert_eq!(delivered, 1);
        assert!(kept.try_recv().is_ok());
        assert_eq!(notifier.notify_cluster_changed(Arc::new(ClusterModel::new())), 1);
    }

    #[test]
    fn unread_subscriber_buffers_every_change() {
        // -- setup --
        let notifier = ChangeNotifier::new(test_utils::discard_logger());
        let mut lagging = notifier.subscribe_primary_connection_count();

        // -- execute --
        for count in 1..=3 {
            assert_eq!(notifier.notify_primary_connection_count(count), 1);
        }

        // -- verify --
        for count in 1..=3 {
            assert_eq!(lagging.try_recv().unwrap(), count);
        }
        assert!(lagging.try_recv().is_err());

        drop(lagging);
        assert_eq!(notifier.notify_primary_connection_count(4), 0);
    }

    #[test]
    fn no_subscribers() {
        let notifier = ChangeNotifier::new(test_utils::discard_logger());

        assert_eq!(notifier.notify_primary_connection_count(1), 0);
        assert_eq!(notifier.notify_cluster_changed(Arc::new(ClusterModel::new())), 0);
    }
}
