use crate::adapter::{ClusterEvent, EventSink};
use crate::api::options::MonitorOptionsValidated;
use crate::api::{ClusterChangeListener, MonitorOptions, PrimaryConnectionCountListener};
use crate::consolidator::{run_consolidation_loop, ChangeNotifier, Consolidator, Locked, Mutation};
use crate::model::ClusterModel;
use crate::queue::SlottedQueue;
use crate::time::{Clock, RealClock};
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct MonitorConfig {
    pub info_logger: slog::Logger,
    pub options: MonitorOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorCreationError {
    #[error("Illegal options for configuring monitor: {0}")]
    IllegalOptions(String),
}

/// ClusterMonitor keeps an eventually-consistent picture of a database cluster: which servers exist,
/// which one is primary, and how many usable connections the driver holds to each.
///
/// Driver events go in through an [`EventSink`]. A background task folds them into a new
/// [`ClusterModel`] once per consolidation period and publishes it. Reads always see a complete
/// model from the latest cycle, never a half-applied batch.
///
/// Dropping the monitor stops the background task, same as [`ClusterMonitor::shutdown`].
pub struct ClusterMonitor {
    logger: slog::Logger,
    queue: Arc<SlottedQueue<Mutation>>,
    published: Arc<Locked<Arc<ClusterModel>>>,
    notifier: Arc<ChangeNotifier>,
    event_sink: EventSink,
    cancel: CancellationToken,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ClusterMonitor {
    pub async fn try_new(config: MonitorConfig) -> Result<Self, MonitorCreationError> {
        Self::try_new_with_clock(config, RealClock).await
    }

    /// Same as `try_new()`, but the consolidation cadence follows `clock`.
    pub async fn try_new_with_clock<C: Clock>(config: MonitorConfig, clock: C) -> Result<Self, MonitorCreationError> {
        let root_logger = config.info_logger;

        let options = MonitorOptionsValidated::try_from(config.options)
            .map_err(|e| MonitorCreationError::IllegalOptions(e.to_string()))?;

        let queue = Arc::new(SlottedQueue::new());
        let published = Arc::new(Locked::new(Arc::new(ClusterModel::new())));
        let notifier = Arc::new(ChangeNotifier::new(
            root_logger.new(slog::o!("Component" => "ChangeNotifier")),
        ));
        let event_sink = EventSink::new(root_logger.new(slog::o!("Component" => "EventSink")), queue.clone());

        let consolidator = Consolidator::new(
            root_logger.new(slog::o!("Component" => "Consolidator")),
            queue.clone(),
            published.clone(),
            notifier.clone(),
        );
        let cancel = CancellationToken::new();
        let loop_handle = tokio::spawn(run_consolidation_loop(
            consolidator,
            clock,
            options.consolidation_period,
            cancel.clone(),
        ));

        Ok(ClusterMonitor {
            logger: root_logger,
            queue,
            published,
            notifier,
            event_sink,
            cancel,
            loop_handle: Mutex::new(Some(loop_handle)),
        })
    }

    /// A handle for the event source. Hand out as many clones as there are producers.
    pub fn event_sink(&self) -> EventSink {
        self.event_sink.clone()
    }

    pub fn handle_event(&self, event: ClusterEvent) {
        self.event_sink.handle_event(event);
    }

    /// Usable connections to the primary as of the last consolidation cycle, or 0 if there is no
    /// known primary.
    pub fn primary_connection_count(&self) -> usize {
        self.published.get().primary_connection_count()
    }

    /// The model published by the last consolidation cycle.
    pub fn cluster(&self) -> Arc<ClusterModel> {
        self.published.get()
    }

    /// Mutations queued for the next consolidation cycle.
    pub fn pending_mutation_count(&self) -> usize {
        self.queue.len()
    }

    /// Every change is delivered, in order. Delivery is unbounded: a listener that is kept alive but
    /// never polled buffers one value per change, so drop listeners that are no longer read.
    pub fn subscribe_primary_connection_count(&self) -> PrimaryConnectionCountListener {
        PrimaryConnectionCountListener::new(self.notifier.subscribe_primary_connection_count())
    }

    /// Same delivery as `subscribe_primary_connection_count()`. An unpolled listener holds on to one
    /// model snapshot per change.
    pub fn subscribe_cluster_changes(&self) -> ClusterChangeListener {
        ClusterChangeListener::new(self.notifier.subscribe_cluster_changes())
    }

    /// Stops the consolidation loop. Events still queued are not applied. Safe to call repeatedly.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            slog::info!(self.logger, "Shutting down cluster monitor");
            self.cancel.cancel();
        }
    }

    /// Stops the consolidation loop and waits for it to exit. Safe to call repeatedly; only the
    /// first call waits.
    pub async fn shutdown_and_wait(&self) {
        self.shutdown();

        let loop_handle = self
            .loop_handle
            .lock()
            .expect("ClusterMonitor.loop_handle mutex guard poison")
            .take();
        if let Some(loop_handle) = loop_handle {
            if let Err(e) = loop_handle.await {
                slog::error!(self.logger, "Consolidation loop exited abnormally: {}", e);
            }
        }
    }
}

impl Drop for ClusterMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
