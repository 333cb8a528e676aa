use crate::consolidator::diff;
use crate::consolidator::mutation;
use crate::consolidator::{ChangeNotifier, Locked, Mutation};
use crate::model::ClusterModel;
use crate::queue::SlottedQueue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Consolidator owns one pass of the pipeline: clone the published model, drain whatever mutations
/// are pending onto the clone, publish, and notify. It has no notion of time; the loop in
/// `consolidation_loop` decides when a cycle runs.
pub(crate) struct Consolidator {
    logger: slog::Logger,
    queue: Arc<SlottedQueue<Mutation>>,
    published: Arc<Locked<Arc<ClusterModel>>>,
    notifier: Arc<ChangeNotifier>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct CycleOutcome {
    pub(crate) applied: usize,
    pub(crate) failed: usize,
    pub(crate) published: bool,
    pub(crate) primary_connection_count_changed: bool,
    pub(crate) cluster_changed: bool,
}

impl Consolidator {
    pub(crate) fn new(
        logger: slog::Logger,
        queue: Arc<SlottedQueue<Mutation>>,
        published: Arc<Locked<Arc<ClusterModel>>>,
        notifier: Arc<ChangeNotifier>,
    ) -> Self {
        Consolidator {
            logger,
            queue,
            published,
            notifier,
        }
    }

    pub(crate) fn logger(&self) -> &slog::Logger {
        &self.logger
    }

    pub(crate) fn run_cycle(&self, cancel: &CancellationToken) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();
        let previous = self.published.get();
        let mut updated = ClusterModel::clone(&previous);

        if let Some(mut batch) = self.queue.try_swap() {
            slog::trace!(self.logger, "Applying batch of {} mutations", batch.len());
            // On cancellation, whatever is left in `batch` goes back to the queue when it drops.
            while !cancel.is_cancelled() {
                let mutation = match batch.next() {
                    Some(mutation) => mutation,
                    None => break,
                };
                match mutation::apply(mutation, &mut updated) {
                    Ok(()) => outcome.applied += 1,
                    Err(e) => {
                        slog::error!(self.logger, "Failed to apply mutation: {}", e);
                        outcome.failed += 1;
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return outcome;
        }

        let updated = Arc::new(updated);
        self.published.set(updated.clone());
        outcome.published = true;

        let diff = diff::notify_changes(&self.logger, &self.notifier, &previous, &updated);
        outcome.primary_connection_count_changed = diff.primary_connection_count_changed;
        outcome.cluster_changed = diff.cluster_changed;

        outcome
    }
}
