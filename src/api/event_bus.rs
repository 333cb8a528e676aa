use crate::model::ClusterModel;
use std::sync::Arc;
use tokio::sync::mpsc;

// Each listener owns its own channel. Every change is queued for every listener, nothing is
// clobbered, so a listener that falls behind sees the full history once it catches up. Dropping a
// listener unsubscribes it.

/// Receives the primary's usable connection count each time it changes.
pub struct PrimaryConnectionCountListener {
    rcv: mpsc::UnboundedReceiver<usize>,
}

impl PrimaryConnectionCountListener {
    pub(crate) fn new(rcv: mpsc::UnboundedReceiver<usize>) -> Self {
        PrimaryConnectionCountListener { rcv }
    }

    /// `next()` returns the next new primary connection count. Returns `None` once the monitor has
    /// been dropped and every queued change has been received.
    pub async fn next(&mut self) -> Option<usize> {
        self.rcv.recv().await
    }
}

/// Receives a snapshot of the cluster model each time a consolidation cycle changes it.
pub struct ClusterChangeListener {
    rcv: mpsc::UnboundedReceiver<Arc<ClusterModel>>,
}

impl ClusterChangeListener {
    pub(crate) fn new(rcv: mpsc::UnboundedReceiver<Arc<ClusterModel>>) -> Self {
        ClusterChangeListener { rcv }
    }

    /// `next()` returns the next changed cluster model. Returns `None` once the monitor has been
    /// dropped and every queued change has been received.
    pub async fn next(&mut self) -> Option<Arc<ClusterModel>> {
        self.rcv.recv().await
    }
}
