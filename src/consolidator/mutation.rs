use crate::model::ClusterModel;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A deferred change to the cluster model. Producers enqueue these, and the consolidation loop
/// applies them, in order, to its working copy of the model.
pub type Mutation = Box<dyn FnOnce(&mut ClusterModel) -> Result<(), MutationError> + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("Mutation rejected: {0}")]
    Rejected(String),
    #[error("Mutation panicked: {0}")]
    Panicked(String),
}

/// Applies `mutation`, converting a panic into `MutationError::Panicked`. A panicking mutation may
/// have partially updated `cluster`; that partial update is kept, like any other applied mutation.
pub(super) fn apply(mutation: Mutation, cluster: &mut ClusterModel) -> Result<(), MutationError> {
    match panic::catch_unwind(AssertUnwindSafe(|| mutation(cluster))) {
        Ok(result) => result,
        Err(payload) => Err(MutationError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServerId;

    #[test]
    fn apply_runs_mutation() {
        let mut cluster = ClusterModel::new();
        let mutation: Mutation = Box::new(|cluster| {
            cluster.set_primary(Some(ServerId::new("a:27017")));
            Ok(())
        });

        apply(mutation, &mut cluster).expect("Mutation should succeed");

        assert_eq!(cluster.primary_server_id(), Some(&ServerId::new("a:27017")));
    }

    #[test]
    fn apply_returns_rejection() {
        let mut cluster = ClusterModel::new();
        let mutation: Mutation = Box::new(|_| Err(MutationError::Rejected("nope".into())));

        match apply(mutation, &mut cluster) {
            Err(MutationError::Rejected(reason)) => assert_eq!(reason, "nope"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn apply_catches_panic() {
        let mut cluster = ClusterModel::new();
        let mutation: Mutation = Box::new(|_| panic!("boom {}", 42));

        match apply(mutation, &mut cluster) {
            Err(MutationError::Panicked(message)) => assert_eq!(message, "boom 42"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
