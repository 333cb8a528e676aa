mod consolidation_loop;
mod consolidator;
mod diff;
mod locked;
mod mutation;
mod notifier;

pub(crate) use consolidation_loop::run_consolidation_loop;
pub(crate) use consolidator::Consolidator;
pub(crate) use locked::Locked;
pub use mutation::Mutation;
pub use mutation::MutationError;
pub(crate) use notifier::ChangeNotifier;
pub use notifier::NotificationError;
