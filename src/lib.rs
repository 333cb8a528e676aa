mod adapter;
mod api;
mod consolidator;
mod model;
mod queue;
mod time;

#[cfg(test)]
mod test_utils;

pub use adapter::ClusterDescription;
pub use adapter::ClusterEvent;
pub use adapter::EventSink;
pub use adapter::ServerDescription;
pub use adapter::ServerState;
pub use adapter::ServerType;
pub use api::create_root_logger_for_stdout;
pub use api::ClusterChangeListener;
pub use api::ClusterMonitor;
pub use api::MonitorConfig;
pub use api::MonitorCreationError;
pub use api::MonitorOptions;
pub use api::PrimaryConnectionCountListener;
pub use consolidator::Mutation;
pub use consolidator::MutationError;
pub use consolidator::NotificationError;
pub use model::ClusterModel;
pub use model::ConnectionId;
pub use model::ServerId;
pub use model::ServerModel;
pub use time::Clock;
pub use time::RealClock;
