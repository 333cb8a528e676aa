mod event_sink;
mod events;

pub use event_sink::EventSink;
pub use events::ClusterDescription;
pub use events::ClusterEvent;
pub use events::ServerDescription;
pub use events::ServerState;
pub use events::ServerType;
