mod cluster;
mod ids;
mod server;

pub use cluster::ClusterModel;
pub use ids::ConnectionId;
pub use ids::ServerId;
pub use server::ServerModel;
