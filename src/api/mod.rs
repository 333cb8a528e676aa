mod event_bus;
mod logging;
mod monitor;
mod options;

pub use event_bus::ClusterChangeListener;
pub use event_bus::PrimaryConnectionCountListener;
pub use logging::create_root_logger_for_stdout;
pub use monitor::ClusterMonitor;
pub use monitor::MonitorConfig;
pub use monitor::MonitorCreationError;
pub use options::MonitorOptions;
