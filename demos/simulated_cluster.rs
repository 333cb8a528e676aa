use cluster_monitor::{
    ClusterDescription, ClusterEvent, ClusterMonitor, ConnectionId, EventSink, MonitorConfig, MonitorOptions,
    ServerDescription, ServerId, ServerState, ServerType,
};
use std::error::Error;
use std::thread;
use tokio::time::Duration;

const PERIOD: Duration = Duration::from_millis(500);

/// Plays a three node replica set through the monitor: connection pools fill up, the primary fails
/// over, and the old primary is removed. Notifications are printed as they arrive.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let monitor = ClusterMonitor::try_new(MonitorConfig {
        info_logger: cluster_monitor::create_root_logger_for_stdout("simulated-cluster".into()),
        options: MonitorOptions {
            consolidation_period: Some(PERIOD),
        },
    })
    .await?;

    let mut counts = monitor.subscribe_primary_connection_count();
    tokio::spawn(async move {
        while let Some(count) = counts.next().await {
            println!("Primary connection count: {}", count);
        }
    });
    let mut clusters = monitor.subscribe_cluster_changes();
    tokio::spawn(async move {
        while let Some(cluster) = clusters.next().await {
            print!("{}", cluster);
        }
    });

    let servers: Vec<ServerId> = (1..=3).map(|i| ServerId::new(format!("db-{}:27017", i))).collect();

    // Each server's pool is filled by its own thread, like a driver would.
    let pool_threads: Vec<_> = servers
        .iter()
        .map(|server_id| {
            let sink = monitor.event_sink();
            let server_id = server_id.clone();
            thread::spawn(move || fill_pool(&sink, &server_id, 10))
        })
        .collect();
    for pool_thread in pool_threads {
        pool_thread.join().map_err(|_| "pool thread panicked")?;
    }

    let sink = monitor.event_sink();
    sink.handle_event(server_changed(&servers[0], ServerType::Unknown, ServerType::ReplicaSetPrimary));
    sink.handle_event(server_changed(&servers[1], ServerType::Unknown, ServerType::ReplicaSetSecondary));
    sink.handle_event(server_changed(&servers[2], ServerType::Unknown, ServerType::ReplicaSetSecondary));
    tokio::time::sleep(PERIOD * 2).await;

    println!("Failing over to {}", servers[1]);
    sink.handle_event(ClusterEvent::ClusterDescriptionChanged {
        old: replica_set(&servers, 0),
        new: replica_set(&servers, 1),
    });
    for i in 0..10 {
        sink.handle_event(ClusterEvent::ConnectionFailed {
            connection_id: ConnectionId::new(servers[0].clone(), i),
        });
    }
    sink.handle_event(ClusterEvent::ServerRemoved {
        server_id: servers[0].clone(),
    });
    tokio::time::sleep(PERIOD * 2).await;

    println!("Primary connection count is now {}", monitor.primary_connection_count());
    monitor.shutdown_and_wait().await;

    Ok(())
}

fn fill_pool(sink: &EventSink, server_id: &ServerId, size: u64) {
    for i in 0..size {
        sink.handle_event(ClusterEvent::ConnectionOpened {
            connection_id: ConnectionId::new(server_id.clone(), i),
        });
    }
}

fn server_changed(server_id: &ServerId, old_type: ServerType, new_type: ServerType) -> ClusterEvent {
    ClusterEvent::ServerDescriptionChanged {
        server_id: server_id.clone(),
        old: ServerDescription {
            server_id: server_id.clone(),
            server_type: old_type,
            state: ServerState::Disconnected,
        },
        new: ServerDescription {
            server_id: server_id.clone(),
            server_type: new_type,
            state: ServerState::Connected,
        },
    }
}

fn replica_set(servers: &[ServerId], primary: usize) -> ClusterDescription {
    ClusterDescription {
        servers: servers
            .iter()
            .enumerate()
            .map(|(i, server_id)| ServerDescription {
                server_id: server_id.clone(),
                server_type: if i == primary {
                    ServerType::ReplicaSetPrimary
                } else {
                    ServerType::ReplicaSetSecondary
                },
                state: ServerState::Connected,
            })
            .collect(),
    }
}
