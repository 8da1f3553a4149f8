//! `knxd` — a standalone daemon that bridges a KNXnet/IP tunneling
//! connection or a routing multicast group to a log-based event stream.
//!
//! This binary is the std/tokio counterpart of `main.rs`'s embedded
//! firmware: same protocol stack, different host. Configuration comes from
//! the environment (see [`knx_pico::configuration::DaemonConfig`]) instead
//! of a flashed-in constant, and the network stack is tokio's instead of
//! Embassy's.

use knx_pico::configuration::{DaemonConfig, DaemonMode};
use knx_pico::knx_client::{KnxClient, KnxEvent, KnxValue};
use knx_pico::net::tokio_transport::TokioUdpTransport;
use knx_pico::net::Ipv4Addr;
use knx_pico::protocol::routing::KNX_MULTICAST_ADDR;
use knx_pico::protocol::routing_client::{AsyncRoutingClient, RoutingEvent};
use knx_pico::{pico_log, GroupAddress, Result};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events surfaced from the connection task to the logger task. Kept
/// separate from [`KnxEvent`] since routing has no group-address registry
/// to decode against and only ever reports raw indications.
enum DaemonEvent {
    Connected,
    GroupWrite { address: GroupAddress, value: KnxValue },
    GroupRead { address: GroupAddress },
    GroupResponse { address: GroupAddress, value: KnxValue },
    Unknown { address: GroupAddress, data_len: usize },
    RoutingIndication { len: usize },
    RoutingBusy { busy_count: u32, wait_millis: u32 },
    RoutingLostMessage { lost_count: u16 },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match DaemonConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        pico_log!(error, "knxd exiting: {}", e);
        std::process::exit(1);
    }
}

/// Owns the reconnect loop and the event stream for the configured mode.
///
/// Not part of the library's public client API; this is the daemon binary's
/// own entry point, matching the library's `AsyncTransport`-driven state
/// machines to a real tokio UDP socket.
pub async fn run(config: DaemonConfig) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<DaemonEvent>();

    let logger = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            log_event(event);
        }
    });

    let mut backoff_secs = config.reconnect_backoff_min_secs;
    loop {
        let result = match config.mode {
            DaemonMode::Tunneling => run_tunneling(&config, &event_tx).await,
            DaemonMode::Routing => run_routing(&config, &event_tx).await,
        };

        match result {
            Ok(()) => break,
            Err(e) => {
                pico_log!(
                    error,
                    "connection lost ({}), reconnecting in {}s",
                    e,
                    backoff_secs
                );
                tokio::time::sleep(Duration::from_secs(u64::from(backoff_secs))).await;
                backoff_secs = (backoff_secs * 2).min(config.reconnect_backoff_max_secs);
            }
        }
    }

    drop(event_tx);
    let _ = logger.await;
    Ok(())
}

/// Runs one tunneling connection to completion (until a heartbeat or
/// receive error tears it down). A single task owns the `KnxClient`, so it
/// never needs a lock: the heartbeat tick and the receive poll interleave
/// on the same executor via `tokio::select!`.
async fn run_tunneling(config: &DaemonConfig, events: &mpsc::UnboundedSender<DaemonEvent>) -> Result<()> {
    let transport = TokioUdpTransport::bind(0).await?;
    let mut client = KnxClient::new(transport, config.gateway_octets(), config.gateway_port);

    client.connect().await?;
    let _ = events.send(DaemonEvent::Connected);

    let mut heartbeat = tokio::time::interval(Duration::from_secs(u64::from(
        config.heartbeat_interval_secs,
    )));
    heartbeat.tick().await; // first tick fires immediately; skip it

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                client.heartbeat().await?;
            }
            received = client.receive_event(200) => {
                if let Some(event) = received? {
                    let _ = events.send(daemon_event_from_knx(event));
                }
            }
        }
    }
}

/// Runs one routing session to completion. Mirrors `run_tunneling`'s
/// single-task-owns-the-state shape; the routing client has no heartbeat,
/// but it does need the periodic `tick()` that drives the `ROUTING_BUSY`
/// slow-decrement counter.
async fn run_routing(config: &DaemonConfig, events: &mpsc::UnboundedSender<DaemonEvent>) -> Result<()> {
    let interface = Ipv4Addr::from(config.gateway_octets());
    let transport = TokioUdpTransport::bind_to(interface, config.gateway_port).await?;
    transport.join_multicast(Ipv4Addr::from(KNX_MULTICAST_ADDR), interface)?;
    transport.set_multicast_ttl(128)?;

    let mut client = AsyncRoutingClient::new(transport, seed_from_config(config));
    let _ = events.send(DaemonEvent::Connected);

    let mut tick_interval = tokio::time::interval(Duration::from_millis(5));

    loop {
        tokio::select! {
            now = tick_interval.tick() => {
                client.tick(elapsed_ms(now));
                client.try_send(elapsed_ms(now)).await?;
            }
            event = client.poll_receive(0, 200) => {
                match event? {
                    RoutingEvent::Indication(data) => {
                        let _ = events.send(DaemonEvent::RoutingIndication { len: data.len() });
                    }
                    RoutingEvent::Busy { busy_count, wait_millis } => {
                        let _ = events.send(DaemonEvent::RoutingBusy { busy_count, wait_millis });
                    }
                    RoutingEvent::LostMessage { lost_count } => {
                        let _ = events.send(DaemonEvent::RoutingLostMessage { lost_count });
                    }
                    RoutingEvent::Idle => {}
                }
            }
        }
    }
}

fn daemon_event_from_knx(event: KnxEvent) -> DaemonEvent {
    match event {
        KnxEvent::GroupWrite { address, value } => DaemonEvent::GroupWrite { address, value },
        KnxEvent::GroupRead { address } => DaemonEvent::GroupRead { address },
        KnxEvent::GroupResponse { address, value } => DaemonEvent::GroupResponse { address, value },
        KnxEvent::Unknown { address, data_len } => DaemonEvent::Unknown { address, data_len },
    }
}

fn log_event(event: DaemonEvent) {
    match event {
        DaemonEvent::Connected => pico_log!(info, "connected"),
        DaemonEvent::GroupWrite { address, value } => {
            pico_log!(info, "write {}: {:?}", address, value);
        }
        DaemonEvent::GroupRead { address } => {
            pico_log!(info, "read request {}", address);
        }
        DaemonEvent::GroupResponse { address, value } => {
            pico_log!(info, "response {}: {:?}", address, value);
        }
        DaemonEvent::Unknown { address, data_len } => {
            pico_log!(warn, "unrecognized telegram at {} ({} bytes)", address, data_len);
        }
        DaemonEvent::RoutingIndication { len } => {
            pico_log!(info, "routing indication ({} bytes)", len);
        }
        DaemonEvent::RoutingBusy { busy_count, wait_millis } => {
            pico_log!(warn, "routing busy #{}, pausing {}ms", busy_count, wait_millis);
        }
        DaemonEvent::RoutingLostMessage { lost_count } => {
            pico_log!(warn, "routing lost {} messages", lost_count);
        }
    }
}

/// `tokio::time::Instant` has no wall-clock epoch; the routing state
/// machine only needs a monotonically increasing millisecond counter, so
/// this measures elapsed time since the process started rather than a
/// real timestamp.
fn elapsed_ms(_tick: tokio::time::Instant) -> u32 {
    static START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    let start = START.get_or_init(std::time::Instant::now);
    start.elapsed().as_millis() as u32
}

fn seed_from_config(config: &DaemonConfig) -> u64 {
    u64::from(config.gateway_port) ^ u64::from(u32::from_be_bytes(config.gateway_octets()))
}
