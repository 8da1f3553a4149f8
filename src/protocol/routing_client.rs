//! Async driver for [`RoutingClient`], generic over [`AsyncTransport`].
//!
//! Like [`crate::protocol::tunnel_client::AsyncTunnelClient`] wraps the pure
//! [`crate::protocol::tunnel::TunnelClient`] state machine, this wraps the
//! pure [`RoutingClient`]: it owns the clock and the socket, and feeds
//! `now_ms`/jitter samples into the state machine on every call.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::error::{KnxError, Result};
use crate::net::transport::AsyncTransport;
use crate::net::{IpEndpoint, Ipv4Addr};
use crate::protocol::constants::ServiceType;
use crate::protocol::frame::KnxnetIpFrame;
use crate::protocol::routing::{RoutingClient, KNX_MULTICAST_ADDR};

const MAX_PACKET_SIZE: usize = 256;

/// Outcome of [`AsyncRoutingClient::poll_receive`].
#[derive(Debug)]
pub enum RoutingEvent<'a> {
    /// A `ROUTING_INDICATION` carrying a cEMI frame arrived.
    Indication(&'a [u8]),
    /// A `ROUTING_BUSY` arrived; the sender is now paused for `wait_millis`.
    Busy { busy_count: u32, wait_millis: u32 },
    /// A `ROUTING_LOST_MESSAGE` arrived, reporting `lost_count` dropped frames.
    LostMessage { lost_count: u16 },
    /// Nothing arrived within the poll window.
    Idle,
}

/// Sample a pseudo-random value in `[0, 1)` for `ROUTING_BUSY` jitter.
///
/// `RoutingClient::handle_routing_busy` takes its random sample as a plain
/// argument precisely so it stays a pure, dependency-free state machine;
/// this is the one caller-side concern that needs actual entropy.
fn jitter_sample(rng: &mut SmallRng) -> f32 {
    (rng.next_u32() >> 8) as f32 / (1u32 << 24) as f32
}

/// Drives a [`RoutingClient`] state machine over a transport bound to the
/// KNX routing multicast group.
pub struct AsyncRoutingClient<T: AsyncTransport> {
    transport: T,
    routing: RoutingClient,
    multicast: IpEndpoint,
    rng: SmallRng,
    rx_buffer: [u8; MAX_PACKET_SIZE],
}

impl<T: AsyncTransport> AsyncRoutingClient<T> {
    /// Wrap an already-bound, already-multicast-joined transport.
    pub fn new(transport: T, rng_seed: u64) -> Self {
        Self {
            transport,
            routing: RoutingClient::new(),
            multicast: IpEndpoint::new(Ipv4Addr::from(KNX_MULTICAST_ADDR), 3671),
            rng: SmallRng::seed_from_u64(rng_seed),
            rx_buffer: [0u8; MAX_PACKET_SIZE],
        }
    }

    /// Queue a cEMI frame for routed transmission.
    pub fn enqueue(&mut self, cemi_data: &[u8]) -> Result<crate::protocol::routing::EnqueueOutcome> {
        self.routing.enqueue(cemi_data)
    }

    /// Number of frames currently queued.
    pub fn queue_len(&self) -> usize {
        self.routing.queue_len()
    }

    /// Send the next queued frame, if the state machine says it's ready.
    pub async fn try_send(&mut self, now_ms: u32) -> Result<bool> {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let Some(result) = self.routing.build_next_send(now_ms, &mut buf) else {
            return Ok(false);
        };
        let n = result?;
        self.transport.send_to(&buf[..n], self.multicast).await?;
        Ok(true)
    }

    /// Drive the `ROUTING_BUSY` slow-decrement timer. Call periodically.
    pub fn tick(&mut self, now_ms: u32) {
        self.routing.tick(now_ms);
    }

    /// Poll for an inbound frame and translate it into a [`RoutingEvent`].
    pub async fn poll_receive(&mut self, now_ms: u32, timeout_ms: u32) -> Result<RoutingEvent<'_>> {
        let Some((n, _)) = self.transport.recv_timeout(&mut self.rx_buffer, timeout_ms).await? else {
            return Ok(RoutingEvent::Idle);
        };

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;
        match frame.service_type() {
            ServiceType::RoutingIndication => Ok(RoutingEvent::Indication(frame.body())),
            ServiceType::RoutingBusy => {
                let sample = jitter_sample(&mut self.rng);
                let outcome = self.routing.handle_routing_busy(frame.body(), now_ms, sample)?;
                Ok(RoutingEvent::Busy {
                    busy_count: outcome.busy_count,
                    wait_millis: outcome.wait_millis,
                })
            }
            ServiceType::RoutingLostMessage => {
                let lost_count = self.routing.handle_routing_lost_message(frame.body())?;
                Ok(RoutingEvent::LostMessage { lost_count })
            }
            _ => Err(KnxError::invalid_frame()),
        }
    }
}
