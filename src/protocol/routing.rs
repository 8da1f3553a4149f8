//! KNXnet/IP routing client.
//!
//! Unlike tunneling, routing talks to the bus over IP multicast: every
//! participant on `224.0.23.12` sees every `ROUTING_INDICATION`, so there is
//! no connection handshake and no per-frame ACK. Flow control instead relies
//! on a bounded send queue, a minimum inter-send gap, and a back-off protocol
//! triggered by `ROUTING_BUSY` frames from congested routers.
//!
//! Like [`crate::protocol::tunnel::TunnelClient`], this is a pure state
//! machine: it builds and parses frames and tracks timers, but performs no
//! I/O and owns no clock. The caller supplies `now_ms` (and, for busy
//! back-off jitter, a `[0, 1)` random sample) so the type stays testable and
//! `no_std`-friendly.

use crate::error::{KnxError, Result};
use crate::protocol::constants::*;
use crate::protocol::frame::{FrameBuilder, KnxnetIpFrame};

/// KNX routing multicast address, `224.0.23.12`.
pub const KNX_MULTICAST_ADDR: [u8; 4] = [224, 0, 23, 12];

/// Maximum number of queued outbound frames before the oldest is dropped.
pub const QUEUE_CAPACITY: usize = 50;

/// Minimum gap between two sends, in milliseconds (~50 telegrams/s).
pub const MIN_SEND_GAP_MILLIS: u32 = 20;

/// Window in which a second `ROUTING_BUSY` is treated as the same burst
/// rather than incrementing the back-off counter again.
const BUSY_COALESCE_WINDOW_MILLIS: u32 = 10;

/// Per-increment of `N` random jitter added to a `ROUTING_BUSY` wait, in ms.
const BUSY_JITTER_MILLIS_PER_N: f32 = 50.0;

/// Hold-off before the slow-decrement timer starts, `N` * this many ms.
const SLOW_DURATION_MILLIS_PER_N: u32 = 100;

/// Interval at which `N` ticks down by one once the slow duration elapses.
const SLOW_DECREMENT_INTERVAL_MILLIS: u32 = 5;

/// A queued outbound cEMI frame, stored inline (no heap).
#[derive(Clone, Copy)]
struct QueuedFrame {
    data: [u8; MAX_CEMI_SIZE],
    len: usize,
}

impl QueuedFrame {
    fn new(cemi_data: &[u8]) -> Result<Self> {
        if cemi_data.len() > MAX_CEMI_SIZE {
            return Err(KnxError::payload_too_large());
        }
        let mut data = [0u8; MAX_CEMI_SIZE];
        data[..cemi_data.len()].copy_from_slice(cemi_data);
        Ok(Self {
            data,
            len: cemi_data.len(),
        })
    }

    fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// Outcome of [`RoutingClient::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The frame was queued without dropping anything.
    Queued,
    /// The queue was full; the oldest queued frame was dropped to make room.
    QueueOverflow,
}

/// Outcome of [`RoutingClient::handle_routing_busy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingBusyOutcome {
    /// Updated back-off counter `N`.
    pub busy_count: u32,
    /// Total milliseconds the sender is now paused for.
    pub wait_millis: u32,
}

/// Routing client state machine: multicast send queue and `ROUTING_BUSY`
/// back-off. Driven over an `AsyncTransport`-style socket by the caller.
pub struct RoutingClient {
    queue: heapless::Deque<QueuedFrame, QUEUE_CAPACITY>,
    last_send_time_ms: Option<u32>,
    paused_until_ms: Option<u32>,
    /// Persistent back-off counter `N`.
    busy_count: u32,
    last_busy_time_ms: Option<u32>,
    slow_duration_deadline_ms: Option<u32>,
    last_decrement_ms: Option<u32>,
}

impl RoutingClient {
    /// Create a new routing client with an empty send queue.
    pub const fn new() -> Self {
        Self {
            queue: heapless::Deque::new(),
            last_send_time_ms: None,
            paused_until_ms: None,
            busy_count: 0,
            last_busy_time_ms: None,
            slow_duration_deadline_ms: None,
            last_decrement_ms: None,
        }
    }

    /// Current value of the `ROUTING_BUSY` back-off counter `N`.
    pub const fn busy_count(&self) -> u32 {
        self.busy_count
    }

    /// Number of frames currently queued.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the sender is currently paused due to `ROUTING_BUSY`.
    pub fn is_paused(&self, now_ms: u32) -> bool {
        self.paused_until_ms.is_some_and(|deadline| now_ms < deadline)
    }

    /// Queue a cEMI frame for sending. On overflow the oldest queued frame
    /// is dropped (KNX routing rule: "the last frame to be routed shall be
    /// cast off").
    pub fn enqueue(&mut self, cemi_data: &[u8]) -> Result<EnqueueOutcome> {
        let frame = QueuedFrame::new(cemi_data)?;

        if self.queue.is_full() {
            self.queue.pop_front();
            // `push_back` cannot fail immediately after `pop_front` freed a slot.
            let _ = self.queue.push_back(frame);
            return Ok(EnqueueOutcome::QueueOverflow);
        }

        let _ = self.queue.push_back(frame);
        Ok(EnqueueOutcome::Queued)
    }

    /// Whether a queued frame may be sent right now: not paused, at least one
    /// frame queued, and the minimum inter-send gap has elapsed.
    pub fn ready_to_send(&self, now_ms: u32) -> bool {
        if self.is_paused(now_ms) || self.queue.is_empty() {
            return false;
        }
        match self.last_send_time_ms {
            Some(last) => now_ms.wrapping_sub(last) >= MIN_SEND_GAP_MILLIS,
            None => true,
        }
    }

    /// Pop the next queued frame (if any and if [`RoutingClient::ready_to_send`])
    /// and build its `ROUTING_INDICATION` frame into `buf`.
    ///
    /// Returns the encoded length, or `None` if nothing is ready to send.
    pub fn build_next_send(&mut self, now_ms: u32, buf: &mut [u8]) -> Option<Result<usize>> {
        if !self.ready_to_send(now_ms) {
            return None;
        }
        let frame = self.queue.pop_front()?;
        self.last_send_time_ms = Some(now_ms);
        let builder = FrameBuilder::new(ServiceType::RoutingIndication, frame.as_slice());
        Some(builder.build(buf))
    }

    /// Parse an inbound KNXnet/IP frame.
    pub fn parse_frame<'a>(&self, data: &'a [u8]) -> Result<KnxnetIpFrame<'a>> {
        KnxnetIpFrame::parse(data)
    }

    /// Handle an inbound `ROUTING_BUSY` body: `[0x06][device_state][wait_time:2 BE][control_field:2 BE]`.
    ///
    /// `random_0_1` must be a sample in `[0, 1)`, supplied by the caller since
    /// this type has no entropy source of its own.
    pub fn handle_routing_busy(
        &mut self,
        body: &[u8],
        now_ms: u32,
        random_0_1: f32,
    ) -> Result<RoutingBusyOutcome> {
        if body.len() < 6 {
            return Err(KnxError::invalid_frame());
        }
        let wait_time_ms = u16::from_be_bytes([body[2], body[3]]);

        // Coalesce bursts: a second ROUTING_BUSY within the coalesce window
        // doesn't increment N again.
        let within_burst = self
            .last_busy_time_ms
            .is_some_and(|last| now_ms.wrapping_sub(last) <= BUSY_COALESCE_WINDOW_MILLIS);
        if !within_burst {
            self.busy_count = self.busy_count.saturating_add(1);
        }
        self.last_busy_time_ms = Some(now_ms);

        let jitter_ms = (random_0_1.clamp(0.0, 1.0) * self.busy_count as f32 * BUSY_JITTER_MILLIS_PER_N) as u32;
        let total_wait = u32::from(wait_time_ms).saturating_add(jitter_ms);
        self.paused_until_ms = Some(now_ms.saturating_add(total_wait));

        let slow_duration = self.busy_count.saturating_mul(SLOW_DURATION_MILLIS_PER_N);
        self.slow_duration_deadline_ms = Some(now_ms.saturating_add(slow_duration));
        self.last_decrement_ms = None;

        Ok(RoutingBusyOutcome {
            busy_count: self.busy_count,
            wait_millis: total_wait,
        })
    }

    /// Drive the slow-decrement timer: once the slow duration has elapsed,
    /// decrement `N` by one every [`SLOW_DECREMENT_INTERVAL_MILLIS`] until it
    /// reaches zero. Call this periodically (e.g. every few ms) from the
    /// async driver's timer loop.
    pub fn tick(&mut self, now_ms: u32) {
        let Some(deadline) = self.slow_duration_deadline_ms else {
            return;
        };
        if now_ms < deadline {
            return;
        }
        if self.busy_count == 0 {
            self.slow_duration_deadline_ms = None;
            return;
        }

        let ready = match self.last_decrement_ms {
            Some(last) => now_ms.wrapping_sub(last) >= SLOW_DECREMENT_INTERVAL_MILLIS,
            None => true,
        };
        if ready {
            self.busy_count -= 1;
            self.last_decrement_ms = Some(now_ms);
            if self.busy_count == 0 {
                self.slow_duration_deadline_ms = None;
                self.last_decrement_ms = None;
            }
        }
    }

    /// Handle an inbound `ROUTING_LOST_MESSAGE`: surfaced to the caller with
    /// no side effect on the sender's state.
    pub fn handle_routing_lost_message(&self, body: &[u8]) -> Result<u16> {
        if body.len() < 4 {
            return Err(KnxError::invalid_frame());
        }
        Ok(u16::from_be_bytes([body[2], body[3]]))
    }
}

impl Default for RoutingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_has_empty_queue() {
        let client = RoutingClient::new();
        assert_eq!(client.queue_len(), 0);
        assert_eq!(client.busy_count(), 0);
        assert!(!client.is_paused(0));
    }

    #[test]
    fn enqueue_reports_overflow_and_drops_oldest() {
        let mut client = RoutingClient::new();
        for i in 0..QUEUE_CAPACITY {
            let outcome = client.enqueue(&[i as u8]).unwrap();
            assert_eq!(outcome, EnqueueOutcome::Queued);
        }
        assert_eq!(client.queue_len(), QUEUE_CAPACITY);

        let outcome = client.enqueue(&[0xFF]).unwrap();
        assert_eq!(outcome, EnqueueOutcome::QueueOverflow);
        assert_eq!(client.queue_len(), QUEUE_CAPACITY);
    }

    #[test]
    fn enqueue_rejects_oversized_frame() {
        let mut client = RoutingClient::new();
        let oversized = [0u8; MAX_CEMI_SIZE + 1];
        assert!(client.enqueue(&oversized).is_err());
    }

    #[test]
    fn ready_to_send_respects_minimum_gap() {
        let mut client = RoutingClient::new();
        client.enqueue(&[0x11, 0x00, 0xBC, 0xE0]).unwrap();

        assert!(client.ready_to_send(0));
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let n = client.build_next_send(0, &mut buf).unwrap().unwrap();
        assert!(n > 0);

        client.enqueue(&[0x11, 0x00, 0xBC, 0xE0]).unwrap();
        assert!(!client.ready_to_send(10));
        assert!(client.ready_to_send(20));
    }

    #[test]
    fn build_next_send_wraps_routing_indication() {
        let mut client = RoutingClient::new();
        let cemi = [0x29, 0x00, 0xBC, 0xE0, 0x00, 0x00, 0x0C, 0x0F, 0x01, 0x00, 0x81];
        client.enqueue(&cemi).unwrap();

        let mut buf = [0u8; MAX_FRAME_SIZE];
        let n = client.build_next_send(0, &mut buf).unwrap().unwrap();

        let frame = KnxnetIpFrame::parse(&buf[..n]).unwrap();
        assert_eq!(frame.service_type(), ServiceType::RoutingIndication);
        assert_eq!(frame.body(), &cemi);
        assert_eq!(client.queue_len(), 0);
    }

    #[test]
    fn nothing_ready_without_queued_frames() {
        let mut client = RoutingClient::new();
        let mut buf = [0u8; MAX_FRAME_SIZE];
        assert!(client.build_next_send(0, &mut buf).is_none());
    }

    #[test]
    fn routing_busy_pauses_sender_and_increments_counter() {
        let mut client = RoutingClient::new();
        let body = [0x06, 0x00, 0x00, 50, 0x00, 0x00]; // wait_time = 50ms

        let outcome = client.handle_routing_busy(&body, 0, 0.0).unwrap();
        assert_eq!(outcome.busy_count, 1);
        assert_eq!(outcome.wait_millis, 50);
        assert!(client.is_paused(10));
        assert!(!client.is_paused(50));
    }

    #[test]
    fn back_to_back_busy_within_window_coalesces() {
        let mut client = RoutingClient::new();
        let body = [0x06, 0x00, 0x00, 50, 0x00, 0x00];

        client.handle_routing_busy(&body, 0, 0.0).unwrap();
        // Second busy arrives within the 10ms coalesce window.
        let outcome = client.handle_routing_busy(&body, 5, 0.0).unwrap();
        assert_eq!(outcome.busy_count, 1);

        // A third arrives after the window: counter increments again.
        let outcome = client.handle_routing_busy(&body, 100, 0.0).unwrap();
        assert_eq!(outcome.busy_count, 2);
    }

    #[test]
    fn slow_decrement_ticks_counter_to_zero() {
        let mut client = RoutingClient::new();
        let body = [0x06, 0x00, 0x00, 0, 0x00, 0x00];
        client.handle_routing_busy(&body, 0, 0.0).unwrap();
        assert_eq!(client.busy_count(), 1);

        // Slow duration is N*100ms = 100ms; before that, ticking does nothing.
        client.tick(50);
        assert_eq!(client.busy_count(), 1);

        client.tick(100);
        assert_eq!(client.busy_count(), 0);
    }

    #[test]
    fn routing_lost_message_has_no_side_effect() {
        let client = RoutingClient::new();
        let body = [0x06, 0x00, 0x00, 0x03];
        let count = client.handle_routing_lost_message(&body).unwrap();
        assert_eq!(count, 3);
        assert_eq!(client.busy_count(), 0);
    }

    #[test]
    fn routing_busy_truncated_body_is_invalid_frame() {
        let mut client = RoutingClient::new();
        let result = client.handle_routing_busy(&[0x06, 0x00], 0, 0.0);
        assert!(result.is_err());
    }
}
