//! Async driver for [`TunnelClient`], generic over [`AsyncTransport`].
//!
//! This replaces the earlier embassy-only wrapper: the state machine in
//! `tunnel.rs` never touches the network, so any [`AsyncTransport`]
//! implementation (embassy UDP, tokio UDP, the in-memory mock) can drive it
//! the same way.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::net::mock_transport::MockTransport;
//! use knx_pico::protocol::tunnel_client::AsyncTunnelClient;
//!
//! # async fn run() -> knx_pico::Result<()> {
//! let transport = MockTransport::new();
//! let mut client = AsyncTunnelClient::new(transport, [192, 168, 1, 10], 3671);
//! client.connect().await?;
//! client.send_cemi(&[0x29, 0x00, 0xBC, 0xE0, 0x11, 0x01, 0x09, 0x01, 0x01, 0x00, 0x81]).await?;
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{KnxError, Result};
use crate::net::transport::AsyncTransport;
use crate::net::IpEndpoint;
use crate::protocol::constants::ServiceType;
use crate::protocol::frame::KnxnetIpFrame;
use crate::protocol::tunnel::{TunnelClient, ACK_TIMEOUT_MILLIS, HEARTBEAT_TIMEOUT_SECS};

const MAX_PACKET_SIZE: usize = 512;
const CONNECT_TIMEOUT_MILLIS: u32 = 5000;

/// Outcome of [`AsyncTunnelClient::poll_receive`].
#[derive(Debug)]
pub enum TunnelEvent<'a> {
    /// An application cEMI frame (L_Data.ind) arrived and was already ACKed.
    Cemi(&'a [u8]),
    /// Nothing arrived within the poll window.
    Idle,
}

/// Drives a [`TunnelClient`] state machine over a transport.
pub struct AsyncTunnelClient<T: AsyncTransport> {
    transport: T,
    tunnel: TunnelClient,
    gateway: IpEndpoint,
    rx_buffer: [u8; MAX_PACKET_SIZE],
    cemi_scratch: [u8; MAX_PACKET_SIZE],
}

impl<T: AsyncTransport> AsyncTunnelClient<T> {
    /// Create a new driver around `transport`, targeting `gateway_addr:gateway_port`.
    pub fn new(transport: T, gateway_addr: [u8; 4], gateway_port: u16) -> Self {
        Self {
            transport,
            tunnel: TunnelClient::new(gateway_addr, gateway_port),
            gateway: IpEndpoint::new(gateway_addr.into(), gateway_port),
            rx_buffer: [0u8; MAX_PACKET_SIZE],
            cemi_scratch: [0u8; MAX_PACKET_SIZE],
        }
    }

    /// Whether the underlying state machine believes it is connected.
    pub fn is_connected(&self) -> bool {
        self.tunnel.is_connected()
    }

    /// Gateway address this client targets.
    pub fn gateway_addr(&self) -> ([u8; 4], u16) {
        self.tunnel.gateway_addr()
    }

    /// Send CONNECT_REQUEST and wait for CONNECT_RESPONSE.
    pub async fn connect(&mut self) -> Result<()> {
        self.transport.bind(0)?;

        let frame = self.tunnel.build_connect_request()?;
        self.transport.send_to(frame, self.gateway).await?;

        let (n, _) = self
            .transport
            .recv_timeout(&mut self.rx_buffer, CONNECT_TIMEOUT_MILLIS)
            .await?
            .ok_or_else(KnxError::connect_timeout)?;

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;
        if frame.service_type() != ServiceType::ConnectResponse {
            return Err(KnxError::invalid_frame());
        }

        self.tunnel.handle_connect_response(frame.body())
    }

    /// Send a cEMI frame, retrying the TUNNELING_REQUEST once if no ACK arrives,
    /// and tearing the connection down if the retry also times out.
    pub async fn send_cemi(&mut self, cemi_data: &[u8]) -> Result<()> {
        if !self.tunnel.is_connected() {
            return Err(KnxError::not_connected());
        }

        let sent_sequence = self.tunnel.send_sequence();
        let frame = self.tunnel.build_tunneling_request(cemi_data)?;
        self.transport.send_to(frame, self.gateway).await?;

        if self.await_ack().await.is_ok() {
            return Ok(());
        }

        // Retry once with the same cEMI payload (gateway may never have seen it).
        let frame = self.tunnel.build_tunneling_request(cemi_data)?;
        self.transport.send_to(frame, self.gateway).await?;

        match self.await_ack().await {
            Ok(()) => Ok(()),
            Err(_) => {
                self.tunnel.reset();
                Err(KnxError::tunnel_ack_timeout(sent_sequence))
            }
        }
    }

    async fn await_ack(&mut self) -> Result<()> {
        let (n, _) = self
            .transport
            .recv_timeout(&mut self.rx_buffer, ACK_TIMEOUT_MILLIS)
            .await?
            .ok_or_else(KnxError::tunneling_ack_failed)?;

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;
        if frame.service_type() != ServiceType::TunnellingAck {
            return Err(KnxError::invalid_frame());
        }

        self.tunnel.handle_tunneling_ack(frame.body())
    }

    /// Poll for an inbound frame, handling TUNNELING_REQUEST indications (ACKing
    /// them, including gateway retransmits) transparently.
    pub async fn poll_receive(&mut self, timeout_ms: u32) -> Result<TunnelEvent<'_>> {
        let Some((n, _)) = self.transport.recv_timeout(&mut self.rx_buffer, timeout_ms).await? else {
            return Ok(TunnelEvent::Idle);
        };

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;
        if frame.service_type() != ServiceType::TunnellingRequest {
            return Ok(TunnelEvent::Idle);
        }

        let indication = self.tunnel.handle_tunneling_request(frame.body())?;
        let ack_frame = self.tunnel.build_tunneling_ack(indication.ack_sequence, 0)?;
        self.transport.send_to(ack_frame, self.gateway).await?;

        if indication.is_duplicate {
            return Ok(TunnelEvent::Idle);
        }

        let len = indication.cemi_data.len();
        self.cemi_scratch[..len].copy_from_slice(indication.cemi_data);
        Ok(TunnelEvent::Cemi(&self.cemi_scratch[..len]))
    }

    /// Send a CONNECTIONSTATE_REQUEST heartbeat and wait for the response.
    pub async fn heartbeat(&mut self) -> Result<()> {
        let frame = self.tunnel.build_connectionstate_request()?;
        self.transport.send_to(frame, self.gateway).await?;

        let (n, _) = self
            .transport
            .recv_timeout(&mut self.rx_buffer, HEARTBEAT_TIMEOUT_SECS * 1000)
            .await?
            .ok_or_else(KnxError::heartbeat_stale)?;

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;
        if frame.service_type() != ServiceType::ConnectionstateResponse {
            return Err(KnxError::invalid_frame());
        }

        self.tunnel.handle_connectionstate_response(frame.body())
    }

    /// Send DISCONNECT_REQUEST and wait (best-effort) for the response.
    pub async fn disconnect(&mut self) -> Result<()> {
        let frame = self.tunnel.build_disconnect_request()?;
        self.transport.send_to(frame, self.gateway).await?;

        if let Ok(Some((n, _))) = self.transport.recv_timeout(&mut self.rx_buffer, ACK_TIMEOUT_MILLIS).await {
            if let Ok(frame) = KnxnetIpFrame::parse(&self.rx_buffer[..n]) {
                if frame.service_type() == ServiceType::DisconnectResponse {
                    let _ = self.tunnel.handle_disconnect_response(frame.body());
                }
            }
        }

        self.tunnel.reset();
        self.transport.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::mock_transport::MockTransport;

    fn connect_response(channel_id: u8, status: u8) -> Vec<u8> {
        let mut body = vec![
            0x06, 0x10, 0x02, 0x06, 0x00, 0x14, channel_id, status, 0x08, 0x01, 192, 168, 1, 10,
            0x0E, 0x57, 0x04, 0x04, 0x02, 0x00,
        ];
        let len = body.len() as u16;
        body[4..6].copy_from_slice(&len.to_be_bytes());
        body
    }

    #[tokio::test]
    async fn connect_assigns_channel_and_transitions_connected() {
        let mut mock = MockTransport::new();
        mock.add_response(connect_response(7, 0x00));

        let mut client = AsyncTunnelClient::new(mock, [192, 168, 1, 10], 3671);
        client.connect().await.unwrap();

        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn connect_timeout_surfaces_connect_timeout_error() {
        let mock = MockTransport::new(); // no responses queued
        let mut client = AsyncTunnelClient::new(mock, [192, 168, 1, 10], 3671);

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, KnxError::Connection(_)));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn send_cemi_retries_once_then_gives_up() {
        let mut mock = MockTransport::new();
        mock.add_response(connect_response(3, 0x00));

        let mut client = AsyncTunnelClient::new(mock, [192, 168, 1, 10], 3671);
        client.connect().await.unwrap();

        let err = client
            .send_cemi(&[0x29, 0x00, 0xBC, 0xE0])
            .await
            .unwrap_err();

        assert!(matches!(err, KnxError::Tunneling(e) if e.ack_timeout_seq() == Some(0)));
        assert!(!client.is_connected());
    }
}
