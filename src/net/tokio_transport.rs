//! Tokio UDP socket adapter for `AsyncTransport`.
//!
//! This mirrors [`crate::net::embassy_adapter::EmbassyUdpTransport`] but
//! wraps `tokio::net::UdpSocket`, so the same [`AsyncTunnelClient`](crate::protocol::tunnel_client::AsyncTunnelClient)
//! and [`RoutingClient`](crate::protocol::routing::RoutingClient) drive a
//! real host socket instead of an embedded one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::net::tokio_transport::TokioUdpTransport;
//! use knx_pico::net::IpEndpoint;
//!
//! # async fn run() -> knx_pico::Result<()> {
//! let mut transport = TokioUdpTransport::bind(0).await?;
//! transport.send_to(&[0x06, 0x10], IpEndpoint::new([192, 168, 1, 10].into(), 3671)).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{KnxError, Result};
use crate::net::transport::AsyncTransport;
use crate::net::{IpEndpoint, Ipv4Addr};
use std::net::SocketAddrV4;
use tokio::net::UdpSocket;

/// Adapter for `tokio::net::UdpSocket` implementing [`AsyncTransport`].
#[derive(Debug)]
pub struct TokioUdpTransport {
    socket: UdpSocket,
    closed: bool,
}

impl TokioUdpTransport {
    /// Bind a new UDP socket on `0.0.0.0:port` (0 = any available port).
    pub async fn bind(port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|_| KnxError::socket_error())?;
        Ok(Self { socket, closed: false })
    }

    /// Bind a new UDP socket on a specific local interface address.
    pub async fn bind_to(addr: Ipv4Addr, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(addr.octets().into(), port))
            .await
            .map_err(|_| KnxError::socket_error())?;
        Ok(Self { socket, closed: false })
    }

    /// Join the KNX routing multicast group (`224.0.23.12`) on this socket.
    pub fn join_multicast(&self, group: Ipv4Addr, interface: Ipv4Addr) -> Result<()> {
        self.socket
            .join_multicast_v4(group.octets().into(), interface.octets().into())
            .map_err(|_| KnxError::socket_error())
    }

    /// Set the outgoing multicast TTL (KNX routing convention: 128).
    pub fn set_multicast_ttl(&self, ttl: u32) -> Result<()> {
        self.socket
            .set_multicast_ttl_v4(ttl)
            .map_err(|_| KnxError::socket_error())
    }

    /// Enable or disable receiving our own multicast sends.
    pub fn set_multicast_loop(&self, enable: bool) -> Result<()> {
        self.socket
            .set_multicast_loop_v4(enable)
            .map_err(|_| KnxError::socket_error())
    }
}

impl AsyncTransport for TokioUdpTransport {
    async fn send_to(&mut self, data: &[u8], addr: IpEndpoint) -> Result<()> {
        if self.closed {
            return Err(KnxError::not_bound());
        }
        let octets = addr.addr.octets();
        let target = SocketAddrV4::new(octets.into(), addr.port);
        self.socket
            .send_to(data, target)
            .await
            .map_err(|_| KnxError::send_failed())?;
        Ok(())
    }

    async fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, IpEndpoint)> {
        if self.closed {
            return Err(KnxError::not_bound());
        }
        let (n, from) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|_| KnxError::receive_failed())?;
        Ok((n, socket_addr_to_endpoint(from)))
    }

    async fn recv_timeout(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<Option<(usize, IpEndpoint)>> {
        match tokio::time::timeout(
            std::time::Duration::from_millis(u64::from(timeout_ms)),
            self.recv_from(buf),
        )
        .await
        {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }

    fn is_ready(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

fn socket_addr_to_endpoint(addr: std::net::SocketAddr) -> IpEndpoint {
    match addr {
        std::net::SocketAddr::V4(v4) => IpEndpoint::new(Ipv4Addr::from(v4.ip().octets()), v4.port()),
        std::net::SocketAddr::V6(_) => IpEndpoint::UNSPECIFIED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_any_port_then_send_receive_loopback() {
        let mut server = TokioUdpTransport::bind(0).await.unwrap();
        let server_port = server.socket.local_addr().unwrap().port();

        let mut client = TokioUdpTransport::bind(0).await.unwrap();
        let server_endpoint = IpEndpoint::new(Ipv4Addr::LOCALHOST, server_port);

        client.send_to(&[0xAA, 0xBB, 0xCC], server_endpoint).await.unwrap();

        let mut buf = [0u8; 16];
        let (n, _from) = server.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], &[0xAA, 0xBB, 0xCC]);
    }

    #[tokio::test]
    async fn recv_timeout_returns_none_when_nothing_arrives() {
        let mut transport = TokioUdpTransport::bind(0).await.unwrap();
        let mut buf = [0u8; 16];
        let result = transport.recv_timeout(&mut buf, 20).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn closed_transport_rejects_send_and_receive() {
        let mut transport = TokioUdpTransport::bind(0).await.unwrap();
        transport.close();
        assert!(!transport.is_ready());

        let dest = IpEndpoint::new(Ipv4Addr::LOCALHOST, 3671);
        assert!(transport.send_to(&[0x01], dest).await.is_err());

        let mut buf = [0u8; 4];
        assert!(transport.recv_from(&mut buf).await.is_err());
    }
}
