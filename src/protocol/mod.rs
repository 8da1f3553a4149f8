//! KNXnet/IP protocol implementation.
//!
//! This module contains the core protocol structures and parsing logic
//! for KNXnet/IP frames, cEMI messages, and KNX telegrams.

pub mod cemi;
pub mod constants;
pub mod frame;
pub mod routing;
pub mod services;
pub mod tunnel;
pub mod tunnel_client;

pub use cemi::*;
pub use constants::*;
pub use frame::*;
pub use services::*;
pub use tunnel::TunnelClient;
pub use tunnel_client::AsyncTunnelClient;
