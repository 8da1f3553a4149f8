#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![allow(dead_code)]
#![doc = include_str!("../README.md")]

//! # knx-pico
//!
//! KNXnet/IP protocol implementation for embedded systems and Linux daemons.
//!
//! This crate provides a `no_std`-friendly implementation of the KNXnet/IP
//! protocol: tunneling and routing clients, cEMI frame handling, Datapoint
//! Type codecs, and KNX addressing. Protocol state machines never touch I/O
//! or time directly; an [`net::transport::AsyncTransport`] implementation
//! drives them, whether that is the Embassy UDP adapter on a microcontroller
//! or a tokio adapter in a host daemon.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::knx_client::{KnxClient, KnxValue};
//! use knx_pico::net::mock_transport::MockTransport;
//! use knx_pico::ga;
//!
//! # async fn run() -> knx_pico::Result<()> {
//! let transport = MockTransport::new();
//! let mut client = KnxClient::new(transport, [192, 168, 1, 10], 3671);
//! client.connect().await?;
//! client.write(ga!(1/2/3), KnxValue::Bool(true)).await?;
//! # Ok(())
//! # }
//! ```

pub mod addressing;
#[cfg(feature = "std")]
pub mod configuration;
pub mod dpt;
pub mod error;
pub mod knx_client;
pub mod logging;
pub mod net;
pub mod protocol;

// Macro module (must be declared before use)
#[macro_use]
pub mod macros;

// Re-export commonly used types
pub use addressing::{GroupAddress, IndividualAddress};
pub use dpt::{
    Dpt1, Dpt2, Dpt3, Dpt5, Dpt6, Dpt7, Dpt8, Dpt9, Dpt10, Dpt11, Dpt12, Dpt13, Dpt14, Dpt16,
    Dpt20, Dpt27, Dpt28, Dpt29, Dpt232, Dpt238, Dpt245, Dpt250, Dpt251, DptDecode, DptEncode,
    DptTag, DptValue,
};
pub use error::{KnxError, Result};
pub use knx_client::{DptType, KnxClient, KnxEvent, KnxValue};
