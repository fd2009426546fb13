//! Display driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in papyrus-core and papyrus-hal:
//!
//! - Panel transport (chunked DMA SPI, chip select, reset, busy line)
//! - ED028TC1 e-paper panel backend
//! - Shared-memory simulated panel for host builds
//! - Pin adapters for `embedded-hal` GPIO implementations

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod display;
pub mod ed028tc1;
pub mod pins;
pub mod sim;
pub mod transport;

pub use config::{PanelConfig, TransportConfig};
pub use display::Display;
pub use ed028tc1::Ed028tc1;
pub use sim::{SharedMemory, SimulatedDisplay};
pub use transport::{ChipSelect, PanelTransport, Transport};
