//! E-ink display service
//!
//! The display actor owns one [`DisplayBackend`](papyrus_core::DisplayBackend),
//! the settings store and a frequency sentinel, and sequences every panel
//! operation from inbound messages:
//!
//! - [`sentinel::FrequencySentinel`] - CPU frequency floor claims
//! - [`service::EinkService`] - message handling and power state machine
//! - [`task`] - async receive loop with the power-off debounce timer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod sentinel;
pub mod service;
pub mod task;

pub use sentinel::{FrequencySentinel, SentinelPolicy, SENTINEL_ID};
pub use service::{EinkService, ExitPolicy, ServiceConfig, StartError};
pub use task::{run, step};
