//! Papyrus Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs (RP2040, host simulation, etc.). This enables the
//! same panel driver and display service to run on different platforms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  papyrus-service (display actor)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  papyrus-drivers (transport, ED028TC1)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  papyrus-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ papyrus-hal-    │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::DmaSpi`] - DMA-driven SPI master
//! - [`gpio::OutputPin`], [`gpio::BusyPin`] - Digital I/O
//! - [`settings::SettingsStore`] - Persistent key/value settings
//! - [`waveform::WaveformSource`] - Waveform lookup table storage
//! - [`power::PowerAuthority`] - System power manager collaborator

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod power;
pub mod settings;
pub mod spi;
pub mod waveform;

// Re-export key traits at crate root for convenience
pub use gpio::{BusyError, BusyPin, OutputPin};
pub use power::{CpuFrequency, DeviceDescriptor, PowerAuthority, SentinelId};
pub use settings::{SettingKey, SettingValue, SettingsError, SettingsStore};
pub use spi::{BitOrder, ChipSelectPolarity, DmaSpi, Mode, Phase, Polarity, SpiConfig, SpiError};
pub use waveform::{WaveformError, WaveformSource};
