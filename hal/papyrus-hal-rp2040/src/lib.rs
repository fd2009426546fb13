//! RP2040-specific HAL for the e-ink display service
//!
//! This crate provides RP2040 implementations of the shared
//! `papyrus-hal` traits:
//!
//! - DMA SPI master for the panel bus (implements `papyrus_hal::DmaSpi`)
//! - Flash settings store (implements `papyrus_hal::SettingsStore`)
//! - Flash waveform partition (implements `papyrus_hal::WaveformSource`)

#![no_std]

pub mod flash;
pub mod spi;

pub use flash::{FlashMutex, FlashSettings, FlashWaveforms};
pub use spi::Rp2040Spi;

// Re-export shared traits from papyrus-hal for convenience
pub use papyrus_hal::{DmaSpi, SettingsStore, WaveformSource};
