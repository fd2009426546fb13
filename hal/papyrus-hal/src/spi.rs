//! SPI bus abstractions
//!
//! Provides the DMA-driven SPI master trait used by the panel transport.
//! Every transfer is asynchronous hardware work: the implementation starts
//! the DMA channels and the returned future resolves once the completion
//! interrupt has fired.

use core::future::Future;

/// Errors reported by a DMA SPI bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// The SPI peripheral reported a bus fault
    Bus,
    /// The DMA engine reported a transfer fault
    Dma,
    /// The bus was used before being configured
    NotConfigured,
}

/// DMA-driven SPI bus master
///
/// A single transfer must never exceed [`DmaSpi::MAX_TRANSACTION`] bytes;
/// callers split larger payloads into chunks.
pub trait DmaSpi {
    /// Largest payload a single DMA transaction can carry
    const MAX_TRANSACTION: usize;

    /// Apply electrical parameters and bind the TX/RX DMA channels
    fn configure(&mut self, config: &SpiConfig) -> Result<(), SpiError>;

    /// Reprogram the bus clock without a full re-configuration
    fn set_frequency(&mut self, hz: u32) -> Result<(), SpiError>;

    /// Write one chunk, resolving on DMA completion
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), SpiError>>;

    /// Read one chunk, resolving on DMA completion
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<(), SpiError>>;

    /// Release the peripheral and its DMA channels
    fn release(&mut self);
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Chip-select active level
    pub cs_polarity: ChipSelectPolarity,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
            bit_order: BitOrder::MsbFirst,
            cs_polarity: ChipSelectPolarity::ActiveLow,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// Order in which bits of a byte are shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Chip-select active level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelectPolarity {
    ActiveLow,
    ActiveHigh,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

impl SpiConfig {
    /// Build a configuration for the given mode and clock rate
    pub fn with_mode(mode: Mode, frequency: u32) -> Self {
        let (polarity, phase) = mode.into();
        Self {
            frequency,
            polarity,
            phase,
            ..Self::default()
        }
    }
}
