//! DMA SPI master for RP2040
//!
//! Wraps an embassy-rp async SPI. The TX/RX DMA channels are bound when the
//! driver is constructed; `configure` applies the electrical parameters and
//! arms the bus. Chip select is a plain GPIO owned by the panel transport.

use embassy_rp::spi::{self, Async, Instance, Spi};
use papyrus_hal::spi::{BitOrder, ChipSelectPolarity, Phase, Polarity};
use papyrus_hal::{DmaSpi, SpiConfig, SpiError};

/// Largest single DMA transaction used on this board
pub const MAX_TRANSACTION: usize = 32767;

/// RP2040 DMA SPI master
pub struct Rp2040Spi<'d, T: Instance> {
    spi: Spi<'d, T, Async>,
    configured: bool,
}

impl<'d, T: Instance> Rp2040Spi<'d, T> {
    pub fn new(spi: Spi<'d, T, Async>) -> Self {
        Self {
            spi,
            configured: false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

fn to_rp_config(config: &SpiConfig) -> Result<spi::Config, SpiError> {
    // The SSP block only shifts MSB first; chip select is a GPIO
    if config.bit_order != BitOrder::MsbFirst || config.cs_polarity != ChipSelectPolarity::ActiveLow {
        return Err(SpiError::Bus);
    }

    let mut rp = spi::Config::default();
    rp.frequency = config.frequency;
    rp.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    rp.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    Ok(rp)
}

impl<'d, T: Instance> DmaSpi for Rp2040Spi<'d, T> {
    const MAX_TRANSACTION: usize = MAX_TRANSACTION;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), SpiError> {
        let rp = to_rp_config(config)?;
        self.spi.set_config(&rp);
        self.configured = true;
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), SpiError> {
        if !self.configured {
            return Err(SpiError::NotConfigured);
        }
        self.spi.set_frequency(hz);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), SpiError> {
        if !self.configured {
            return Err(SpiError::NotConfigured);
        }
        self.spi.write(data).await.map_err(|_| SpiError::Dma)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<(), SpiError> {
        if !self.configured {
            return Err(SpiError::NotConfigured);
        }
        self.spi.read(buf).await.map_err(|_| SpiError::Dma)
    }

    fn release(&mut self) {
        self.configured = false;
    }
}
