//! Panel transport
//!
//! Owns the SPI bus and the three panel control lines. Payloads larger
//! than one DMA transaction are split into chunks, each bounded by the
//! chunk timeout. A timed-out chunk future is dropped, which aborts the
//! transfer in the bus implementation.
//!
//! Every operation takes `&mut self`, so at most one transfer is ever in
//! flight.

use core::future::Future;

use embassy_time::{with_timeout, Duration, Timer};
use papyrus_core::DisplayError;
use papyrus_hal::{BitOrder, BusyPin, ChipSelectPolarity, DmaSpi, Mode, OutputPin, SpiConfig};

use crate::config::TransportConfig;

/// Chip-select handling for a block transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// Assert for the whole block, deassert afterwards (also on failure)
    Automatic,
    /// Leave chip select to the caller
    Manual,
}

/// Operations the panel driver needs from its transport
pub trait PanelTransport {
    /// Configure the bus; idempotent
    fn initialize(&mut self) -> Result<(), DisplayError>;

    /// Release the bus; transfers fail until the next `initialize`
    fn release(&mut self);

    /// Check if the bus is configured
    fn is_initialized(&self) -> bool;

    /// Write a block at the write clock rate
    fn write_block(
        &mut self,
        data: &[u8],
        cs: ChipSelect,
    ) -> impl Future<Output = Result<(), DisplayError>>;

    /// Read a block at the read clock rate
    fn read_block(
        &mut self,
        buf: &mut [u8],
        cs: ChipSelect,
    ) -> impl Future<Output = Result<(), DisplayError>>;

    /// Wait for the panel to report ready; false on timeout
    fn wait_until_not_busy(&mut self, timeout: Duration) -> impl Future<Output = bool>;

    /// Pulse the panel reset line
    fn reset_panel(&mut self) -> impl Future<Output = ()>;

    /// Drive chip select by hand (true = selected)
    fn assert_chip_select(&mut self, selected: bool);
}

/// DMA SPI transport with chip-select, reset and busy lines
pub struct Transport<B, CS, RST, BUSY> {
    bus: B,
    cs: CS,
    reset: RST,
    busy: BUSY,
    config: TransportConfig,
    initialized: bool,
    frequency: u32,
}

impl<B, CS, RST, BUSY> Transport<B, CS, RST, BUSY>
where
    B: DmaSpi,
    CS: OutputPin,
    RST: OutputPin,
    BUSY: BusyPin,
{
    /// Create an unconfigured transport
    ///
    /// Chip select starts deasserted and reset released.
    pub fn new(bus: B, mut cs: CS, mut reset: RST, busy: BUSY, config: TransportConfig) -> Self {
        cs.set_high();
        reset.set_high();
        Self {
            bus,
            cs,
            reset,
            busy,
            config,
            initialized: false,
            frequency: 0,
        }
    }

    /// Bus parameters for the panel: mode 0, MSB first, CS active low
    pub fn spi_config(&self) -> SpiConfig {
        let mut spi = SpiConfig::with_mode(Mode::Mode0, self.config.write_hz);
        spi.bit_order = BitOrder::MsbFirst;
        spi.cs_polarity = ChipSelectPolarity::ActiveLow;
        spi
    }

    /// Reprogram the bus clock; no-op when already at `hz`
    pub fn change_frequency(&mut self, hz: u32) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::BusNotInitialized);
        }
        if self.frequency == hz {
            return Ok(());
        }
        self.bus.set_frequency(hz)?;
        self.frequency = hz;
        Ok(())
    }

    /// Current bus clock, zero before initialisation
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Consume the transport and return its parts
    pub fn into_parts(self) -> (B, CS, RST, BUSY) {
        (self.bus, self.cs, self.reset, self.busy)
    }

    fn chunk_len() -> usize {
        B::MAX_TRANSACTION.max(1)
    }

    async fn write_chunks(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        let timeout = self.config.chunk_timeout();
        for chunk in data.chunks(Self::chunk_len()) {
            match with_timeout(timeout, self.bus.write(chunk)).await {
                Ok(result) => result?,
                Err(_) => return Err(DisplayError::Timeout),
            }
        }
        Ok(())
    }

    async fn read_chunks(&mut self, buf: &mut [u8]) -> Result<(), DisplayError> {
        let timeout = self.config.chunk_timeout();
        for chunk in buf.chunks_mut(Self::chunk_len()) {
            match with_timeout(timeout, self.bus.read(chunk)).await {
                Ok(result) => result?,
                Err(_) => return Err(DisplayError::Timeout),
            }
        }
        Ok(())
    }
}

impl<B, CS, RST, BUSY> PanelTransport for Transport<B, CS, RST, BUSY>
where
    B: DmaSpi,
    CS: OutputPin,
    RST: OutputPin,
    BUSY: BusyPin,
{
    fn initialize(&mut self) -> Result<(), DisplayError> {
        if self.initialized {
            return Ok(());
        }
        let spi = self.spi_config();
        self.bus
            .configure(&spi)
            .map_err(|_| DisplayError::InitError)?;
        self.cs.set_high();
        self.frequency = spi.frequency;
        self.initialized = true;
        Ok(())
    }

    fn release(&mut self) {
        if self.initialized {
            self.bus.release();
            self.cs.set_high();
            self.initialized = false;
            self.frequency = 0;
        }
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    async fn write_block(&mut self, data: &[u8], cs: ChipSelect) -> Result<(), DisplayError> {
        self.change_frequency(self.config.write_hz)?;

        if cs == ChipSelect::Automatic {
            self.cs.set_low();
        }
        let result = self.write_chunks(data).await;
        if cs == ChipSelect::Automatic {
            self.cs.set_high();
        }
        result
    }

    async fn read_block(&mut self, buf: &mut [u8], cs: ChipSelect) -> Result<(), DisplayError> {
        self.change_frequency(self.config.read_hz)?;

        if cs == ChipSelect::Automatic {
            self.cs.set_low();
        }
        let result = self.read_chunks(buf).await;
        if cs == ChipSelect::Automatic {
            self.cs.set_high();
        }
        result
    }

    async fn wait_until_not_busy(&mut self, timeout: Duration) -> bool {
        match with_timeout(timeout, self.busy.wait_for_ready()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("busy line fault: {:?}", e);
                false
            }
            Err(_) => {
                debug!("busy wait timed out");
                false
            }
        }
    }

    async fn reset_panel(&mut self) {
        let settle = self.config.reset_settle();
        self.cs.set_high();
        self.reset.set_low();
        Timer::after(settle).await;
        self.reset.set_high();
        Timer::after(settle).await;
    }

    fn assert_chip_select(&mut self, selected: bool) {
        // Active low
        self.cs.set_state(!selected);
    }
}
