//! Papyrus - E-ink Display Firmware
//!
//! Main firmware binary for RP2040 boards driving an ED028TC1 panel.
//! Wires the panel bus, flash partitions and the display service, then
//! leaves all work to the spawned tasks.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use papyrus_drivers::pins::{ActiveLowBusy, HalOutput};
use papyrus_drivers::{Display, Ed028tc1, PanelConfig, Transport, TransportConfig};
use papyrus_hal_rp2040::{FlashMutex, FlashSettings, FlashWaveforms, Rp2040Spi};
use papyrus_service::ServiceConfig;

use crate::tasks::{ChannelAuthority, EinkService};

mod channels;
mod tasks;

/// Panel scratch: one packed full frame plus the data command header
const SCRATCH_LEN: usize = 2 + 240 * 600;

// Static cells for resources shared with tasks (must live forever)
static FLASH: StaticCell<FlashMutex<'static>> = StaticCell::new();
static SCRATCH: StaticCell<[u8; SCRATCH_LEN]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Papyrus firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Panel bus (SPI0: SCK=GPIO18, MOSI=GPIO19, MISO=GPIO16)
    // Control lines: CS=GPIO17, RST=GPIO20, BUSY=GPIO21 (active low)
    let transport_config = TransportConfig::default();
    let mut spi_config = embassy_rp::spi::Config::default();
    spi_config.frequency = transport_config.write_hz;
    let spi = Spi::new(
        p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, p.DMA_CH0, p.DMA_CH1, spi_config,
    );
    let cs = HalOutput::new(Output::new(p.PIN_17, Level::High), true);
    let reset = HalOutput::new(Output::new(p.PIN_20, Level::High), true);
    let busy = ActiveLowBusy::new(Input::new(p.PIN_21, Pull::Up));
    let transport = Transport::new(Rp2040Spi::new(spi), cs, reset, busy, transport_config);

    // Flash: waveform blob and settings share the peripheral
    let flash: &'static FlashMutex<'static> =
        FLASH.init(Mutex::new(Flash::new(p.FLASH, p.DMA_CH2)));

    let panel_config = PanelConfig::default();
    if panel_config.scratch_len() > SCRATCH_LEN {
        warn!("Panel scratch smaller than a full frame");
    }
    let scratch = SCRATCH.init([0u8; SCRATCH_LEN]);
    let panel = Ed028tc1::new(transport, FlashWaveforms::new(flash), panel_config, scratch);
    info!("ED028TC1 panel configured");

    let service = EinkService::new(
        Display::Panel(panel),
        FlashSettings::new(flash),
        ChannelAuthority,
        ServiceConfig::default(),
    );

    // Spawn tasks
    spawner.spawn(tasks::system_task()).unwrap();
    spawner.spawn(tasks::eink_task(service)).unwrap();

    info!("All tasks spawned, firmware running");
}
