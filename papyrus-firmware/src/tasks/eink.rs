//! Display service task

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_time::Instant;

use papyrus_drivers::pins::{ActiveLowBusy, HalOutput};
use papyrus_drivers::{Display, Ed028tc1, SimulatedDisplay, Transport};
use papyrus_hal::{CpuFrequency, DeviceDescriptor, PowerAuthority, SentinelId};
use papyrus_hal_rp2040::{FlashSettings, FlashWaveforms, Rp2040Spi};
use papyrus_service::run;

use crate::channels::{SystemRequest, EINK_INBOX, GUI_OUTBOX, SYSTEM_CHANNEL};

/// Panel bus on this board
pub type PanelTransport = Transport<
    Rp2040Spi<'static, SPI0>,
    HalOutput<Output<'static>>,
    HalOutput<Output<'static>>,
    ActiveLowBusy<Input<'static>>,
>;

pub type Panel = Ed028tc1<'static, PanelTransport, FlashWaveforms<'static, 'static>>;

/// Target builds always select the panel variant
pub type EinkDisplay = Display<Panel, SimulatedDisplay<&'static mut [u8]>>;

pub type EinkService =
    papyrus_service::EinkService<EinkDisplay, FlashSettings<'static, 'static>, ChannelAuthority>;

/// Power authority reached through the system channel
pub struct ChannelAuthority;

impl ChannelAuthority {
    fn send(&self, request: SystemRequest) {
        if SYSTEM_CHANNEL.try_send(request).is_err() {
            warn!("System channel full, dropped {:?}", request);
        }
    }
}

impl PowerAuthority for ChannelAuthority {
    fn register_device(&mut self, device: DeviceDescriptor) {
        self.send(SystemRequest::RegisterDevice(device));
    }

    fn register_sentinel(&mut self, sentinel: SentinelId) {
        self.send(SystemRequest::RegisterSentinel(sentinel));
    }

    fn request_frequency_floor(&mut self, sentinel: SentinelId, level: CpuFrequency) {
        self.send(SystemRequest::FrequencyFloor(sentinel, level));
    }

    fn release_frequency_floor(&mut self, sentinel: SentinelId) {
        self.send(SystemRequest::ReleaseFloor(sentinel));
    }
}

/// Display task - starts the service and runs its message loop
#[embassy_executor::task]
pub async fn eink_task(mut service: EinkService) {
    info!("Eink task started");

    if let Err(e) = service.start(Instant::now().as_millis()).await {
        // Not registered with the system; the GUI never gets a display
        error!("Display service failed to start: {:?}", e);
        return;
    }

    run(&mut service, EINK_INBOX.receiver(), GUI_OUTBOX.sender()).await
}
