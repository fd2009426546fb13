//! Backend selection
//!
//! The backend is chosen once at startup; the service only ever sees a
//! single [`DisplayBackend`].

use papyrus_core::{
    ColorMode, DisplayBackend, DisplayError, Frame, PanelSize, RefreshMode, WaveformTemperature,
};
use papyrus_hal::DeviceDescriptor;

/// Either the real panel or the shared-memory simulation
pub enum Display<P, S> {
    Panel(P),
    Simulated(S),
}

macro_rules! delegate {
    ($self:ident, $backend:ident => $call:expr) => {
        match $self {
            Display::Panel($backend) => $call,
            Display::Simulated($backend) => $call,
        }
    };
}

impl<P: DisplayBackend, S: DisplayBackend> DisplayBackend for Display<P, S> {
    fn size(&self) -> PanelSize {
        delegate!(self, b => b.size())
    }

    fn set_mode(&mut self, mode: ColorMode) {
        delegate!(self, b => b.set_mode(mode))
    }

    fn mode(&self) -> ColorMode {
        delegate!(self, b => b.mode())
    }

    async fn show_image_update(&mut self, frames: &[Frame], buffer: &[u8]) -> Result<(), DisplayError> {
        delegate!(self, b => b.show_image_update(frames, buffer).await)
    }

    async fn show_image_refresh(&mut self, frame: Frame, mode: RefreshMode) -> Result<(), DisplayError> {
        delegate!(self, b => b.show_image_refresh(frame, mode).await)
    }

    async fn show_image(
        &mut self,
        frames: &[Frame],
        refresh_frame: Frame,
        buffer: &[u8],
        mode: RefreshMode,
    ) -> Result<(), DisplayError> {
        delegate!(self, b => b.show_image(frames, refresh_frame, buffer, mode).await)
    }

    async fn prepare_early_request(&mut self, mode: RefreshMode, temperature: WaveformTemperature) {
        delegate!(self, b => b.prepare_early_request(mode, temperature).await)
    }

    async fn dither(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.dither().await)
    }

    async fn power_on(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.power_on().await)
    }

    async fn power_off(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.power_off().await)
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.shutdown().await)
    }

    async fn wipe_out(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.wipe_out().await)
    }

    async fn reset_and_init(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.reset_and_init().await)
    }

    fn device(&self) -> Option<DeviceDescriptor> {
        delegate!(self, b => b.device())
    }
}
