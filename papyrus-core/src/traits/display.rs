//! Display backend trait
//!
//! Both the real panel driver and the host simulation implement this.
//! The service owns exactly one backend and calls it from a single task,
//! so methods take `&mut self` and each call completes before returning.

use core::future::Future;

use papyrus_hal::DeviceDescriptor;

use crate::frame::{Frame, PanelSize};
use crate::mode::{ColorMode, RefreshMode, WaveformTemperature};
use crate::status::DisplayError;

/// Trait for e-ink display backends
///
/// The pixel buffer holds one byte per pixel (4-bit grey level, 0 black,
/// 15 white) with a row stride equal to the panel width. It is borrowed
/// for the duration of a call only.
pub trait DisplayBackend {
    /// Panel resolution
    fn size(&self) -> PanelSize;

    /// Set colour inversion for subsequent updates
    fn set_mode(&mut self, mode: ColorMode);

    /// Current colour mode
    fn mode(&self) -> ColorMode;

    /// Write each frame's sub-rectangle of `buffer` into panel memory
    ///
    /// No visible change until a refresh.
    fn show_image_update(
        &mut self,
        frames: &[Frame],
        buffer: &[u8],
    ) -> impl Future<Output = Result<(), DisplayError>>;

    /// Apply the refresh waveform over `frame`
    fn show_image_refresh(
        &mut self,
        frame: Frame,
        mode: RefreshMode,
    ) -> impl Future<Output = Result<(), DisplayError>>;

    /// Prepare, update every frame, then refresh `refresh_frame`
    ///
    /// `RefreshMode::None` writes panel memory without refreshing.
    fn show_image(
        &mut self,
        frames: &[Frame],
        refresh_frame: Frame,
        buffer: &[u8],
        mode: RefreshMode,
    ) -> impl Future<Output = Result<(), DisplayError>>;

    /// Pre-load the waveform for an expected refresh
    ///
    /// Failures are ignored; the next draw prepares again.
    fn prepare_early_request(
        &mut self,
        mode: RefreshMode,
        temperature: WaveformTemperature,
    ) -> impl Future<Output = ()>;

    /// Run the panel dithering pass
    fn dither(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Power the panel on; no-op when already powered
    fn power_on(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Power the panel off; no-op when already off
    fn power_off(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Power off and release the bus
    fn shutdown(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Fill the panel white with a deep refresh
    fn wipe_out(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Reset the panel and apply the initial configuration
    fn reset_and_init(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Device registered with the power manager, if any
    fn device(&self) -> Option<DeviceDescriptor>;
}
