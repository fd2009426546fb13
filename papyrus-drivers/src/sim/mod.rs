//! Simulated panel for host builds
//!
//! The panel is a shared-memory region read by an external viewer:
//!
//! ```text
//! +--------------------------------------+
//! | frame_count | width | height  (u32 LE)|
//! +--------------------------------------+
//! | visible plane   (width*height bytes) |
//! +--------------------------------------+
//! | internal plane  (width*height bytes) |
//! +--------------------------------------+
//! ```
//!
//! Updates write the internal plane; a refresh copies the refreshed
//! rectangle to the visible plane and bumps `frame_count`, which the
//! viewer polls.

#[cfg(feature = "std")]
mod mmap;

#[cfg(feature = "std")]
pub use mmap::FileRegion;

use papyrus_core::{
    ColorMode, DisplayBackend, DisplayError, Frame, PanelSize, RefreshMode, WaveformTemperature,
};
use papyrus_hal::DeviceDescriptor;

/// Size of the region header
pub const HEADER_LEN: usize = 12;

/// Grey level written by a wipe-out
pub const WHITE: u8 = 0x0F;

/// Bytes needed for a panel of `size`
pub const fn region_len(size: PanelSize) -> usize {
    HEADER_LEN + 2 * size.pixel_count()
}

/// Memory shared with the viewer
pub trait SharedMemory {
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];
}

impl SharedMemory for &mut [u8] {
    fn bytes(&self) -> &[u8] {
        &**self
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut **self
    }
}

/// Panel simulated in shared memory
pub struct SimulatedDisplay<M> {
    memory: M,
    size: PanelSize,
    mode: ColorMode,
    powered: bool,
    initialized: bool,
}

impl<M: SharedMemory> SimulatedDisplay<M> {
    /// Wrap a region; fails with `OutOfMemory` if it is too small
    pub fn new(memory: M, size: PanelSize) -> Result<Self, DisplayError> {
        if memory.bytes().len() < region_len(size) {
            return Err(DisplayError::OutOfMemory);
        }
        Ok(Self {
            memory,
            size,
            mode: ColorMode::Standard,
            powered: false,
            initialized: false,
        })
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Refresh counter from the region header
    pub fn frame_count(&self) -> u32 {
        self.header_field(0)
    }

    /// Plane shown by the viewer
    pub fn visible(&self) -> &[u8] {
        let n = self.size.pixel_count();
        &self.memory.bytes()[HEADER_LEN..HEADER_LEN + n]
    }

    /// Plane written by updates
    pub fn internal(&self) -> &[u8] {
        let n = self.size.pixel_count();
        &self.memory.bytes()[HEADER_LEN + n..HEADER_LEN + 2 * n]
    }

    pub fn into_inner(self) -> M {
        self.memory
    }

    fn header_field(&self, index: usize) -> u32 {
        let at = index * 4;
        let b = &self.memory.bytes()[at..at + 4];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    fn set_header_field(&mut self, index: usize, value: u32) {
        let at = index * 4;
        self.memory.bytes_mut()[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn bump_frame_count(&mut self) {
        let count = self.frame_count().wrapping_add(1);
        self.set_header_field(0, count);
    }

    fn ready(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::BusNotInitialized)
        }
    }

    fn check_frame(&self, frame: Frame) -> Result<(), DisplayError> {
        if !frame.fits(self.size) {
            return Err(DisplayError::Error);
        }
        Ok(())
    }

    fn update(&mut self, frames: &[Frame], buffer: &[u8]) -> Result<(), DisplayError> {
        self.ready()?;
        let n = self.size.pixel_count();
        if buffer.len() < n {
            return Err(DisplayError::Error);
        }
        let stride = self.size.width as usize;
        let invert = self.mode.is_inverted();

        for frame in frames {
            self.check_frame(*frame)?;
            let internal = &mut self.memory.bytes_mut()[HEADER_LEN + n..HEADER_LEN + 2 * n];
            for row in frame.y as usize..frame.bottom() as usize {
                let start = row * stride + frame.x as usize;
                let end = start + frame.width as usize;
                for (dst, src) in internal[start..end].iter_mut().zip(&buffer[start..end]) {
                    let level = src & 0x0F;
                    *dst = if invert { level ^ 0x0F } else { level };
                }
            }
        }
        Ok(())
    }

    fn refresh(&mut self, frame: Frame) -> Result<(), DisplayError> {
        self.ready()?;
        self.check_frame(frame)?;
        let n = self.size.pixel_count();
        let stride = self.size.width as usize;

        let planes = &mut self.memory.bytes_mut()[HEADER_LEN..HEADER_LEN + 2 * n];
        let (visible, internal) = planes.split_at_mut(n);
        for row in frame.y as usize..frame.bottom() as usize {
            let start = row * stride + frame.x as usize;
            let end = start + frame.width as usize;
            visible[start..end].copy_from_slice(&internal[start..end]);
        }
        self.bump_frame_count();
        Ok(())
    }
}

impl<M: SharedMemory> DisplayBackend for SimulatedDisplay<M> {
    fn size(&self) -> PanelSize {
        self.size
    }

    fn set_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn mode(&self) -> ColorMode {
        self.mode
    }

    async fn show_image_update(&mut self, frames: &[Frame], buffer: &[u8]) -> Result<(), DisplayError> {
        self.powered = true;
        self.update(frames, buffer)
    }

    async fn show_image_refresh(&mut self, frame: Frame, _mode: RefreshMode) -> Result<(), DisplayError> {
        self.powered = true;
        self.refresh(frame)
    }

    async fn show_image(
        &mut self,
        frames: &[Frame],
        refresh_frame: Frame,
        buffer: &[u8],
        mode: RefreshMode,
    ) -> Result<(), DisplayError> {
        self.powered = true;
        self.update(frames, buffer)?;
        if mode == RefreshMode::None {
            return Ok(());
        }
        self.refresh(refresh_frame)
    }

    async fn prepare_early_request(&mut self, _mode: RefreshMode, _temperature: WaveformTemperature) {
        self.powered = true;
    }

    async fn dither(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn power_on(&mut self) -> Result<(), DisplayError> {
        self.powered = true;
        Ok(())
    }

    async fn power_off(&mut self) -> Result<(), DisplayError> {
        self.powered = false;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.powered = false;
        self.initialized = false;
        Ok(())
    }

    async fn wipe_out(&mut self) -> Result<(), DisplayError> {
        self.ready()?;
        let n = self.size.pixel_count();
        self.memory.bytes_mut()[HEADER_LEN..HEADER_LEN + n].fill(WHITE);
        self.bump_frame_count();
        Ok(())
    }

    async fn reset_and_init(&mut self) -> Result<(), DisplayError> {
        self.set_header_field(1, self.size.width as u32);
        self.set_header_field(2, self.size.height as u32);
        self.powered = false;
        self.initialized = true;
        Ok(())
    }

    fn device(&self) -> Option<DeviceDescriptor> {
        None
    }
}
