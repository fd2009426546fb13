//! Messages exchanged with the display service
//!
//! Inbound requests arrive from the GUI and the system manager; outbound
//! notifications go back to the GUI.

use heapless::Vec;

use crate::frame::Frame;
use crate::mode::{ColorMode, RefreshMode};
use crate::state::PowerMode;

/// Maximum number of update frames in one image request
pub const MAX_FRAMES: usize = 8;

/// Request to draw a rendered image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest<'a> {
    /// Context id echoed back in the completion notification
    pub id: u32,
    /// Regions of `buffer` to write into panel memory
    pub frames: Vec<Frame, MAX_FRAMES>,
    /// Full-panel pixel buffer, one byte per pixel
    pub buffer: &'a [u8],
    pub mode: RefreshMode,
}

impl ImageRequest<'_> {
    /// Region refreshed after the update: the union of all frames
    pub fn refresh_frame(&self) -> Option<Frame> {
        Frame::bounding(&self.frames)
    }
}

/// Inbound service messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
    /// Change and persist the colour mode
    ColorModeChange(ColorMode),
    /// Draw an image
    Image(ImageRequest<'a>),
    /// The GUI is about to draw; pre-load the waveform
    PrepareEarly(RefreshMode),
    /// System power-mode notification
    PowerModeChanged(PowerMode),
    /// Device lock state changed
    LockChanged { locked: bool },
}

/// Outbound notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outbound {
    /// Colour mode change was applied
    ColorModeChanged(ColorMode),
    /// Image request finished (successfully or not)
    ImageDisplayed { id: u32 },
}
