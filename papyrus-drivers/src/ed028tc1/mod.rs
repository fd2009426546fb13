//! ED028TC1 e-paper panel (480x600, 4 bpp)

pub mod commands;
pub mod pack;
mod panel;

pub use panel::{Ed028tc1, DEVICE_NAME};
