//! ED028TC1 controller commands
//!
//! Register values are vendor facts and are kept byte-for-byte.

use papyrus_core::{Frame, PanelSize};

pub const PANEL_SETTING: u8 = 0x00;
pub const POWER_SETTING: u8 = 0x01;
pub const POWER_OFF: u8 = 0x02;
pub const POWER_OFF_SEQUENCE: u8 = 0x03;
pub const POWER_ON: u8 = 0x04;
pub const DITHER: u8 = 0x05;
pub const BOOSTER_SOFT_START: u8 = 0x07;
pub const DATA_START_TRANSMISSION: u8 = 0x10;
pub const DISPLAY_REFRESH: u8 = 0x12;
pub const LUTC: u8 = 0x20;
pub const LUTD: u8 = 0x21;
pub const POWER_SAVING: u8 = 0x26;
pub const PLL_CONTROL: u8 = 0x30;
pub const TEMPERATURE_READ: u8 = 0x40;
pub const TEMPERATURE_SENSOR_SELECT: u8 = 0x41;
pub const VCOM_DATA_INTERVAL: u8 = 0x50;
pub const TCON_SETTING: u8 = 0x60;
pub const RESOLUTION_SETTING: u8 = 0x61;
pub const READ_FLAGS: u8 = 0x71;
pub const VCM_DC_SETTING: u8 = 0x82;
pub const DATA_WINDOW: u8 = 0x83;
pub const GATE_ORDER: u8 = 0xE0;

/// Refresh option: copy the new image to the previous-image buffer
pub const UPD_CPY_TO_PRE: u8 = 1 << 3;

/// Dither start, 4 bpp mode
pub const DITHER_START_4BPP: u8 = 0x01;

/// Flags register: dither in progress
pub const FLAG_DITHER_IN_PROGRESS: u16 = 0x0200;

/// Data transmission bpp field for 4 bpp frames
pub const BPP_4: u8 = 3;
/// Data transmission bpp field for 1 bpp planes
pub const BPP_1: u8 = 0;

/// Fill byte for a white 1 bpp plane
pub const WHITE_1BPP: u8 = 0xFF;

/// Register configuration applied after every reset
pub const INIT_SEQUENCE: &[&[u8]] = &[
    &[POWER_SETTING, 0x03, 0x04, 0x00, 0x00],
    // LUT_SEL | SHL | RST_N
    &[PANEL_SETTING, 0x25, 0x00],
    &[POWER_SAVING, 0x82],
    &[POWER_OFF_SEQUENCE, 0x01],
    &[BOOSTER_SOFT_START, 0x2F, 0x2F, 0x32],
    &[PLL_CONTROL, 0x0E],
    // Internal sensor, no offset, no forced value
    &[TEMPERATURE_SENSOR_SELECT, 0x00, 0x00],
    &[VCOM_DATA_INTERVAL, 0x01, 0x00],
    &[TCON_SETTING, 0x3F, 0x09, 0x2D],
    &[RESOLUTION_SETTING, 0x02, 0x60, 0x01, 0xE0],
    &[VCM_DC_SETTING, 0x30],
];

/// Gate refresh order
pub const GATE_ORDER_SEQUENCE: [u8; 3] = [GATE_ORDER, 0x02, 0x00];

/// Source/gate timing sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timings {
    FastRefresh,
    DeepClean,
}

impl Timings {
    pub const fn command(self) -> [u8; 4] {
        match self {
            Timings::FastRefresh => [TCON_SETTING, 0x10, 0x08, 0x08],
            Timings::DeepClean => [TCON_SETTING, 0x3F, 0x09, 0x50],
        }
    }
}

/// Window fields in the controller coordinate system
///
/// The controller origin is the bottom-right corner of the GUI frame.
fn panel_window(frame: Frame, size: PanelSize) -> [u8; 8] {
    let x = size.width - frame.x - frame.width;
    let y = size.height - frame.y - frame.height;
    let [x_hi, x_lo] = x.to_be_bytes();
    let [y_hi, y_lo] = y.to_be_bytes();
    let [w_hi, w_lo] = frame.width.to_be_bytes();
    let [h_hi, h_lo] = frame.height.to_be_bytes();
    [x_hi, x_lo, y_hi, y_lo, w_hi, w_lo, h_hi, h_lo]
}

/// Data window command for a frame; the frame must fit the panel
pub fn data_window(frame: Frame, size: PanelSize) -> [u8; 9] {
    let mut cmd = [0u8; 9];
    cmd[0] = DATA_WINDOW;
    cmd[1..].copy_from_slice(&panel_window(frame, size));
    cmd
}

/// Data window covering the whole panel
pub fn full_window(size: PanelSize) -> [u8; 9] {
    let [w_hi, w_lo] = size.width.to_be_bytes();
    let [h_hi, h_lo] = size.height.to_be_bytes();
    [DATA_WINDOW, 0, 0, 0, 0, w_hi, w_lo, h_hi, h_lo]
}

/// Refresh command for a frame; the frame must fit the panel
pub fn refresh(frame: Frame, size: PanelSize) -> [u8; 10] {
    let mut cmd = [0u8; 10];
    cmd[0] = DISPLAY_REFRESH;
    cmd[1] = UPD_CPY_TO_PRE;
    cmd[2..].copy_from_slice(&panel_window(frame, size));
    cmd
}
