//! Waveform table layout and selection
//!
//! The vendor waveform blob holds one LUT set per (bank, temperature
//! segment). Each set is a LUTD block followed by LUTC and LUTR blocks.
//! Temperature boundaries come straight from the panel vendor.

use crate::mode::RefreshMode;

/// LUTD block size in the blob
pub const LUTD_SIZE: usize = 16385;
/// LUTC block size in the blob
pub const LUTC_SIZE: usize = 64;
/// LUTR block size in the blob
pub const LUTR_SIZE: usize = 256;
/// Size of one LUT set
pub const LUT_SET_SIZE: u32 = (LUTD_SIZE + LUTC_SIZE + LUTR_SIZE) as u32;

/// Bytes per LUTD frame
pub const LUTD_FRAME_SIZE: usize = 64;

/// Temperature segments per bank
pub const SEGMENTS_PER_BANK: u32 = 14;

/// Temperature reported before the first measurement
pub const DEFAULT_TEMPERATURE: i32 = -1000;

/// Waveforms may be reused with a lenient temperature match this many times
pub const LENIENT_USE_LIMIT: u32 = 50;

const TEMP_MINIMAL: i32 = 0;
const TEMP_SUBCRITICAL: i32 = 38;
const TEMP_CRITICAL: i32 = 43;
const SEGMENT_INTERVAL: i32 = 3;
const SEGMENT_SUBCRITICAL: u32 = 12;
const SEGMENT_CRITICAL: u32 = 13;

/// Waveform banks in the blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Waveform {
    Init,
    A2,
    Du2,
    Gld16,
    Gc16,
}

impl Waveform {
    /// Bank index within the blob
    pub const fn bank(self) -> u32 {
        match self {
            Waveform::Init => 0,
            Waveform::A2 => 1,
            Waveform::Du2 => 2,
            Waveform::Gld16 => 3,
            Waveform::Gc16 => 4,
        }
    }

    /// Allowed temperature drift before a reload is forced
    pub const fn tolerance(self) -> i32 {
        match self {
            Waveform::A2 | Waveform::Du2 => 3,
            Waveform::Init | Waveform::Gld16 | Waveform::Gc16 => 2,
        }
    }

    /// Waveform used for a refresh mode
    pub const fn for_refresh(mode: RefreshMode) -> Self {
        match mode {
            RefreshMode::Deep => Waveform::Gc16,
            RefreshMode::Fast | RefreshMode::None => Waveform::Du2,
        }
    }
}

/// Map an ambient temperature (°C) to its LUT segment
pub fn temperature_segment(temperature: i32) -> u32 {
    if temperature >= TEMP_CRITICAL {
        return SEGMENT_CRITICAL;
    }
    if temperature >= TEMP_SUBCRITICAL {
        return SEGMENT_SUBCRITICAL;
    }
    (temperature.max(TEMP_MINIMAL) / SEGMENT_INTERVAL) as u32
}

/// Byte offset of a LUT set in the blob
pub fn lut_offset(waveform: Waveform, temperature: i32) -> u32 {
    LUT_SET_SIZE * (SEGMENTS_PER_BANK * waveform.bank() + temperature_segment(temperature))
}

/// Number of meaningful LUTD bytes given the frame-count byte
///
/// The count byte encodes frames minus one; the result includes the count
/// byte and the command byte.
pub fn lutd_length(frame_count_byte: u8) -> usize {
    (frame_count_byte as usize + 1) * LUTD_FRAME_SIZE + 2
}

/// Bookkeeping for the waveform currently loaded into the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformState {
    pub waveform: Waveform,
    pub temperature: i32,
    pub use_counter: u32,
    /// Offset of the LUT set in the panel, `None` until the first load
    pub loaded_offset: Option<u32>,
}

impl Default for WaveformState {
    fn default() -> Self {
        Self {
            waveform: Waveform::Gc16,
            temperature: DEFAULT_TEMPERATURE,
            use_counter: 0,
            loaded_offset: None,
        }
    }
}

impl WaveformState {
    /// Check if the requested waveform must be selected again
    pub fn needs_new_waveform(&self, waveform: Waveform, temperature: i32) -> bool {
        if self.loaded_offset.is_none() {
            return true;
        }
        let lenient = self.use_counter < LENIENT_USE_LIMIT;
        if lenient && waveform == self.waveform {
            let drift = (temperature - self.temperature).abs();
            if drift <= self.waveform.tolerance() {
                return false;
            }
        }
        true
    }

    /// Record a new selection and return the offset to load, or `None`
    /// when the panel already holds that LUT set.
    pub fn select(&mut self, waveform: Waveform, temperature: i32) -> Option<u32> {
        self.waveform = waveform;
        self.temperature = temperature;
        self.use_counter = 0;
        let offset = lut_offset(waveform, temperature);
        if self.loaded_offset == Some(offset) {
            return None;
        }
        Some(offset)
    }

    /// Mark the LUT set at `offset` as loaded into the panel
    pub fn mark_loaded(&mut self, offset: u32) {
        self.loaded_offset = Some(offset);
    }

    /// Forget the loaded set (panel was reset)
    pub fn invalidate(&mut self) {
        self.loaded_offset = None;
    }

    /// Count a refresh using the current waveform
    pub fn record_use(&mut self) {
        self.use_counter = self.use_counter.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_segments() {
        assert_eq!(temperature_segment(-20), 0);
        assert_eq!(temperature_segment(DEFAULT_TEMPERATURE), 0);
        assert_eq!(temperature_segment(0), 0);
        assert_eq!(temperature_segment(2), 0);
        assert_eq!(temperature_segment(3), 1);
        assert_eq!(temperature_segment(25), 8);
        assert_eq!(temperature_segment(37), 12);
        assert_eq!(temperature_segment(38), 12);
        assert_eq!(temperature_segment(42), 12);
        assert_eq!(temperature_segment(43), 13);
        assert_eq!(temperature_segment(80), 13);
    }

    #[test]
    fn test_lut_offsets() {
        assert_eq!(LUT_SET_SIZE, 16705);
        assert_eq!(lut_offset(Waveform::Init, 0), 0);
        assert_eq!(lut_offset(Waveform::A2, 0), 16705 * 14);
        assert_eq!(lut_offset(Waveform::Gc16, 25), 16705 * (14 * 4 + 8));
        assert_eq!(lut_offset(Waveform::Du2, 50), 16705 * (14 * 2 + 13));
    }

    #[test]
    fn test_lutd_length() {
        assert_eq!(lutd_length(0x00), 66);
        assert_eq!(lutd_length(0x0F), 16 * 64 + 2);
    }

    #[test]
    fn test_first_selection_always_loads() {
        let mut state = WaveformState::default();
        assert!(state.needs_new_waveform(Waveform::Init, DEFAULT_TEMPERATURE));
        // Offset 0 matches the default bookkeeping but nothing is loaded yet
        assert_eq!(state.select(Waveform::Init, DEFAULT_TEMPERATURE), Some(0));
    }

    #[test]
    fn test_lenient_reuse() {
        let mut state = WaveformState::default();
        let offset = state.select(Waveform::Du2, 20).unwrap();
        state.mark_loaded(offset);

        assert!(!state.needs_new_waveform(Waveform::Du2, 23));
        assert!(!state.needs_new_waveform(Waveform::Du2, 17));
        assert!(state.needs_new_waveform(Waveform::Du2, 24));
        assert!(state.needs_new_waveform(Waveform::Gc16, 20));

        for _ in 0..LENIENT_USE_LIMIT {
            state.record_use();
        }
        assert!(state.needs_new_waveform(Waveform::Du2, 20));
    }

    #[test]
    fn test_gc16_tolerance() {
        let mut state = WaveformState::default();
        let offset = state.select(Waveform::Gc16, 20).unwrap();
        state.mark_loaded(offset);
        assert!(!state.needs_new_waveform(Waveform::Gc16, 22));
        assert!(state.needs_new_waveform(Waveform::Gc16, 23));
    }

    #[test]
    fn test_same_offset_skips_load() {
        let mut state = WaveformState::default();
        let offset = state.select(Waveform::Du2, 20).unwrap();
        state.mark_loaded(offset);
        for _ in 0..LENIENT_USE_LIMIT {
            state.record_use();
        }
        // Same segment (18..=20): counter resets, no reload
        assert_eq!(state.select(Waveform::Du2, 19), None);
        assert_eq!(state.use_counter, 0);

        state.invalidate();
        assert_eq!(state.select(Waveform::Du2, 19), Some(offset));
    }
}
