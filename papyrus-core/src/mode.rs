//! Refresh and colour modes

/// How a refresh drives the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    /// Write the buffer without any visible change
    None,
    /// Low-latency partial refresh, some ghosting
    Fast,
    /// Full-contrast refresh that removes ghosting
    Deep,
}

/// Colour interpretation of the pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    #[default]
    Standard,
    Inverted,
}

impl ColorMode {
    /// Value persisted in the settings store
    pub fn as_setting(self) -> &'static str {
        match self {
            ColorMode::Standard => "0",
            ColorMode::Inverted => "1",
        }
    }

    /// Parse a persisted value
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(ColorMode::Standard),
            "1" => Some(ColorMode::Inverted),
            _ => None,
        }
    }

    pub fn is_inverted(self) -> bool {
        self == ColorMode::Inverted
    }
}

/// Which ambient temperature a waveform choice uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveformTemperature {
    /// Measure the panel sensor now
    Measure,
    /// Reuse the temperature of the loaded waveform
    KeepCurrent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_setting_values() {
        assert_eq!(ColorMode::Standard.as_setting(), "0");
        assert_eq!(ColorMode::Inverted.as_setting(), "1");
        assert_eq!(ColorMode::from_setting("1"), Some(ColorMode::Inverted));
        assert_eq!(ColorMode::from_setting(" 0\n"), Some(ColorMode::Standard));
        assert_eq!(ColorMode::from_setting("true"), None);
        assert_eq!(ColorMode::from_setting(""), None);
    }
}
