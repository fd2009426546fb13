//! Status taxonomy
//!
//! Operations return `Result<(), DisplayError>`; [`Status`] is the flat
//! report form used for logging and diagnostics.

use papyrus_hal::{SpiError, WaveformError};

/// Display operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Generic failure (invalid request, panel refused)
    Error,
    /// Serial bus fault
    BusError,
    /// Bus used before initialisation or after release
    BusNotInitialized,
    /// DMA engine fault
    DmaError,
    /// Resource binding failed during initialisation
    InitError,
    /// Transfer or busy wait exceeded its bound
    Timeout,
    /// Scratch memory too small for the request
    OutOfMemory,
    /// Waveform table could not be read
    WaveformLoadFailure,
    /// Anything else
    Unknown,
}

/// Result of a display operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    Error,
    BusError,
    BusNotInitialized,
    DmaError,
    InitError,
    Timeout,
    OutOfMemory,
    WaveformLoadFailure,
    Unknown,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl From<DisplayError> for Status {
    fn from(e: DisplayError) -> Self {
        match e {
            DisplayError::Error => Status::Error,
            DisplayError::BusError => Status::BusError,
            DisplayError::BusNotInitialized => Status::BusNotInitialized,
            DisplayError::DmaError => Status::DmaError,
            DisplayError::InitError => Status::InitError,
            DisplayError::Timeout => Status::Timeout,
            DisplayError::OutOfMemory => Status::OutOfMemory,
            DisplayError::WaveformLoadFailure => Status::WaveformLoadFailure,
            DisplayError::Unknown => Status::Unknown,
        }
    }
}

impl From<Result<(), DisplayError>> for Status {
    fn from(result: Result<(), DisplayError>) -> Self {
        match result {
            Ok(()) => Status::Ok,
            Err(e) => e.into(),
        }
    }
}

impl From<SpiError> for DisplayError {
    fn from(e: SpiError) -> Self {
        match e {
            SpiError::Bus => DisplayError::BusError,
            SpiError::Dma => DisplayError::DmaError,
            SpiError::NotConfigured => DisplayError::BusNotInitialized,
        }
    }
}

impl From<WaveformError> for DisplayError {
    fn from(_: WaveformError) -> Self {
        DisplayError::WaveformLoadFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_to_status() {
        assert_eq!(Status::from(Ok(())), Status::Ok);
        assert_eq!(Status::from(Err(DisplayError::Timeout)), Status::Timeout);
        assert!(!Status::from(Err(DisplayError::Unknown)).is_ok());
    }

    #[test]
    fn test_bus_errors_map() {
        assert_eq!(DisplayError::from(SpiError::Bus), DisplayError::BusError);
        assert_eq!(DisplayError::from(SpiError::Dma), DisplayError::DmaError);
        assert_eq!(
            DisplayError::from(SpiError::NotConfigured),
            DisplayError::BusNotInitialized
        );
        assert_eq!(
            DisplayError::from(WaveformError::OutOfRange),
            DisplayError::WaveformLoadFailure
        );
    }
}
