//! Waveform table storage
//!
//! The panel vendor ships its waveform lookup tables as one binary blob.
//! The panel driver reads slices of it at computed offsets.

use core::future::Future;

/// Errors from waveform storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveformError {
    /// Requested range lies outside the blob
    OutOfRange,
    /// Underlying storage failed
    Storage,
}

/// Random-access reader over the waveform blob
pub trait WaveformSource {
    /// Fill `buf` with bytes starting at `offset`
    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> impl Future<Output = Result<(), WaveformError>>;
}

/// In-memory waveform blob
impl WaveformSource for &[u8] {
    async fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), WaveformError> {
        let start = offset as usize;
        let end = start.checked_add(buf.len()).ok_or(WaveformError::OutOfRange)?;
        let data = self.get(start..end).ok_or(WaveformError::OutOfRange)?;
        buf.copy_from_slice(data);
        Ok(())
    }
}
