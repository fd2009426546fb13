//! Driver configuration types
//!
//! Timing values are in milliseconds; accessors convert them to
//! `embassy_time::Duration`.

use embassy_time::Duration;
use papyrus_core::PanelSize;

/// Panel transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportConfig {
    /// Bus clock for writes
    pub write_hz: u32,
    /// Bus clock for reads
    pub read_hz: u32,
    /// Upper bound on a single DMA chunk
    pub chunk_timeout_ms: u32,
    /// Hold and settle time of the reset pulse
    pub reset_settle_ms: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            write_hz: 18_000_000,
            read_hz: 3_000_000,
            chunk_timeout_ms: 1000,
            reset_settle_ms: 10,
        }
    }
}

impl TransportConfig {
    pub fn chunk_timeout(&self) -> Duration {
        Duration::from_millis(self.chunk_timeout_ms as u64)
    }

    pub fn reset_settle(&self) -> Duration {
        Duration::from_millis(self.reset_settle_ms as u64)
    }
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Native resolution
    pub size: PanelSize,
    /// Upper bound on any wait for the busy line
    pub busy_timeout_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            size: PanelSize::ED028TC1,
            busy_timeout_ms: 2000,
        }
    }
}

impl PanelConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms as u64)
    }

    /// Scratch bytes needed for a full-panel 4 bpp update
    pub const fn scratch_len(&self) -> usize {
        2 + (self.size.width as usize).div_ceil(2) * self.size.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = TransportConfig::default();
        assert_eq!(t.write_hz, 18_000_000);
        assert_eq!(t.read_hz, 3_000_000);
        assert_eq!(t.chunk_timeout(), Duration::from_secs(1));

        let p = PanelConfig::default();
        assert_eq!(p.size, PanelSize::new(480, 600));
        assert_eq!(p.busy_timeout(), Duration::from_secs(2));
        assert_eq!(p.scratch_len(), 2 + 240 * 600);
    }
}
