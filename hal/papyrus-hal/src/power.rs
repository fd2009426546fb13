//! System power manager collaborator
//!
//! The system-wide power authority tracks registered devices and decides
//! the CPU clock. Components that need a minimum clock register a sentinel
//! and request a frequency floor through it.

/// Identity of a device registered with the power manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceDescriptor {
    /// Device name used for bookkeeping
    pub name: &'static str,
}

/// Name of a frequency sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SentinelId(pub &'static str);

/// Named CPU frequency levels understood by the power manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CpuFrequency {
    Level0,
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
}

/// System power manager interface
///
/// Calls are fire-and-forget notifications; the authority applies them
/// in its own context.
pub trait PowerAuthority {
    /// Register a device for power bookkeeping
    fn register_device(&mut self, device: DeviceDescriptor);

    /// Register a frequency sentinel
    fn register_sentinel(&mut self, sentinel: SentinelId);

    /// Ask the authority to keep the CPU at or above `level`
    fn request_frequency_floor(&mut self, sentinel: SentinelId, level: CpuFrequency);

    /// Withdraw a previous floor request
    fn release_frequency_floor(&mut self, sentinel: SentinelId);
}
