//! Events that trigger service state transitions

/// System power-mode notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Normal operation
    Active,
    /// Suspend keeping RAM contents
    SuspendToRam,
    /// Suspend to non-volatile memory
    SuspendToNvm,
}

impl PowerMode {
    /// Check if this mode suspends the system
    pub fn is_suspend(&self) -> bool {
        matches!(self, PowerMode::SuspendToRam | PowerMode::SuspendToNvm)
    }
}
