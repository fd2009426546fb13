//! Service state definition
//!
//! The service state is a function of the last power-mode notification.

use super::events::PowerMode;

/// Service lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceState {
    /// Accepting draw requests
    #[default]
    Running,
    /// Panel shut down; draw requests are ignored
    Suspended,
}

/// Backend action to perform after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerAction {
    /// Re-initialise the panel (reset and configure)
    ResetAndInit,
    /// Power the panel down and release the bus
    Shutdown,
}

impl ServiceState {
    /// Check if draw requests are processed in this state
    pub fn accepts_draw(&self) -> bool {
        matches!(self, ServiceState::Running)
    }

    /// Process a power-mode notification and return the new state with
    /// the action the service must perform.
    pub fn transition(self, mode: PowerMode) -> (ServiceState, PowerAction) {
        use PowerMode::*;
        use ServiceState::*;

        match (self, mode) {
            // Active recovers the panel whatever the previous state was
            (Running, Active) | (Suspended, Active) => (Running, PowerAction::ResetAndInit),
            (_, SuspendToRam) | (_, SuspendToNvm) => (Suspended, PowerAction::Shutdown),
        }
    }
}
