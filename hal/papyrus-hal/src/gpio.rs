//! GPIO pin abstractions
//!
//! Provides traits for the panel control lines: chip select and reset are
//! plain outputs, busy is an interrupt-capable input.

use core::future::Future;

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// The busy line could not be sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusyError;

/// Panel busy line
///
/// The panel holds this line asserted while it cannot accept commands.
/// The ready edge is delivered by a pin interrupt whose handler only wakes
/// the waiting task.
pub trait BusyPin {
    /// Check if the panel currently reports busy
    fn is_busy(&mut self) -> bool;

    /// Wait for the panel to report ready
    ///
    /// Resolves immediately if the panel is already idle. Never times out
    /// on its own; callers bound it. A pin fault is not a ready panel.
    fn wait_for_ready(&mut self) -> impl Future<Output = Result<(), BusyError>>;
}
