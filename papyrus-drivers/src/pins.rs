//! Adapters from `embedded-hal` GPIO to the panel pin traits
//!
//! Any HAL output implementing `embedded_hal::digital::OutputPin` works as
//! chip select or reset; any input implementing
//! `embedded_hal_async::digital::Wait` works as the busy line.

use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use papyrus_hal::{BusyError, BusyPin, OutputPin};

/// Output pin backed by an `embedded-hal` output
pub struct HalOutput<P> {
    pin: P,
    high: bool,
}

impl<P: embedded_hal::digital::OutputPin> HalOutput<P> {
    /// Wrap `pin`, which must currently be driven at `initial_high`
    pub fn new(pin: P, initial_high: bool) -> Self {
        Self {
            pin,
            high: initial_high,
        }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: embedded_hal::digital::OutputPin> OutputPin for HalOutput<P> {
    fn set_high(&mut self) {
        // GPIO writes are infallible on every supported chip
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Busy line driven low by the panel while it is busy
pub struct ActiveLowBusy<P> {
    pin: P,
}

impl<P: InputPin + Wait> ActiveLowBusy<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin + Wait> BusyPin for ActiveLowBusy<P> {
    fn is_busy(&mut self) -> bool {
        self.pin.is_low().unwrap_or(true)
    }

    async fn wait_for_ready(&mut self) -> Result<(), BusyError> {
        self.pin.wait_for_high().await.map_err(|_| BusyError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal::digital::{ErrorType, PinState};

    struct FakePin {
        state: PinState,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl embedded_hal::digital::OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.state = PinState::Low;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.state = PinState::High;
            Ok(())
        }
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.state == PinState::High)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.state == PinState::Low)
        }
    }

    impl Wait for FakePin {
        async fn wait_for_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn test_output_tracks_level() {
        let mut out = HalOutput::new(FakePin { state: PinState::High }, true);
        assert!(out.is_set_high());
        out.set_low();
        assert!(out.is_set_low());
        assert_eq!(out.into_inner().state, PinState::Low);
    }

    #[test]
    fn test_busy_is_active_low() {
        let mut busy = ActiveLowBusy::new(FakePin { state: PinState::Low });
        assert!(busy.is_busy());
        busy.pin.state = PinState::High;
        assert!(!busy.is_busy());
        assert_eq!(block_on(busy.wait_for_ready()), Ok(()));
    }

    /// Input whose interrupt wait always fails
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = embedded_hal::digital::ErrorKind;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }

    impl Wait for BrokenPin {
        async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
            Err(embedded_hal::digital::ErrorKind::Other)
        }
    }

    #[test]
    fn test_busy_pin_fault_is_not_ready() {
        let mut busy = ActiveLowBusy::new(BrokenPin);
        assert!(busy.is_busy());
        assert_eq!(block_on(busy.wait_for_ready()), Err(BusyError));
    }
}
