//! Board-agnostic core logic for the e-ink display service
//!
//! This crate contains all logic that does not depend on a specific
//! panel or bus implementation:
//!
//! - Panel geometry (frames, panel size)
//! - Refresh and colour modes, status taxonomy
//! - The `DisplayBackend` trait implemented by panel drivers
//! - Service state machine driven by power-mode notifications
//! - Waveform temperature segment table
//! - Power-off debounce slot
//! - Messages exchanged with the display actor

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod mode;
pub mod state;
pub mod status;
pub mod timer;
pub mod traits;
pub mod waveform;

pub use frame::{Frame, PanelSize};
pub use messages::{ImageRequest, Message, Outbound, MAX_FRAMES};
pub use mode::{ColorMode, RefreshMode, WaveformTemperature};
pub use state::{PowerAction, PowerMode, ServiceState};
pub use status::{DisplayError, Status};
pub use timer::PowerOffTimer;
pub use traits::DisplayBackend;
