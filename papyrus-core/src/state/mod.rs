//! Service lifecycle state machine
//!
//! The display service follows system power-mode notifications.
//! Transitions are explicit and deterministic; the service performs the
//! returned action against its backend.

pub mod events;
pub mod machine;

pub use events::PowerMode;
pub use machine::{PowerAction, ServiceState};
