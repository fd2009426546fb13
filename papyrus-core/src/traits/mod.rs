//! Hardware abstraction traits
//!
//! These traits define the interface between the display service and the
//! panel-specific implementations.

pub mod display;

pub use display::DisplayBackend;
