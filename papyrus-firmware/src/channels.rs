//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use papyrus_core::{Message, Outbound};
use papyrus_hal::{CpuFrequency, DeviceDescriptor, SentinelId};

/// Channel capacity for display requests
const EINK_INBOX_SIZE: usize = 8;

/// Channel capacity for display notifications
const GUI_OUTBOX_SIZE: usize = 8;

/// Channel capacity for power manager requests
const SYSTEM_CHANNEL_SIZE: usize = 8;

/// Requests for the display service (GUI draws, system power modes)
pub static EINK_INBOX: Channel<CriticalSectionRawMutex, Message<'static>, EINK_INBOX_SIZE> =
    Channel::new();

/// Replies from the display service to the GUI
pub static GUI_OUTBOX: Channel<CriticalSectionRawMutex, Outbound, GUI_OUTBOX_SIZE> =
    Channel::new();

/// Notifications for the power manager
pub static SYSTEM_CHANNEL: Channel<CriticalSectionRawMutex, SystemRequest, SYSTEM_CHANNEL_SIZE> =
    Channel::new();

/// Power manager notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemRequest {
    RegisterDevice(DeviceDescriptor),
    RegisterSentinel(SentinelId),
    FrequencyFloor(SentinelId, CpuFrequency),
    ReleaseFloor(SentinelId),
}
