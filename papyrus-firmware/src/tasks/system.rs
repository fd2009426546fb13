//! Power manager task
//!
//! Keeps the device and sentinel bookkeeping and the effective CPU
//! frequency floor (the highest level any sentinel holds).

use defmt::*;
use heapless::Vec;

use papyrus_hal::{CpuFrequency, SentinelId};

use crate::channels::{SystemRequest, SYSTEM_CHANNEL};

/// Maximum number of registered sentinels
const MAX_SENTINELS: usize = 4;

/// Power manager task
#[embassy_executor::task]
pub async fn system_task() {
    info!("System task started");

    let mut floors: Vec<(SentinelId, Option<CpuFrequency>), MAX_SENTINELS> = Vec::new();

    loop {
        match SYSTEM_CHANNEL.receive().await {
            SystemRequest::RegisterDevice(device) => {
                info!("Device registered: {}", device.name);
            }
            SystemRequest::RegisterSentinel(sentinel) => {
                if floors.iter().all(|(id, _)| *id != sentinel) && floors.push((sentinel, None)).is_err() {
                    warn!("Too many sentinels, ignoring {}", sentinel.0);
                }
            }
            SystemRequest::FrequencyFloor(sentinel, level) => {
                set_floor(&mut floors, sentinel, Some(level));
            }
            SystemRequest::ReleaseFloor(sentinel) => {
                set_floor(&mut floors, sentinel, None);
            }
        }
    }
}

fn set_floor(
    floors: &mut Vec<(SentinelId, Option<CpuFrequency>), MAX_SENTINELS>,
    sentinel: SentinelId,
    level: Option<CpuFrequency>,
) {
    match floors.iter_mut().find(|(id, _)| *id == sentinel) {
        Some(entry) => entry.1 = level,
        None => {
            warn!("Unregistered sentinel {}", sentinel.0);
            return;
        }
    }
    let effective = floors.iter().filter_map(|(_, level)| *level).max();
    debug!("CPU frequency floor: {:?}", effective);
}
