//! Flash storage for RP2040
//!
//! One flash peripheral holds two partitions: the vendor waveform blob and
//! a sequential-storage key/value map for settings in the last 64KB. Both
//! users share the peripheral through a mutex.

use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_storage_async::nor_flash::ReadNorFlash;
use papyrus_hal::settings::MAX_VALUE_LEN;
use papyrus_hal::{SettingKey, SettingValue, SettingsError, SettingsStore, WaveformError, WaveformSource};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Waveform blob partition, directly below the settings
pub const WAVEFORM_PARTITION_START: usize = 0x000C_0000;
pub const WAVEFORM_PARTITION_SIZE: usize = SETTINGS_PARTITION_START - WAVEFORM_PARTITION_START;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Shared flash peripheral
pub type FlashMutex<'d> = Mutex<CriticalSectionRawMutex, Flash<'d, FLASH, Async, FLASH_SIZE>>;

/// Settings store in the settings partition
pub struct FlashSettings<'a, 'd> {
    flash: &'a FlashMutex<'d>,
}

impl<'a, 'd> FlashSettings<'a, 'd> {
    pub fn new(flash: &'a FlashMutex<'d>) -> Self {
        Self { flash }
    }
}

impl SettingsStore for FlashSettings<'_, '_> {
    async fn get(&mut self, key: SettingKey) -> Result<SettingValue, SettingsError> {
        let mut data_buffer = [0u8; 128];
        let mut flash = self.flash.lock().await;

        let data = match map::fetch_item::<SettingKey, &[u8], _>(
            &mut *flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await
        {
            Ok(Some(data)) => data,
            Ok(None) => return Err(SettingsError::NotFound),
            Err(_) => return Err(SettingsError::Storage),
        };

        if data.len() > MAX_VALUE_LEN {
            return Err(SettingsError::Corrupted);
        }
        let text = core::str::from_utf8(data).map_err(|_| SettingsError::Corrupted)?;
        let mut value = SettingValue::new();
        value.push_str(text).map_err(|_| SettingsError::Corrupted)?;
        Ok(value)
    }

    async fn set(&mut self, key: SettingKey, value: &str) -> Result<(), SettingsError> {
        if value.len() > MAX_VALUE_LEN {
            return Err(SettingsError::ValueTooLong);
        }
        let mut data_buffer = [0u8; 128];
        let mut flash = self.flash.lock().await;
        let data = value.as_bytes();

        map::store_item(
            &mut *flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| SettingsError::Storage)
    }
}

/// Waveform blob in the waveform partition
pub struct FlashWaveforms<'a, 'd> {
    flash: &'a FlashMutex<'d>,
}

impl<'a, 'd> FlashWaveforms<'a, 'd> {
    pub fn new(flash: &'a FlashMutex<'d>) -> Self {
        Self { flash }
    }
}

impl WaveformSource for FlashWaveforms<'_, '_> {
    async fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), WaveformError> {
        let end = (offset as usize)
            .checked_add(buf.len())
            .ok_or(WaveformError::OutOfRange)?;
        if end > WAVEFORM_PARTITION_SIZE {
            return Err(WaveformError::OutOfRange);
        }

        let mut flash = self.flash.lock().await;
        flash
            .read(WAVEFORM_PARTITION_START as u32 + offset, buf)
            .await
            .map_err(|_| WaveformError::Storage)
    }
}
