//! Settings storage abstractions
//!
//! Provides the key/value settings store used to persist user choices
//! across restarts. Values are short strings.

use core::future::Future;

/// Maximum length of a stored setting value
pub const MAX_VALUE_LEN: usize = 32;

/// A setting value as stored
pub type SettingValue = heapless::String<MAX_VALUE_LEN>;

/// Keys for persisted settings
///
/// The actual storage implementation handles wear leveling and
/// data integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingKey {
    /// Last applied display colour mode ("0" standard, "1" inverted)
    DisplayInvertedMode = 0,
    /// Reserved for future use
    Reserved1 = 1,
}

impl SettingKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SettingKey::DisplayInvertedMode),
            1 => Some(SettingKey::Reserved1),
            _ => None,
        }
    }
}

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Value longer than [`MAX_VALUE_LEN`]
    ValueTooLong,
    /// Data corrupted or not valid UTF-8
    Corrupted,
}

/// Settings store trait
///
/// String get/set keyed by [`SettingKey`].
pub trait SettingsStore {
    /// Read a value by key
    fn get(&mut self, key: SettingKey) -> impl Future<Output = Result<SettingValue, SettingsError>>;

    /// Write a value by key
    fn set(&mut self, key: SettingKey, value: &str) -> impl Future<Output = Result<(), SettingsError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for SettingKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match SettingKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_round_trip() {
        for key in [SettingKey::DisplayInvertedMode, SettingKey::Reserved1] {
            assert_eq!(SettingKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(SettingKey::from_u8(200), None);
    }
}
