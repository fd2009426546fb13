//! CPU frequency floor for redraw work
//!
//! A refresh that runs at a low clock tears visibly, so the display service
//! asks the power manager for a minimum frequency while it draws. The claim
//! is a single flag: holding twice is the same as holding once, and every
//! hold is undone by one release.

use papyrus_hal::{CpuFrequency, DeviceDescriptor, PowerAuthority, SentinelId};

/// Name the display sentinel registers under
pub const SENTINEL_ID: SentinelId = SentinelId("EinkSentinel");

/// When a held claim reaches the power manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentinelPolicy {
    /// Forward every hold
    #[default]
    Always,
    /// Forward holds only while the device is unlocked
    WhileUnlocked,
}

/// Frequency floor claim over a power authority
pub struct FrequencySentinel<A> {
    authority: A,
    policy: SentinelPolicy,
    floor: CpuFrequency,
    held: bool,
    locked: bool,
    /// Whether the authority currently has our request
    forwarded: bool,
}

impl<A: PowerAuthority> FrequencySentinel<A> {
    pub fn new(authority: A, policy: SentinelPolicy, floor: CpuFrequency) -> Self {
        Self {
            authority,
            policy,
            floor,
            held: false,
            locked: false,
            forwarded: false,
        }
    }

    /// Register the sentinel, and the display device if there is one
    pub fn register(&mut self, device: Option<DeviceDescriptor>) {
        if let Some(device) = device {
            self.authority.register_device(device);
        }
        self.authority.register_sentinel(SENTINEL_ID);
    }

    /// Claim the frequency floor; no-op while already held
    pub fn hold_minimum_frequency(&mut self) {
        if self.held {
            return;
        }
        self.held = true;
        self.sync();
    }

    /// Drop the claim; no-op when not held
    pub fn release_minimum_frequency(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        self.sync();
    }

    /// Device lock state changed
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        self.sync();
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn policy(&self) -> SentinelPolicy {
        self.policy
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn into_inner(self) -> A {
        self.authority
    }

    fn wanted(&self) -> bool {
        match self.policy {
            SentinelPolicy::Always => self.held,
            SentinelPolicy::WhileUnlocked => self.held && !self.locked,
        }
    }

    fn sync(&mut self) {
        let wanted = self.wanted();
        if wanted == self.forwarded {
            return;
        }
        if wanted {
            trace!("frequency floor requested");
            self.authority.request_frequency_floor(SENTINEL_ID, self.floor);
        } else {
            trace!("frequency floor released");
            self.authority.release_frequency_floor(SENTINEL_ID);
        }
        self.forwarded = wanted;
    }
}
