//! Scan session state
//! The session is a plain owned value: the controller task is its only mutator.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;

use crate::core::bluetooth::types::{DeviceSelection, DiscoveredDevice};

/// One bounded discovery interval and the devices it has seen so far.
#[derive(Debug, Default)]
pub struct ScanSession {
    active: bool,
    /// Discovered devices in first-seen order
    devices: Vec<DiscoveredDevice>,
    /// Addresses already present in `devices`
    seen: HashSet<String>,
    deadline: Option<Instant>,
    /// Bumped on every `begin`, so stale events from earlier sessions can be recognised.
    generation: u64,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session, dropping the results of any previous one.
    /// Returns the generation that identifies the new session.
    pub fn begin(&mut self, now: Instant, period: Duration) -> u64 {
        self.devices.clear();
        self.seen.clear();
        self.active = true;
        self.deadline = Some(now + period);
        self.generation += 1;
        self.generation
    }

    /// Ends the session. Returns false when it was already idle.
    pub fn end(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.deadline = None;
        was_active
    }

    /// Appends a device unless its address was already seen. Repeat sightings keep the first-seen data.
    pub fn record(&mut self, device: DiscoveredDevice) -> bool {
        if !self.active || self.seen.contains(&device.address) {
            return false;
        }
        self.seen.insert(device.address.clone());
        self.devices.push(device);
        true
    }

    /// Drops the accumulated devices without touching the active flag.
    pub fn clear(&mut self) {
        self.devices.clear();
        self.seen.clear();
    }

    pub fn selection(&self, index: usize) -> Option<DeviceSelection> {
        self.devices.get(index).map(DeviceSelection::from)
    }

    /// True when `generation` names the session that is currently scanning.
    pub fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn devices(&self) -> &[DiscoveredDevice] {
        &self.devices
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
