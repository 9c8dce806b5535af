//! Bluetooth functionality for the scan tool
//! This module handles all bluetooth operations including scanning,
//! session bookkeeping and advertising.

mod advertise;
mod constants;
mod controller;
mod manager;
mod scanner;
mod session;
mod timer;
mod types;

// Re-export types that should be publicly accessible
pub use advertise::{
    AdvertiseData, AdvertiseMode, AdvertiseSettings, AdvertiseSettingsInEffect, Advertiser,
    TxPowerLevel, UnsupportedAdvertiser,
};
pub use constants::*; // Re-export all constants
pub use controller::{DiscoverySink, ScanController, ScanControllerHandle};
pub use manager::BluetoothManager;
pub use scanner::{BluetoothScanner, ScanDriver};
pub use session::ScanSession;
pub use timer::DeadlineTimer;
pub use types::{DeviceSelection, DiscoveredDevice};
