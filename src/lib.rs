//! BLE scan tool library
//! Scans for nearby Bluetooth LE devices in bounded sessions and hands the selected
//! device off to a detail view.

// Module declarations
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod state;
pub mod utils;

pub use error::{AdvertiseFailure, ScanError};
