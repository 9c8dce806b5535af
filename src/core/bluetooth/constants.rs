//! Constants used throughout the application
//! This module contains the constant values used by scanning and advertising,
//! such as timeouts, payload limits and AD structure types.

use std::time::Duration;

use uuid::Uuid;

/// Stops scanning after 10 seconds.
pub const SCAN_PERIOD: Duration = Duration::from_secs(10);

/// Placeholder shown for devices that do not advertise a name
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown device";

/// Maximum size of a legacy advertising payload in bytes
pub const MAX_ADVERTISE_PAYLOAD_LEN: usize = 31;

/// Default advertising timeout in milliseconds
pub const DEFAULT_ADVERTISE_TIMEOUT_MS: u32 = 20_000;

/// Upper bound the platform accepts for an advertising timeout in milliseconds
pub const MAX_ADVERTISE_TIMEOUT_MS: u32 = 180_000;

/// The Bluetooth base UUID. UUIDs that only differ in bits 96..112 have a 16-bit short form.
pub const BLUETOOTH_BASE_UUID: Uuid = Uuid::from_u128(0x00000000_0000_1000_8000_00805f9b34fb);

/// AD structure types (Bluetooth Core Specification Supplement, Part A)
pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_COMPLETE_16_BIT_SERVICE_UUIDS: u8 = 0x03;
pub const AD_TYPE_COMPLETE_128_BIT_SERVICE_UUIDS: u8 = 0x07;
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
pub const AD_TYPE_TX_POWER_LEVEL: u8 = 0x0a;
pub const AD_TYPE_SERVICE_DATA_16_BIT: u8 = 0x16;
pub const AD_TYPE_SERVICE_DATA_128_BIT: u8 = 0x21;
pub const AD_TYPE_MANUFACTURER_SPECIFIC_DATA: u8 = 0xff;

/// LE General Discoverable Mode | BR/EDR Not Supported
pub const AD_FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;
