//! Defines shared data structures for the Bluetooth module.

use serde::Serialize;

use crate::core::bluetooth::constants::UNKNOWN_DEVICE_NAME;

/// Represents one BLE peripheral seen during a scan session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    /// Hardware address, unique within a session. Used as the deduplication key.
    pub address: String,
    /// The advertised name of the device, if available
    pub name: Option<String>,
    /// The signal strength (RSSI) at discovery time
    pub rssi: Option<i16>,
}

impl DiscoveredDevice {
    /// Creates a new DiscoveredDevice instance
    pub fn new(address: impl Into<String>, name: Option<String>, rssi: Option<i16>) -> Self {
        Self {
            address: address.into(),
            name,
            rssi,
        }
    }

    /// Name to show in a device list. Missing and empty names fall back to a placeholder.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_DEVICE_NAME,
        }
    }
}

/// The identifying fields handed to the device detail view on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSelection {
    pub address: String,
    pub name: Option<String>,
}

impl From<&DiscoveredDevice> for DeviceSelection {
    fn from(device: &DiscoveredDevice) -> Self {
        Self {
            address: device.address.clone(),
            name: device.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let named = DiscoveredDevice::new("AA:BB:CC:DD:EE:01", Some("Thermo".to_string()), None);
        assert_eq!(named.display_name(), "Thermo");

        let unnamed = DiscoveredDevice::new("AA:BB:CC:DD:EE:02", None, Some(-60));
        assert_eq!(unnamed.display_name(), UNKNOWN_DEVICE_NAME);

        let empty = DiscoveredDevice::new("AA:BB:CC:DD:EE:03", Some(String::new()), None);
        assert_eq!(empty.display_name(), UNKNOWN_DEVICE_NAME);
    }

    #[test]
    fn test_selection_carries_address_and_name() {
        let device = DiscoveredDevice::new("AA:BB:CC:DD:EE:01", Some("Thermo".to_string()), Some(-40));
        let selection = DeviceSelection::from(&device);
        assert_eq!(selection.address, "AA:BB:CC:DD:EE:01");
        assert_eq!(selection.name.as_deref(), Some("Thermo"));
    }
}
