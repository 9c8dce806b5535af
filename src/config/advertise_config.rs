use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::bluetooth::{
    AdvertiseData, AdvertiseMode, AdvertiseSettings, DEFAULT_ADVERTISE_TIMEOUT_MS, TxPowerLevel,
};

/// Peripheral advertising settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvertiseConfig {
    /// Advertise once at startup
    pub enabled: bool,
    pub connectable: bool,
    /// 0 advertises until stopped
    pub timeout_ms: u32,
    pub mode: AdvertiseMode,
    pub tx_power: TxPowerLevel,
    /// Local name put in the payload when `include_device_name` is set
    pub device_name: Option<String>,
    pub include_device_name: bool,
    pub include_tx_power_level: bool,
    pub service_uuids: Vec<Uuid>,
}

impl Default for AdvertiseConfig {
    fn default() -> Self {
        AdvertiseConfig {
            enabled: true,
            connectable: true,
            timeout_ms: DEFAULT_ADVERTISE_TIMEOUT_MS,
            mode: AdvertiseMode::Balanced,
            tx_power: TxPowerLevel::High,
            device_name: Some("ble-scan".to_string()),
            include_device_name: true,
            include_tx_power_level: false,
            service_uuids: Vec::new(),
        }
    }
}

impl AdvertiseConfig {
    pub fn settings(&self) -> AdvertiseSettings {
        AdvertiseSettings {
            mode: self.mode,
            tx_power: self.tx_power,
            ..AdvertiseSettings::new(self.connectable, self.timeout_ms)
        }
    }

    pub fn data(&self) -> AdvertiseData {
        AdvertiseData {
            include_device_name: self.include_device_name,
            include_tx_power_level: self.include_tx_power_level,
            service_uuids: self.service_uuids.clone(),
            ..Default::default()
        }
    }
}
