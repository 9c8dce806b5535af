//! Peripheral advertising
//! Builds legacy advertising payloads and hands them to a platform advertiser.

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::bluetooth::constants::{
    AD_FLAGS_GENERAL_DISCOVERABLE, AD_TYPE_COMPLETE_16_BIT_SERVICE_UUIDS,
    AD_TYPE_COMPLETE_128_BIT_SERVICE_UUIDS, AD_TYPE_COMPLETE_LOCAL_NAME, AD_TYPE_FLAGS,
    AD_TYPE_MANUFACTURER_SPECIFIC_DATA, AD_TYPE_SERVICE_DATA_16_BIT, AD_TYPE_SERVICE_DATA_128_BIT,
    AD_TYPE_TX_POWER_LEVEL, BLUETOOTH_BASE_UUID, MAX_ADVERTISE_PAYLOAD_LEN,
    MAX_ADVERTISE_TIMEOUT_MS,
};
use crate::error::AdvertiseFailure;

/// Advertising interval trade-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvertiseMode {
    LowPower,
    Balanced,
    LowLatency,
}

/// Transmit power level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxPowerLevel {
    UltraLow,
    Low,
    Medium,
    High,
}

impl TxPowerLevel {
    /// Approximate radiated power in dBm, as advertised in the TX power AD structure.
    pub fn dbm(&self) -> i8 {
        match self {
            Self::UltraLow => -21,
            Self::Low => -15,
            Self::Medium => -7,
            Self::High => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertiseSettings {
    pub mode: AdvertiseMode,
    pub tx_power: TxPowerLevel,
    pub connectable: bool,
    /// 0 disables the timeout
    pub timeout_ms: u32,
}

impl AdvertiseSettings {
    pub fn new(connectable: bool, timeout_ms: u32) -> Self {
        Self {
            mode: AdvertiseMode::Balanced,
            tx_power: TxPowerLevel::High,
            connectable,
            timeout_ms: timeout_ms.min(MAX_ADVERTISE_TIMEOUT_MS),
        }
    }
}

/// The settings the platform actually applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertiseSettingsInEffect {
    pub mode: AdvertiseMode,
    pub tx_power: TxPowerLevel,
    pub connectable: bool,
    pub timeout_ms: u32,
}

impl From<&AdvertiseSettings> for AdvertiseSettingsInEffect {
    fn from(settings: &AdvertiseSettings) -> Self {
        Self {
            mode: settings.mode,
            tx_power: settings.tx_power,
            connectable: settings.connectable,
            timeout_ms: settings.timeout_ms,
        }
    }
}

/// Content of the advertising packet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvertiseData {
    pub include_device_name: bool,
    pub include_tx_power_level: bool,
    pub service_uuids: Vec<Uuid>,
    /// Company identifier and payload
    pub manufacturer_data: Option<(u16, Vec<u8>)>,
    pub service_data: Option<(Uuid, Vec<u8>)>,
}

impl AdvertiseData {
    /// Encodes the payload as a sequence of length/type/value AD structures.
    pub fn encode(
        &self,
        settings: &AdvertiseSettings,
        device_name: Option<&str>,
    ) -> Result<Vec<u8>, AdvertiseFailure> {
        let mut payload = Vec::with_capacity(MAX_ADVERTISE_PAYLOAD_LEN);

        if settings.connectable {
            push_ad_structure(&mut payload, AD_TYPE_FLAGS, &[AD_FLAGS_GENERAL_DISCOVERABLE])?;
        }

        let mut short_uuids = Vec::new();
        let mut long_uuids = Vec::new();
        for uuid in &self.service_uuids {
            match short_uuid(uuid) {
                Some(short) => short_uuids.extend_from_slice(&short.to_le_bytes()),
                None => long_uuids.extend_from_slice(&uuid_le_bytes(uuid)),
            }
        }
        if !short_uuids.is_empty() {
            push_ad_structure(&mut payload, AD_TYPE_COMPLETE_16_BIT_SERVICE_UUIDS, &short_uuids)?;
        }
        if !long_uuids.is_empty() {
            push_ad_structure(&mut payload, AD_TYPE_COMPLETE_128_BIT_SERVICE_UUIDS, &long_uuids)?;
        }

        if self.include_device_name {
            if let Some(name) = device_name.filter(|name| !name.is_empty()) {
                push_ad_structure(&mut payload, AD_TYPE_COMPLETE_LOCAL_NAME, name.as_bytes())?;
            }
        }

        if self.include_tx_power_level {
            push_ad_structure(
                &mut payload,
                AD_TYPE_TX_POWER_LEVEL,
                &settings.tx_power.dbm().to_le_bytes(),
            )?;
        }

        if let Some((uuid, data)) = &self.service_data {
            let (ad_type, mut value) = match short_uuid(uuid) {
                Some(short) => (AD_TYPE_SERVICE_DATA_16_BIT, short.to_le_bytes().to_vec()),
                None => (AD_TYPE_SERVICE_DATA_128_BIT, uuid_le_bytes(uuid).to_vec()),
            };
            value.extend_from_slice(data);
            push_ad_structure(&mut payload, ad_type, &value)?;
        }

        if let Some((company_id, data)) = &self.manufacturer_data {
            let mut value = company_id.to_le_bytes().to_vec();
            value.extend_from_slice(data);
            push_ad_structure(&mut payload, AD_TYPE_MANUFACTURER_SPECIFIC_DATA, &value)?;
        }

        Ok(payload)
    }
}

fn push_ad_structure(payload: &mut Vec<u8>, ad_type: u8, value: &[u8]) -> Result<(), AdvertiseFailure> {
    if payload.len() + value.len() + 2 > MAX_ADVERTISE_PAYLOAD_LEN {
        return Err(AdvertiseFailure::DataTooLarge);
    }
    payload.push((value.len() + 1) as u8);
    payload.push(ad_type);
    payload.extend_from_slice(value);
    Ok(())
}

/// Returns the 16-bit alias of a UUID built on the Bluetooth base UUID.
fn short_uuid(uuid: &Uuid) -> Option<u16> {
    let value = uuid.as_u128();
    let alias_mask: u128 = 0xffff_ffff << 96;
    if value & !alias_mask != BLUETOOTH_BASE_UUID.as_u128() || value >> 112 != 0 {
        return None;
    }
    Some((value >> 96) as u16)
}

fn uuid_le_bytes(uuid: &Uuid) -> [u8; 16] {
    let mut bytes = *uuid.as_bytes();
    bytes.reverse();
    bytes
}

/// Platform advertiser
#[async_trait]
pub trait Advertiser: Send {
    async fn start_advertising(
        &mut self,
        settings: &AdvertiseSettings,
        payload: &[u8],
    ) -> Result<AdvertiseSettingsInEffect, AdvertiseFailure>;

    async fn stop_advertising(&mut self);
}

/// Backend for central-only stacks. Every request is rejected as unsupported.
#[derive(Debug, Default)]
pub struct UnsupportedAdvertiser;

#[async_trait]
impl Advertiser for UnsupportedAdvertiser {
    async fn start_advertising(
        &mut self,
        _settings: &AdvertiseSettings,
        payload: &[u8],
    ) -> Result<AdvertiseSettingsInEffect, AdvertiseFailure> {
        warn!(
            "This platform does not support peripheral advertising, dropping {} byte payload.",
            payload.len()
        );
        Err(AdvertiseFailure::FeatureUnsupported)
    }

    async fn stop_advertising(&mut self) {
        info!("No advertisement to stop.");
    }
}
