pub mod advertise_config;
pub mod scanner_config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::config::advertise_config::AdvertiseConfig;
use crate::config::scanner_config::ScannerConfig;
use crate::utils::ensure_directory_exists;

const CONFIG_FILE_NAME: &str = "ble_scan_config.json";
const CONFIG_PATH_ENV: &str = "BLE_SCAN_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub advertise: AdvertiseConfig,
    /// Default log filter. `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scanner: ScannerConfig::default(),
            advertise: AdvertiseConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Picks the config path: explicit argument, then `BLE_SCAN_CONFIG`, then the working directory.
    pub fn resolve_path(explicit: Option<String>) -> PathBuf {
        explicit
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Reads the config file without logging. `None` when the file does not exist.
    ///
    /// Used before the logger is installed, since the log level lives in the config.
    pub async fn read_config(file_path: &Path) -> Result<Option<Self>> {
        if !file_path.exists() {
            return Ok(None);
        }
        let config_json = fs::read_to_string(file_path).await?;
        Ok(Some(serde_json::from_str(&config_json)?))
    }

    /// Loads the config from a configuration file.
    pub async fn load_config(file_path: &Path) -> Result<Self> {
        let file_path_str = file_path.to_string_lossy().into_owned();

        match Self::read_config(file_path).await? {
            Some(config) => {
                info!("Config loaded from {:?}", file_path_str);
                Ok(config)
            }
            None => {
                warn!("Config file not found at {:?}, using default.", file_path_str);
                Ok(Self::default())
            }
        }
    }

    /// Saves the current config to a configuration file.
    pub async fn save_config(&self, file_path: &Path) -> Result<()> {
        if let Some(config_dir) = file_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            ensure_directory_exists(config_dir).await?;
        }
        let file_path_str = file_path.to_string_lossy().into_owned();

        let config_json = match serde_json::to_string_pretty(&self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize config to JSON: {}", e);
                return Err(e.into());
            }
        };

        fs::write(file_path, config_json).await?;
        info!("Config saved to {:?}", file_path_str);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bluetooth::{AdvertiseMode, TxPowerLevel};

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ble-scan-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_defaults_match_scan_period() {
        let config = AppConfig::default();
        assert_eq!(config.scanner.scan_period_ms, 10_000);
        assert!(config.scanner.auto_start);
        assert_eq!(config.advertise.timeout_ms, 20_000);
        assert!(config.advertise.connectable);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "scanner": { "min_rssi": -70 } }"#).unwrap();
        assert_eq!(config.scanner.min_rssi, Some(-70));
        assert_eq!(config.scanner.scan_period_ms, 10_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_advertise_config_builds_settings() {
        let advertise = AdvertiseConfig {
            mode: AdvertiseMode::LowLatency,
            tx_power: TxPowerLevel::Low,
            timeout_ms: 500_000,
            ..Default::default()
        };
        let settings = advertise.settings();
        assert_eq!(settings.mode, AdvertiseMode::LowLatency);
        assert_eq!(settings.tx_power, TxPowerLevel::Low);
        assert_eq!(settings.timeout_ms, 180_000);
        assert!(advertise.data().include_device_name);
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let path = AppConfig::resolve_path(Some("custom.json".to_string()));
        assert_eq!(path, PathBuf::from("custom.json"));
    }

    #[tokio::test]
    async fn test_missing_file_yields_default() {
        let path = scratch_dir("missing").join("nope.json");
        let config = AppConfig::load_config(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_read_config_reports_missing_file() {
        let path = scratch_dir("read").join("absent.json");
        assert_eq!(AppConfig::read_config(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join(CONFIG_FILE_NAME);

        let mut config = AppConfig::default();
        config.scanner.scan_period_ms = 4_000;
        config.advertise.enabled = false;
        config.save_config(&path).await.unwrap();

        let loaded = AppConfig::load_config(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(AppConfig::read_config(&path).await.unwrap(), Some(config.clone()));
        assert_eq!(loaded.scanner.scan_period(), std::time::Duration::from_secs(4));

        let _ = std::fs::remove_dir_all(dir);
    }
}
