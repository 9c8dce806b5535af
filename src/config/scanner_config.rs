use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::bluetooth::SCAN_PERIOD;

/// Scan session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// How long a scan session runs before it stops on its own, in milliseconds.
    pub scan_period_ms: u64,
    /// Advertisements weaker than this (dBm) are ignored. `None` keeps everything.
    pub min_rssi: Option<i16>,
    /// Start scanning as soon as the tool launches.
    pub auto_start: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            scan_period_ms: SCAN_PERIOD.as_millis() as u64,
            min_rssi: None,
            auto_start: true,
        }
    }
}

impl ScannerConfig {
    pub fn scan_period(&self) -> Duration {
        Duration::from_millis(self.scan_period_ms)
    }
}
