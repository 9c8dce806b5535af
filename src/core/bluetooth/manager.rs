//! Bluetooth manager for the scan tool
//! This module wires the platform adapter into a running scan controller.

use anyhow::Result;
use log::{info, warn};
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::core::bluetooth::advertise::{AdvertiseSettingsInEffect, UnsupportedAdvertiser};
use crate::core::bluetooth::controller::{ScanController, ScanControllerHandle};
use crate::core::bluetooth::scanner::BluetoothScanner;
use crate::core::bluetooth::types::DeviceSelection;
use crate::core::permission::DesktopPermissions;
use crate::core::presenter::{Presenter, SessionView};

/// Manages Bluetooth operations
pub struct BluetoothManager {
    controller: ScanControllerHandle,
    controller_task: JoinHandle<()>,
    config: AppConfig,
}

impl BluetoothManager {
    /// Creates a new BluetoothManager on the default adapter
    pub async fn new(config: AppConfig, presenter: Box<dyn Presenter>) -> Result<Self> {
        let scanner = BluetoothScanner::new(config.scanner.min_rssi).await;

        let (controller, controller_task) = ScanController::spawn(
            Box::new(scanner),
            Box::new(UnsupportedAdvertiser),
            Box::new(DesktopPermissions),
            presenter,
            config.scanner.scan_period(),
            config.advertise.device_name.clone(),
        );
        info!("Bluetooth manager ready.");

        Ok(Self {
            controller,
            controller_task,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn start_scan(&self) -> Result<()> {
        self.controller.start().await?;
        Ok(())
    }

    pub async fn stop_scan(&self) -> Result<()> {
        self.controller.stop().await?;
        Ok(())
    }

    /// Selects a listed device for the detail view. `None` when the index is out of range.
    pub async fn select_device(&self, index: usize) -> Result<Option<DeviceSelection>> {
        Ok(self.controller.select(index).await?)
    }

    pub async fn devices(&self) -> Result<SessionView> {
        Ok(self.controller.snapshot().await?)
    }

    /// Advertises with the configured settings
    pub async fn start_advertising(&self) -> Result<AdvertiseSettingsInEffect> {
        let advertise = &self.config.advertise;
        Ok(self
            .controller
            .advertise(advertise.settings(), advertise.data())
            .await?)
    }

    /// Stops scanning and shuts the controller down
    pub async fn shutdown(self) -> Result<()> {
        self.controller.teardown().await?;
        if let Err(e) = self.controller_task.await {
            warn!("Scan controller task ended abnormally: {:?}", e);
        }
        Ok(())
    }
}
