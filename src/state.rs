//! Application state management
//! This module defines and manages the application state.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::config::AppConfig;
use crate::core::{BluetoothManager, ConsolePresenter};

/// Application state
pub struct AppState {
    /// The Bluetooth manager instance
    pub bluetooth_manager: BluetoothManager,
    /// Where the config was loaded from
    pub config_path: PathBuf,
}

impl AppState {
    /// Creates a new AppState instance
    pub async fn new(config: AppConfig, config_path: PathBuf) -> Result<Self> {
        info!("Initializing BluetoothManager...");
        let manager = BluetoothManager::new(config, Box::new(ConsolePresenter::new())).await?;
        Ok(Self {
            bluetooth_manager: manager,
            config_path,
        })
    }
}
