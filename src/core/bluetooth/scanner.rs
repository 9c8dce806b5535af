use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use async_trait::async_trait;
use bluest::{Adapter, AdapterEvent};
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use regex::Regex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::bluetooth::controller::DiscoverySink;
use crate::core::bluetooth::types::DiscoveredDevice;
use crate::error::ScanError;

/// The platform BLE adapter service the scan controller drives.
///
/// Discovery is push based: once started, the driver forwards every advertisement
/// to the sink until `stop_discovery` is called.
#[async_trait]
pub trait ScanDriver: Send + Sync {
    async fn is_enabled(&self) -> bool;

    async fn start_discovery(&mut self, sink: DiscoverySink) -> Result<(), ScanError>;

    async fn stop_discovery(&mut self);
}

static MAC_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})").expect("MAC address pattern is valid")
});

pub struct BluetoothScanner {
    adapter: Option<Adapter>,
    /// Kept current by `availability_task` so `is_enabled` never waits on the platform.
    available: Arc<AtomicBool>,
    availability_task: Option<JoinHandle<()>>,
    min_rssi: Option<i16>,
    cancel_token: CancellationToken,
    scan_task_handle: Option<JoinHandle<()>>,
}

impl BluetoothScanner {
    /// Looks up the default adapter. A missing adapter is not an error here; it is
    /// reported as unavailable when a scan is requested.
    pub async fn new(min_rssi: Option<i16>) -> Self {
        let adapter = Adapter::default().await;
        let available = Arc::new(AtomicBool::new(false));
        let availability_task = match &adapter {
            Some(adapter) => Some(tokio::spawn(Self::watch_availability(
                adapter.clone(),
                available.clone(),
            ))),
            None => {
                warn!("No Bluetooth adapter found");
                None
            }
        };
        Self {
            adapter,
            available,
            availability_task,
            min_rssi,
            cancel_token: CancellationToken::new(),
            scan_task_handle: None,
        }
    }

    /// Tracks whether the adapter is powered on for as long as the scanner lives.
    async fn watch_availability(adapter: Adapter, available: Arc<AtomicBool>) {
        match adapter.wait_available().await {
            Ok(()) => {
                info!("Bluetooth adapter is available.");
                available.store(true, Ordering::Release);
            }
            Err(e) => {
                error!("Failed to query adapter availability: {}", e);
                return;
            }
        }

        let mut events = match adapter.events().await {
            Ok(events) => events,
            Err(e) => {
                warn!("Adapter state events unavailable: {}", e);
                return;
            }
        };
        while let Some(event) = events.next().await {
            match event {
                Ok(AdapterEvent::Available) => {
                    info!("Bluetooth adapter is available.");
                    available.store(true, Ordering::Release);
                }
                Ok(AdapterEvent::Unavailable) => {
                    warn!("Bluetooth adapter is no longer available.");
                    available.store(false, Ordering::Release);
                }
                Err(e) => warn!("Adapter state event error: {}", e),
            }
        }
    }

    /// Scans for Bluetooth devices using bluest library
    async fn internal_scan_task(
        adapter: Adapter,
        sink: DiscoverySink,
        cancel_token: CancellationToken,
        min_rssi: Option<i16>,
    ) -> Result<()> {
        info!("Starting bluetooth scan");
        let mut scan_stream = adapter.scan(&[]).await?;

        loop {
            tokio::select! {
                result = scan_stream.next() => {
                    match result {
                        Some(discovered_device) => {
                            let rssi = discovered_device.rssi;
                            debug!("Found device - Device: {:?}, RSSI: {:?}", discovered_device.device, rssi);

                            if let (Some(floor), Some(signal_strength)) = (min_rssi, rssi) {
                                if signal_strength < floor {
                                    continue;
                                }
                            }

                            let id = discovered_device.device.id().to_string();
                            let address = Self::extract_mac_address(&id).unwrap_or(id);
                            let name = discovered_device
                                .adv_data
                                .local_name
                                .or_else(|| discovered_device.device.name().ok());

                            if !sink.deliver(DiscoveredDevice::new(address, name, rssi)) {
                                info!("Scan controller is gone, ending scan.");
                                break;
                            }
                        }
                        None => {
                            info!("Bluetooth scan stream has ended.");
                            break;
                        }
                    }
                }
                _ = cancel_token.cancelled() => {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Pulls a MAC address out of a platform device id. macOS ids carry none.
    fn extract_mac_address(device_id_str: &str) -> Option<String> {
        MAC_ADDRESS_RE
            .find_iter(device_id_str)
            .last()
            .map(|m| m.as_str().to_uppercase())
    }
}

#[async_trait]
impl ScanDriver for BluetoothScanner {
    async fn is_enabled(&self) -> bool {
        self.adapter.is_some() && self.available.load(Ordering::Acquire)
    }

    async fn start_discovery(&mut self, sink: DiscoverySink) -> Result<(), ScanError> {
        let adapter = self.adapter.clone().ok_or(ScanError::AdapterUnavailable)?;
        if self.scan_task_handle.is_some() {
            self.stop_discovery().await;
        }

        self.cancel_token = CancellationToken::new();
        let cancel_token_for_task = self.cancel_token.clone();
        let min_rssi = self.min_rssi;

        let handle = tokio::spawn(async move {
            if let Err(e) = Self::internal_scan_task(adapter, sink, cancel_token_for_task, min_rssi).await {
                error!("Bluetooth scan failed: {:?}", e);
            }
        });
        self.scan_task_handle = Some(handle);

        info!("Device scan task started.");
        Ok(())
    }

    async fn stop_discovery(&mut self) {
        info!("Stopping Bluetooth scan.");
        self.cancel_token.cancel();

        if let Some(handle) = self.scan_task_handle.take() {
            debug!("Waiting for scan task to finish...");
            match handle.await {
                Ok(()) => debug!("Scan task finished after cancellation."),
                Err(e) if e.is_cancelled() => info!("Scan task was cancelled."),
                Err(e) => error!("Scan task finished with an unexpected join error: {:?}", e),
            }
        } else {
            debug!("No active scan task handle found to wait for.");
        }
    }
}

impl Drop for BluetoothScanner {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.availability_task.take() {
            task.abort();
        }
    }
}
