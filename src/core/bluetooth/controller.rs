//! Scan session controller
//! A single task owns the `ScanSession`. User actions, discovery events and timeout
//! firings all reach it as messages on one channel, so they are applied strictly in
//! arrival order and never race each other.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::core::bluetooth::advertise::{
    AdvertiseData, AdvertiseSettings, AdvertiseSettingsInEffect, Advertiser,
};
use crate::core::bluetooth::scanner::ScanDriver;
use crate::core::bluetooth::session::ScanSession;
use crate::core::bluetooth::timer::DeadlineTimer;
use crate::core::bluetooth::types::{DeviceSelection, DiscoveredDevice};
use crate::core::permission::PermissionAuthority;
use crate::core::presenter::{Presenter, SessionView};
use crate::error::ScanError;

enum ControllerMessage {
    Start {
        reply: oneshot::Sender<Result<(), ScanError>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    Discovered {
        generation: u64,
        device: DiscoveredDevice,
    },
    Timeout {
        generation: u64,
    },
    Select {
        index: usize,
        reply: oneshot::Sender<Option<DeviceSelection>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionView>,
    },
    Advertise {
        settings: AdvertiseSettings,
        data: AdvertiseData,
        reply: oneshot::Sender<Result<AdvertiseSettingsInEffect, ScanError>>,
    },
    Teardown {
        reply: oneshot::Sender<()>,
    },
}

/// Intake for discovery events, handed to the driver for one session.
///
/// Events are tagged with the session they were issued for; the controller drops
/// them once that session has ended.
#[derive(Clone)]
pub struct DiscoverySink {
    generation: u64,
    tx: mpsc::UnboundedSender<ControllerMessage>,
}

impl DiscoverySink {
    /// Forwards one advertisement. Returns false once the controller has shut down.
    pub fn deliver(&self, device: DiscoveredDevice) -> bool {
        self.tx
            .send(ControllerMessage::Discovered {
                generation: self.generation,
                device,
            })
            .is_ok()
    }
}

/// Cloneable front end used by the presentation layer.
#[derive(Clone)]
pub struct ScanControllerHandle {
    tx: mpsc::UnboundedSender<ControllerMessage>,
}

impl ScanControllerHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ControllerMessage,
    ) -> Result<T, ScanError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| ScanError::ControllerClosed)?;
        reply_rx.await.map_err(|_| ScanError::ControllerClosed)
    }

    /// Starts a new session. A running session is restarted with an empty list.
    pub async fn start(&self) -> Result<(), ScanError> {
        self.request(|reply| ControllerMessage::Start { reply }).await?
    }

    /// Stops the current session. Does nothing while idle.
    pub async fn stop(&self) -> Result<(), ScanError> {
        self.request(|reply| ControllerMessage::Stop { reply }).await
    }

    /// Selects the device at `index`, ending the session if it is still scanning.
    /// Out-of-range indices select nothing.
    pub async fn select(&self, index: usize) -> Result<Option<DeviceSelection>, ScanError> {
        self.request(|reply| ControllerMessage::Select { index, reply }).await
    }

    pub async fn snapshot(&self) -> Result<SessionView, ScanError> {
        self.request(|reply| ControllerMessage::Snapshot { reply }).await
    }

    pub async fn advertise(
        &self,
        settings: AdvertiseSettings,
        data: AdvertiseData,
    ) -> Result<AdvertiseSettingsInEffect, ScanError> {
        self.request(|reply| ControllerMessage::Advertise { settings, data, reply })
            .await?
    }

    /// Stops scanning, clears the list and shuts the controller down.
    pub async fn teardown(&self) -> Result<(), ScanError> {
        self.request(|reply| ControllerMessage::Teardown { reply }).await
    }
}

pub struct ScanController {
    session: ScanSession,
    scan_period: Duration,
    driver: Box<dyn ScanDriver>,
    advertiser: Box<dyn Advertiser>,
    permissions: Box<dyn PermissionAuthority>,
    presenter: Box<dyn Presenter>,
    device_name: Option<String>,
    timer: Option<DeadlineTimer>,
    tx: mpsc::WeakUnboundedSender<ControllerMessage>,
    rx: mpsc::UnboundedReceiver<ControllerMessage>,
}

impl ScanController {
    /// Spawns the controller task and returns its handle.
    pub fn spawn(
        driver: Box<dyn ScanDriver>,
        advertiser: Box<dyn Advertiser>,
        permissions: Box<dyn PermissionAuthority>,
        presenter: Box<dyn Presenter>,
        scan_period: Duration,
        device_name: Option<String>,
    ) -> (ScanControllerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            session: ScanSession::new(),
            scan_period,
            driver,
            advertiser,
            permissions,
            presenter,
            device_name,
            timer: None,
            tx: tx.downgrade(),
            rx,
        };
        let task = tokio::spawn(controller.run());
        (ScanControllerHandle { tx }, task)
    }

    async fn run(mut self) {
        info!("Scan controller started.");
        while let Some(message) = self.rx.recv().await {
            match message {
                ControllerMessage::Start { reply } => {
                    let result = self.start().await;
                    let _ = reply.send(result);
                }
                ControllerMessage::Stop { reply } => {
                    self.stop().await;
                    let _ = reply.send(());
                }
                ControllerMessage::Discovered { generation, device } => {
                    self.on_device_discovered(generation, device);
                }
                ControllerMessage::Timeout { generation } => {
                    self.on_timeout(generation).await;
                }
                ControllerMessage::Select { index, reply } => {
                    let selection = self.on_device_selected(index).await;
                    let _ = reply.send(selection);
                }
                ControllerMessage::Snapshot { reply } => {
                    let _ = reply.send(self.view());
                }
                ControllerMessage::Advertise { settings, data, reply } => {
                    let result = self.advertise(&settings, &data).await;
                    let _ = reply.send(result);
                }
                ControllerMessage::Teardown { reply } => {
                    self.stop().await;
                    self.session.clear();
                    self.advertiser.stop_advertising().await;
                    self.render();
                    let _ = reply.send(());
                    break;
                }
            }
        }
        self.cancel_timer();
        info!("Scan controller stopped.");
    }

    async fn start(&mut self) -> Result<(), ScanError> {
        if !self.permissions.has_scan_permission() {
            return Err(self.report(ScanError::PermissionDenied));
        }
        if !self.driver.is_enabled().await {
            return Err(self.report(ScanError::AdapterUnavailable));
        }
        let Some(tx) = self.tx.upgrade() else {
            return Err(ScanError::ControllerClosed);
        };

        let restarted = self.session.is_active();
        if restarted {
            info!("Restarting active scan session.");
            self.halt().await;
        }

        let generation = self.session.begin(Instant::now(), self.scan_period);
        let sink = DiscoverySink {
            generation,
            tx: tx.clone(),
        };
        if let Err(e) = self.driver.start_discovery(sink).await {
            self.session.end();
            if restarted {
                // the presenter still shows the halted session
                self.render();
            }
            return Err(self.report(e));
        }

        if let Some(deadline) = self.session.deadline() {
            self.timer = Some(DeadlineTimer::schedule(deadline, move || {
                let _ = tx.send(ControllerMessage::Timeout { generation });
            }));
        }

        info!(
            "Scan session {} started for {:?}.",
            generation, self.scan_period
        );
        self.render();
        Ok(())
    }

    async fn stop(&mut self) {
        if self.halt().await {
            info!("Scan session {} stopped.", self.session.generation());
            self.render();
        }
    }

    /// Ends the session without notifying the presenter. Returns false while idle.
    async fn halt(&mut self) -> bool {
        if !self.session.end() {
            return false;
        }
        self.cancel_timer();
        self.driver.stop_discovery().await;
        true
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn on_device_discovered(&mut self, generation: u64, device: DiscoveredDevice) {
        if !self.session.is_current(generation) {
            debug!("Dropping discovery of {} from ended session {}.", device.address, generation);
            return;
        }
        debug!("Discovered {} ({})", device.address, device.display_name());
        if self.session.record(device) {
            self.render();
        }
    }

    async fn on_timeout(&mut self, generation: u64) {
        if !self.session.is_current(generation) {
            debug!("Ignoring stale timeout for session {}.", generation);
            return;
        }
        self.timer = None;
        info!("Scan period elapsed, stopping scan.");
        self.stop().await;
    }

    async fn on_device_selected(&mut self, index: usize) -> Option<DeviceSelection> {
        let Some(selection) = self.session.selection(index) else {
            debug!("Selection index {} is out of range.", index);
            return None;
        };
        self.stop().await;
        info!("Selected device {} ({:?}).", selection.address, selection.name);
        Some(selection)
    }

    async fn advertise(
        &mut self,
        settings: &AdvertiseSettings,
        data: &AdvertiseData,
    ) -> Result<AdvertiseSettingsInEffect, ScanError> {
        let payload = data
            .encode(settings, self.device_name.as_deref())
            .map_err(|e| self.report(e.into()))?;

        match self.advertiser.start_advertising(settings, &payload).await {
            Ok(in_effect) => {
                info!(
                    "Advertising started: tx power {:?}, mode {:?}, timeout {} ms",
                    in_effect.tx_power, in_effect.mode, in_effect.timeout_ms
                );
                Ok(in_effect)
            }
            Err(failure) => Err(self.report(failure.into())),
        }
    }

    /// Reports a failure once to the presenter and hands it back for the caller.
    fn report(&mut self, error: ScanError) -> ScanError {
        match &error {
            ScanError::AdvertiseFailed(failure) => {
                error!("Failed to start advertising, code {}: {}", failure.code(), failure)
            }
            other => warn!("{}", other),
        }
        self.presenter.notice(&error);
        error
    }

    fn view(&self) -> SessionView {
        SessionView {
            devices: self.session.devices().to_vec(),
            active: self.session.is_active(),
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.presenter.render(&view);
    }
}
