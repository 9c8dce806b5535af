//! Presentation layer boundary
//! The controller pushes a fresh `SessionView` whenever the list or the scanning
//! state changes, and reports failures through `notice`.

use serde::Serialize;

use crate::core::bluetooth::{DeviceSelection, DiscoveredDevice};
use crate::error::ScanError;

/// What the presentation layer needs to draw the device list and its controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub devices: Vec<DiscoveredDevice>,
    pub active: bool,
}

impl SessionView {
    /// "scan" is offered while idle
    pub fn can_scan(&self) -> bool {
        !self.active
    }

    /// "stop" is offered while scanning
    pub fn can_stop(&self) -> bool {
        self.active
    }
}

/// Receives view updates and transient notices from the scan controller.
pub trait Presenter: Send {
    fn render(&mut self, view: &SessionView);

    /// Shows a one-off failure notice.
    fn notice(&mut self, error: &ScanError);
}

/// Prints the device list to stdout, one numbered line per device.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_view(view: &SessionView) -> String {
        let mut out = String::new();
        if view.can_stop() {
            out.push_str("Scanning... [stop]\n");
        } else {
            out.push_str("Idle [scan]\n");
        }
        for (index, device) in view.devices.iter().enumerate() {
            out.push_str(&format!(
                "  {:>2}. {:<24} {}\n",
                index,
                device.display_name(),
                device.address
            ));
        }
        out
    }

    /// Hands the selected device off to the detail view.
    pub fn show_detail(selection: &DeviceSelection) {
        println!(
            "Device detail -> name: {}, address: {}",
            selection.name.as_deref().unwrap_or("(none)"),
            selection.address
        );
    }
}

impl Presenter for ConsolePresenter {
    fn render(&mut self, view: &SessionView) {
        print!("{}", Self::format_view(view));
    }

    fn notice(&mut self, error: &ScanError) {
        eprintln!("! {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_view_shows_affordances_and_devices() {
        let view = SessionView {
            devices: vec![
                DiscoveredDevice::new("AA:BB:CC:DD:EE:01", Some("Thermo".to_string()), None),
                DiscoveredDevice::new("AA:BB:CC:DD:EE:02", None, None),
            ],
            active: true,
        };
        let text = ConsolePresenter::format_view(&view);
        assert!(text.starts_with("Scanning... [stop]"));
        assert!(text.contains("0. Thermo"));
        assert!(text.contains("1. Unknown device"));
        assert!(text.contains("AA:BB:CC:DD:EE:02"));

        let idle = SessionView { devices: Vec::new(), active: false };
        assert!(idle.can_scan());
        assert!(!idle.can_stop());
        assert_eq!(ConsolePresenter::format_view(&idle), "Idle [scan]\n");
    }
}
