//! Core functionality for the scan tool
//! This module contains the scan controller and the boundaries it talks to.

pub mod bluetooth;
pub mod permission;
pub mod presenter;

// Re-export commonly used types
pub use bluetooth::BluetoothManager;
pub use presenter::{ConsolePresenter, Presenter, SessionView};
