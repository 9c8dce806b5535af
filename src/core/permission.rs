//! Permission authority boundary
//! Scanning needs a location-equivalent permission on some platforms. The controller
//! only asks whether it has been granted; requesting it is the host's job.

pub trait PermissionAuthority: Send {
    fn has_scan_permission(&self) -> bool;
}

/// Desktop platforms gate Bluetooth access at the OS level, not per-app at runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopPermissions;

impl PermissionAuthority for DesktopPermissions {
    fn has_scan_permission(&self) -> bool {
        true
    }
}
