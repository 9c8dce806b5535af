//! Error types shared by the scan controller and its collaborators.

use thiserror::Error;

/// Reasons the platform can reject an advertising request.
///
/// The numeric codes match the ones reported by the platform advertise callback.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiseFailure {
    #[error("advertise data is larger than 31 bytes")]
    DataTooLarge,

    #[error("no advertising instance is available")]
    TooManyAdvertisers,

    #[error("advertising is already started")]
    AlreadyStarted,

    #[error("internal error")]
    InternalError,

    #[error("peripheral advertising is not supported on this platform")]
    FeatureUnsupported,
}

impl AdvertiseFailure {
    /// Maps a platform error code to a failure reason. Unknown codes are treated as internal errors.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::DataTooLarge,
            2 => Self::TooManyAdvertisers,
            3 => Self::AlreadyStarted,
            5 => Self::FeatureUnsupported,
            _ => Self::InternalError,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::DataTooLarge => 1,
            Self::TooManyAdvertisers => 2,
            Self::AlreadyStarted => 3,
            Self::InternalError => 4,
            Self::FeatureUnsupported => 5,
        }
    }
}

/// Errors surfaced by scan and advertise operations.
///
/// All of them are terminal for the operation that raised them: they are reported
/// once to the presentation layer and nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Bluetooth LE adapter is not available or not enabled")]
    AdapterUnavailable,

    #[error("permission to scan for Bluetooth devices was denied")]
    PermissionDenied,

    #[error("failed to start advertising (code {code}): {0}", code = .0.code())]
    AdvertiseFailed(#[from] AdvertiseFailure),

    #[error("platform refused to start discovery: {0}")]
    Driver(String),

    #[error("scan controller is no longer running")]
    ControllerClosed,
}
