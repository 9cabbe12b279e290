use serde::{Deserialize, Serialize};

pub const UNKNOWN_MODEL: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    pub serial_number: String,
    pub state: String,
    pub model: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Success,
    NoConnectedDevice,
    NoPackagesFound,
    NoDeviceSelected,
    FailedOperation,
}

impl OperationStatus {
    pub fn code(&self) -> &'static str {
        match self {
            OperationStatus::Success => "SUCCESS",
            OperationStatus::NoConnectedDevice => "NO_CONNECTED_DEVICE",
            OperationStatus::NoPackagesFound => "NO_PACKAGES_FOUND",
            OperationStatus::NoDeviceSelected => "NO_DEVICE_SELECTED",
            OperationStatus::FailedOperation => "FAILED_OPERATION",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationStatus::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    Disable,
    Uninstall,
    /// Anything the form sent that is neither of the above.
    Unrecognized,
}

impl PackageAction {
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "disable" => PackageAction::Disable,
            "uninstall" => PackageAction::Uninstall,
            _ => PackageAction::Unrecognized,
        }
    }
}

/// Result of a package listing or bulk action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageOutcome {
    pub status: OperationStatus,
    pub packages: Vec<String>,
}

impl PackageOutcome {
    pub fn new(status: OperationStatus, packages: Vec<String>) -> Self {
        Self { status, packages }
    }

    pub fn empty(status: OperationStatus) -> Self {
        Self::new(status, Vec::new())
    }
}

/// Banner shown on every rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn none() -> Self {
        Self::ok("")
    }
}
