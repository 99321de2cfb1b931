use serde::{Deserialize, Serialize};

/// Device settings as the settings page sends and receives them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct SettingsBody {
    #[serde(rename = "deviceName")]
    pub device_name: String,
    #[serde(rename = "uniqueURL")]
    pub unique_url: String,
    /// Relay hold time in seconds.
    #[serde(rename = "ringDuration")]
    pub ring_duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct SaveSettingsResponse {
    pub message: String,
    /// True when the network identifier changed and the device must re-bind.
    #[serde(rename = "restartRequired")]
    pub restart_required: bool,
}
