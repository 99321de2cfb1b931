use std::sync::{Arc, RwLock};
use std::time::Duration;

use bellsync_api::models::SettingsBody;

use crate::configs::settings::Device;
use crate::errors::SettingError;
use crate::models::DeviceSettings;
use crate::repositories::SettingsRepository;

/// Relay hold time is capped so a bad write can never keep the bell closed
/// for long.
pub const MAX_RING_DURATION_SECS: u32 = 60;

const MAX_DEVICE_NAME_LEN: usize = 64;

pub struct SettingsService {
    repository: Arc<SettingsRepository>,
    current: RwLock<DeviceSettings>,
}

impl SettingsService {
    /// Restores persisted settings, seeding the configured defaults on
    /// first boot.
    pub async fn load(
        repository: Arc<SettingsRepository>,
        defaults: &Device,
    ) -> Result<Self, sqlx::Error> {
        let current = match repository.get().await? {
            Some(settings) => settings,
            None => {
                let seeded = DeviceSettings {
                    id: 1,
                    device_name: defaults.name.clone(),
                    unique_url: defaults.unique_url.clone(),
                    ring_duration_secs: defaults.ring_duration_secs,
                };
                repository.upsert(&seeded).await?;
                tracing::info!("seeded device settings: {}", seeded.device_name);
                seeded
            }
        };

        Ok(Self {
            repository,
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> DeviceSettings {
        self.current.read().expect("settings lock poisoned").clone()
    }

    /// Relay hold time for the next activation.
    pub fn ring_duration(&self) -> Duration {
        Duration::from_secs(self.get().ring_duration_secs as u64)
    }

    pub fn validate(body: &SettingsBody) -> Result<(), SettingError> {
        if body.device_name.is_empty() || body.device_name.chars().count() > MAX_DEVICE_NAME_LEN {
            return Err(SettingError::InvalidDeviceName);
        }

        // mDNS label: the device answers at <unique_url>.local
        if body.unique_url.is_empty()
            || !body
                .unique_url
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(SettingError::InvalidUniqueUrl);
        }

        if body.ring_duration == 0 || body.ring_duration > MAX_RING_DURATION_SECS {
            return Err(SettingError::InvalidRingDuration);
        }

        Ok(())
    }

    /// Validates and persists new settings. Returns true when the network
    /// identifier changed and the device must re-bind to apply it.
    pub async fn save(&self, body: &SettingsBody) -> Result<bool, SettingError> {
        Self::validate(body)?;

        let updated = DeviceSettings {
            id: 1,
            device_name: body.device_name.clone(),
            unique_url: body.unique_url.clone(),
            ring_duration_secs: body.ring_duration,
        };
        let restart_required = {
            let current = self.current.read().expect("settings lock poisoned");
            current.unique_url != updated.unique_url
        };

        self.repository.upsert(&updated).await?;
        *self.current.write().expect("settings lock poisoned") = updated;

        Ok(restart_required)
    }
}

/// Best-effort MAC of the first non-loopback interface; the settings page
/// shows it next to the network identifier.
pub fn detect_mac_address() -> String {
    let fallback = String::from("00:00:00:00:00:00");

    let Ok(entries) = std::fs::read_dir("/sys/class/net") else {
        return fallback;
    };

    for entry in entries.flatten() {
        if entry.file_name() == "lo" {
            continue;
        }
        if let Ok(address) = std::fs::read_to_string(entry.path().join("address")) {
            let address = address.trim();
            if !address.is_empty() && address != "00:00:00:00:00:00" {
                return address.to_string();
            }
        }
    }

    fallback
}
