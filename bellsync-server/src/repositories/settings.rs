use std::sync::Arc;

use sqlx::Error;

use crate::configs::Storage;
use crate::models::DeviceSettings;

pub struct SettingsRepository {
    storage: Arc<Storage>,
}

impl SettingsRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn get(&self) -> Result<Option<DeviceSettings>, Error> {
        let settings: Option<DeviceSettings> =
            sqlx::query_as("SELECT * FROM settings WHERE id = 1")
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(settings)
    }

    pub async fn upsert(&self, item: &DeviceSettings) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO settings (id, device_name, unique_url, ring_duration_secs)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                device_name = excluded.device_name,
                unique_url = excluded.unique_url,
                ring_duration_secs = excluded.ring_duration_secs
            "#,
        )
        .bind(&item.device_name)
        .bind(&item.unique_url)
        .bind(item.ring_duration_secs)
        .execute(self.storage.get_pool())
        .await?;

        Ok(())
    }
}
