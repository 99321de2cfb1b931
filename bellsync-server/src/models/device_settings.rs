use crate::models::Table;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DeviceSettings {
    pub id: i32,
    pub device_name: String,
    /// Network identifier; the device answers at `<unique_url>.local`.
    pub unique_url: String,
    pub ring_duration_secs: u32,
}

pub struct SettingsTable;

impl Table for SettingsTable {
    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                device_name TEXT NOT NULL,
                unique_url TEXT NOT NULL,
                ring_duration_secs INTEGER NOT NULL
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS settings;")
    }
}
