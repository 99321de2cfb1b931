mod credential;
mod device_settings;
mod schedule_time;

pub use credential::{Credential, CredentialTable};
pub use device_settings::{DeviceSettings, SettingsTable};
pub use schedule_time::{ScheduleTime, ScheduleTimeTable};

pub trait Table: Send + Sync {
    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;
}
