mod credential;
mod schedule;
mod settings;

pub use credential::CredentialRepository;
pub use schedule::ScheduleRepository;
pub use settings::SettingsRepository;
