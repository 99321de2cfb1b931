mod auth;
mod schedule;
mod settings;

pub use auth::{ChangePasswordRequest, LoginRequest, TokenResponse};
pub use schedule::{
    DayOfWeek, RingTime, ScheduleEntries, ScheduleParseError, WeeklySchedule,
};
pub use settings::{SaveSettingsResponse, SettingsBody};
