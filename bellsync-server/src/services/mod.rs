mod auth_service;
mod clock;
mod message_service;
mod relay_service;
mod schedule_service;
mod scheduler_service;
mod settings_service;
mod token_service;

pub use auth_service::*;
pub use clock::*;
pub use message_service::*;
pub use relay_service::*;
pub use schedule_service::*;
pub use scheduler_service::*;
pub use settings_service::*;
pub use token_service::*;
