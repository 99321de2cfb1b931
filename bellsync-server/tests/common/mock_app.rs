use std::sync::Arc;

use axum::Router;
use time::OffsetDateTime;
use time::macros::datetime;

use bellsync_server::configs::{Auth, Database, Device, SchemaManager, Storage};
use bellsync_server::errors::RelayError;
use bellsync_server::handles::{
    AuthState, RelayState, ScheduleState, SettingState, StatusState, auth_router, relay_router,
    schedule_router, setting_router, status_router,
};
use bellsync_server::middlewares::TokenState;
use bellsync_server::repositories::{CredentialRepository, ScheduleRepository, SettingsRepository};
use bellsync_server::services::{
    AuthService, Clock, MessageService, RelayLine, RelayService, ScheduleService, SettingsService,
    TokenService,
};

/// Initial device password provisioned into every mock app.
pub const TEST_PASSWORD: &str = "admin";

/// Relay line that accepts every state change without hardware.
pub struct SilentLine;

impl RelayLine for SilentLine {
    fn write_state(&mut self, _energized: bool) -> Result<(), RelayError> {
        Ok(())
    }
}

/// Relay line that faults on every state change.
pub struct FaultyLine;

impl RelayLine for FaultyLine {
    fn write_state(&mut self, _energized: bool) -> Result<(), RelayError> {
        Err(RelayError::NotConnected)
    }
}

/// Frozen wall clock so the status endpoints are deterministic.
/// 2024-04-01 is a Monday.
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub const MONDAY_SEVEN_AM: OffsetDateTime = datetime!(2024-04-01 07:00 UTC);

pub struct MockApp {
    pub router: Router,
    /// A pre-issued session token.
    pub token: String,
    pub storage: Arc<Storage>,
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub credential_repository: Arc<CredentialRepository>,
    pub schedule_service: Arc<ScheduleService>,
    pub settings_service: Arc<SettingsService>,
    pub message_service: Arc<MessageService>,
    pub relay_service: Arc<RelayService>,
    pub clock: Arc<dyn Clock>,
    token_state: TokenState,
}

impl MockApp {
    pub async fn new() -> Self {
        let storage = Arc::new(
            Storage::new(
                Database {
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        let auth_service = Arc::new(AuthService::new());
        let token_service = Arc::new(TokenService::new(&Auth {
            default_password: String::from(TEST_PASSWORD),
            token_ttl_secs: 3600,
        }));
        let message_service = Arc::new(MessageService::new(16));
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(MONDAY_SEVEN_AM));

        let credential_repository = Arc::new(CredentialRepository::new(storage.clone()));
        let hash = auth_service.hash(TEST_PASSWORD).unwrap();
        credential_repository.upsert(&hash).await.unwrap();

        let settings_service = Arc::new(
            SettingsService::load(
                Arc::new(SettingsRepository::new(storage.clone())),
                &Device {
                    name: String::from("bellsystem"),
                    unique_url: String::from("bellsystem"),
                    ring_duration_secs: 1,
                },
            )
            .await
            .unwrap(),
        );
        let schedule_service = Arc::new(
            ScheduleService::load(Arc::new(ScheduleRepository::new(storage.clone())))
                .await
                .unwrap(),
        );
        let relay_service = Arc::new(RelayService::new(Box::new(SilentLine)));

        let token = token_service.issue().token;
        let token_state = TokenState {
            token_service: token_service.clone(),
        };

        Self {
            router: Router::new(),
            token,
            storage,
            auth_service,
            token_service,
            credential_repository,
            schedule_service,
            settings_service,
            message_service,
            relay_service,
            clock,
            token_state,
        }
    }

    pub fn with_faulty_relay(mut self) -> Self {
        self.relay_service = Arc::new(RelayService::new(Box::new(FaultyLine)));
        self
    }

    pub fn with_auth_handle(mut self) -> Self {
        self.router = self.router.merge(auth_router(
            AuthState {
                auth_service: self.auth_service.clone(),
                token_service: self.token_service.clone(),
                credential_repository: self.credential_repository.clone(),
            },
            self.token_state.clone(),
        ));
        self
    }

    pub fn with_schedule_handle(mut self) -> Self {
        self.router = self.router.merge(schedule_router(
            ScheduleState {
                schedule_service: self.schedule_service.clone(),
            },
            self.token_state.clone(),
        ));
        self
    }

    pub fn with_relay_handle(mut self) -> Self {
        self.router = self.router.merge(relay_router(
            RelayState {
                relay_service: self.relay_service.clone(),
                settings_service: self.settings_service.clone(),
                message_service: self.message_service.clone(),
            },
            self.token_state.clone(),
        ));
        self
    }

    pub fn with_setting_handle(mut self) -> Self {
        self.router = self.router.merge(setting_router(
            SettingState {
                settings_service: self.settings_service.clone(),
                message_service: self.message_service.clone(),
                mac_address: String::from("de:ad:be:ef:00:01"),
            },
            self.token_state.clone(),
        ));
        self
    }

    pub fn with_status_handle(mut self) -> Self {
        self.router = self.router.merge(status_router(StatusState {
            schedule_service: self.schedule_service.clone(),
            message_service: self.message_service.clone(),
            clock: self.clock.clone(),
        }));
        self
    }
}
