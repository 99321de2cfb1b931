use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;
use crate::middlewares::TokenState;
use crate::repositories::{CredentialRepository, ScheduleRepository, SettingsRepository};
use crate::services::{
    AuthService, Clock, MessageService, RelayService, ScheduleService, SchedulerService,
    SettingsService, SystemClock, TokenService, detect_mac_address,
};

pub async fn create_app(settings: &Arc<Settings>) -> Router {
    let storage = Arc::new(
        Storage::new(settings.database.clone(), SchemaManager::default())
            .await
            .unwrap(),
    );

    let credential_repository = Arc::new(CredentialRepository::new(storage.clone()));
    let settings_repository = Arc::new(SettingsRepository::new(storage.clone()));
    let schedule_repository = Arc::new(ScheduleRepository::new(storage.clone()));

    let auth_service = Arc::new(AuthService::new());
    let token_service = Arc::new(TokenService::new(&settings.auth));
    let message_service = Arc::new(MessageService::new(32));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if credential_repository.get().await.unwrap().is_none() {
        let hash = auth_service.hash(&settings.auth.default_password).unwrap();
        credential_repository.upsert(&hash).await.unwrap();

        tracing::warn!("no credential found, seeded the default password; change it after login");
    }

    let settings_service = Arc::new(
        SettingsService::load(settings_repository.clone(), &settings.device)
            .await
            .unwrap(),
    );
    let schedule_service = Arc::new(
        ScheduleService::load(schedule_repository.clone())
            .await
            .unwrap(),
    );
    let relay_service = Arc::new(RelayService::connect(&settings.relay));

    let scheduler = Arc::new(SchedulerService::new(
        schedule_service.clone(),
        settings_service.clone(),
        relay_service.clone(),
        message_service.clone(),
        clock.clone(),
    ));
    scheduler.start();

    let token_state = TokenState {
        token_service: token_service.clone(),
    };

    Router::new()
        .merge(auth_router(
            AuthState {
                auth_service: auth_service.clone(),
                token_service: token_service.clone(),
                credential_repository: credential_repository.clone(),
            },
            token_state.clone(),
        ))
        .merge(schedule_router(
            ScheduleState {
                schedule_service: schedule_service.clone(),
            },
            token_state.clone(),
        ))
        .merge(relay_router(
            RelayState {
                relay_service: relay_service.clone(),
                settings_service: settings_service.clone(),
                message_service: message_service.clone(),
            },
            token_state.clone(),
        ))
        .merge(setting_router(
            SettingState {
                settings_service: settings_service.clone(),
                message_service: message_service.clone(),
                mac_address: detect_mac_address(),
            },
            token_state.clone(),
        ))
        .merge(status_router(StatusState {
            schedule_service: schedule_service.clone(),
            message_service: message_service.clone(),
            clock: clock.clone(),
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
