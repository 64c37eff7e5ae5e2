// Biblioteca do middleware do CRM de chatbot
// Expõe módulos e o router para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use bulk_send::{DispatchConfig, SendBulkTemplate};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use whatsapp::WhatsAppClient;

use config::Settings;
use services::{TenantDirectory, WhatsAppTemplateSender};
use utils::AppError;

/// Timeout de conexão com a Cloud API
const WHATSAPP_CONNECT_TIMEOUT_SECS: u64 = 5;

// AppState é definido aqui para ser compartilhado
pub struct AppState {
    pub settings: Settings,
    pub directory: Arc<TenantDirectory>,
    pub bulk_send: Arc<SendBulkTemplate>,
}

impl AppState {
    /// Monta cliente WhatsApp, adaptador de envio e motor de disparo a partir das configurações
    pub fn new(settings: Settings, directory: Arc<TenantDirectory>) -> Result<Self, AppError> {
        let client = WhatsAppClient::with_options(
            settings.whatsapp.api_token.clone(),
            settings.whatsapp.base_url.clone(),
            settings.whatsapp.api_version.clone(),
            settings.whatsapp.timeout_seconds,
            WHATSAPP_CONNECT_TIMEOUT_SECS,
        )
        .map_err(|e| AppError::ConfigError(format!("Failed to create WhatsApp client: {}", e)))?;

        if settings.bulk_send.per_contact_timeout_seconds == 0 {
            return Err(AppError::ConfigError(
                "bulk_send.per_contact_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let dispatch = DispatchConfig {
            max_concurrency: settings.bulk_send.max_concurrency.max(1),
            per_contact_timeout: Duration::from_secs(settings.bulk_send.per_contact_timeout_seconds),
        };

        let bulk_send = SendBulkTemplate::new(
            directory.clone(),
            directory.clone(),
            Arc::new(WhatsAppTemplateSender::new(client)),
        )
        .with_config(dispatch);

        Ok(Self {
            settings,
            directory,
            bulk_send: Arc::new(bulk_send),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Rotas /api protegidas com API key
    let api_routes = Router::new()
        .route("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send", post(handlers::bulk_send))
        .route("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/vip", post(handlers::bulk_send_vip))
        .route("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/tagged", post(handlers::bulk_send_tagged))
        .route("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/preview", post(handlers::bulk_send_preview))
        .route("/api/v1/admin/directory/reload", post(handlers::reload_directory))
        .layer(axum_middleware::from_fn(middleware::require_admin_key))
        .with_state(state.clone());

    Router::new()
        // Health checks (públicos)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/status", get(handlers::status_check))
        .with_state(state)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
}
