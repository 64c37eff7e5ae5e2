use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "chatbot-crm-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Pronto quando o diretório tem pelo menos um cliente carregado
pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_integration_status_check();

    let stats = state.directory.stats().await;
    let overall_ready = stats.tenants > 0;
    let directory_status = if overall_ready { "loaded" } else { "empty" };

    let response = json!({
        "ready": overall_ready,
        "service": "chatbot-crm-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "directory": {
                "status": directory_status,
                "tenants": stats.tenants,
                "contacts": stats.contacts
            }
        }
    });

    if overall_ready {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Resumo da configuração (sem segredos)
pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    let stats = state.directory.stats().await;
    let dispatch = state.bulk_send.config();

    Json(json!({
        "service": "chatbot-crm-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        "integrations": {
            "whatsapp": {
                "base_url": state.settings.whatsapp.base_url,
                "api_version": state.settings.whatsapp.api_version,
                "token_configured": !state.settings.whatsapp.api_token.trim().is_empty(),
                "timeout_seconds": state.settings.whatsapp.timeout_seconds
            },
            "directory": {
                "path": state.directory.source_path().unwrap_or("in-memory"),
                "tenants": stats.tenants,
                "contacts": stats.contacts
            }
        },
        "bulk_send": {
            "max_concurrency": dispatch.max_concurrency,
            "per_contact_timeout_ms": dispatch.per_contact_timeout.as_millis() as u64
        }
    }))
}
