use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// POST /api/v1/admin/directory/reload
///
/// Arquivo inválido mantém o diretório atual e responde 422.
pub async fn reload_directory(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/api/v1/admin/directory/reload", "POST");

    let stats = state.directory.reload().await.map_err(|e| {
        log_error(&format!("❌ Falha ao recarregar diretório: {}", e));
        AppError::from(e)
    })?;

    log_directory_loaded(
        state.directory.source_path().unwrap_or("in-memory"),
        stats.tenants,
        stats.contacts,
    );

    Ok(Json(json!({
        "success": true,
        "directory": stats,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
