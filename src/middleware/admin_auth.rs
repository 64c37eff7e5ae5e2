/// Autenticação das rotas `/api/*` via header X-Admin-Key
///
/// Disparos em massa falam com clientes reais; a rota só roda com a chave
/// configurada em `ADMIN_API_KEY`.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Resultado da verificação da chave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    Granted,
    /// Sem chave configurada fora de produção
    GrantedUnconfigured,
    Denied,
    /// Sem chave configurada em produção
    Unavailable,
}

pub fn check_admin_key(
    expected_key: Option<&str>,
    provided_key: Option<&str>,
    is_production: bool,
) -> AdminAccess {
    match (expected_key.filter(|k| !k.is_empty()), provided_key, is_production) {
        (Some(expected), Some(provided), _) if expected == provided => AdminAccess::Granted,
        (Some(_), _, _) => AdminAccess::Denied,
        (None, _, false) => AdminAccess::GrantedUnconfigured,
        (None, _, true) => AdminAccess::Unavailable,
    }
}

/// Middleware para `/api/*`
///
/// ```bash
/// curl -X POST -H "X-Admin-Key: $ADMIN_API_KEY" -H "Content-Type: application/json" \
///   -d '{"templateName": "promo_outubro", "parameters": ["Maria"]}' \
///   http://localhost:8080/api/v1/clients/<tenant>/phones/<phone>/bulk-send/vip
/// ```
///
/// - 401: chave ausente ou inválida
/// - 503: `ADMIN_API_KEY` não configurada com `RUST_ENV=production`
pub async fn require_admin_key(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided_key = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let expected_key = std::env::var("ADMIN_API_KEY").ok();

    let is_production = std::env::var("RUST_ENV")
        .unwrap_or_else(|_| "development".to_string())
        == "production";

    match check_admin_key(expected_key.as_deref(), provided_key, is_production) {
        AdminAccess::Granted => {
            tracing::debug!("✅ Admin access granted");
            Ok(next.run(request).await)
        }
        AdminAccess::GrantedUnconfigured => {
            tracing::warn!(
                "⚠️  ADMIN_API_KEY not configured - Allowing access in development mode. \
                 Configure ADMIN_API_KEY in production!"
            );
            Ok(next.run(request).await)
        }
        AdminAccess::Denied => {
            tracing::warn!(
                "❌ Admin access denied to {} - Invalid or missing X-Admin-Key: {:?}",
                request.uri().path(),
                provided_key.map(|_| "<redacted>")
            );
            Err(unauthorized_response())
        }
        AdminAccess::Unavailable => {
            tracing::error!("🚨 ADMIN_API_KEY not configured in production! Blocking /api access.");
            Err(service_unavailable_response())
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized",
            "message": "Missing or invalid X-Admin-Key header",
            "status": 401
        })),
    )
        .into_response()
}

fn service_unavailable_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Service Unavailable",
            "message": "ADMIN_API_KEY not configured on server",
            "status": 503
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_key_is_granted() {
        assert_eq!(check_admin_key(Some("k1"), Some("k1"), true), AdminAccess::Granted);
    }

    #[test]
    fn test_wrong_or_missing_key_is_denied() {
        assert_eq!(check_admin_key(Some("k1"), Some("k2"), false), AdminAccess::Denied);
        assert_eq!(check_admin_key(Some("k1"), None, false), AdminAccess::Denied);
    }

    #[test]
    fn test_unconfigured_key_depends_on_environment() {
        assert_eq!(check_admin_key(None, None, false), AdminAccess::GrantedUnconfigured);
        assert_eq!(check_admin_key(Some(""), Some("x"), false), AdminAccess::GrantedUnconfigured);
        assert_eq!(check_admin_key(None, Some("x"), true), AdminAccess::Unavailable);
    }
}
