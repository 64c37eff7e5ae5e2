/// Middleware layer para o Axum router
///
/// - Autenticação das rotas `/api/*` (X-Admin-Key)

pub mod admin_auth;

pub use admin_auth::require_admin_key;
