//! Tipos de erro do cliente WhatsApp

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// Erro de requisição HTTP (rede, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro retornado pela Cloud API (status não-2xx)
    #[error("WhatsApp API error (status {status}): {message}")]
    ApiError {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Resposta 2xx sem o id da mensagem
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WhatsAppError {
    /// Erros 4xx: a mensagem foi recusada e repetir não adianta
    pub fn is_rejection(&self) -> bool {
        matches!(self, WhatsAppError::ApiError { status, .. } if (400..500).contains(status))
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, WhatsAppError>;
