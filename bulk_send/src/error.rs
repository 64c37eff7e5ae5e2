//! Tipos de erro do motor de disparo em massa

use thiserror::Error;

use crate::template::TemplateStatus;

/// Erros que abortam uma invocação inteira
///
/// Falhas de envio por contato NÃO aparecem aqui: são registradas no
/// `BulkSendResult` e o lote continua.
#[derive(Debug, Error)]
pub enum BulkSendError {
    /// Entrada malformada (ids, nome de template, parâmetros, filtros)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cliente, telefone ou template inexistente
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Template existe mas não está num estado aceito pelo provedor
    #[error("Template '{name}' is not sendable (status: {status})")]
    TemplateNotSendable { name: String, status: TemplateStatus },

    /// Falha ao consultar o armazenamento de contatos
    #[error("Contact store error: {0}")]
    Store(String),
}

impl BulkSendError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BulkSendError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BulkSendError::NotFound(msg.into())
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, BulkSendError>;
