//! Colaboradores externos do motor
//!
//! - `ContactStore`: consulta de clientes, telefones e contatos (somente leitura)
//! - `TemplateCatalog`: busca do template e do seu estado no provedor
//! - `TemplateSender`: envio de um template para UM destino

use async_trait::async_trait;
use thiserror::Error;

use crate::contact::{Contact, ContactId, Phone, PhoneId, Tenant, TenantId};
use crate::error::Result;
use crate::filters::BulkSendFilters;
use crate::template::{MessageTemplate, TemplateParameters};

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn find_tenant(&self, tenant_id: TenantId) -> Result<Option<Tenant>>;

    /// Telefone do cliente; telefone de outro cliente deve retornar `None`
    async fn find_phone(&self, tenant_id: TenantId, phone_id: PhoneId) -> Result<Option<Phone>>;

    /// Contatos do cliente. Implementações podem aplicar os filtros na consulta;
    /// o seletor reaplica todos os predicados sobre o resultado.
    async fn find_contacts(
        &self,
        tenant_id: TenantId,
        filters: &BulkSendFilters,
    ) -> Result<Vec<Contact>>;
}

#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    async fn find_template(
        &self,
        tenant_id: TenantId,
        phone_id: PhoneId,
        template_name: &str,
    ) -> Result<Option<MessageTemplate>>;
}

/// Motivo de falha de um envio individual
#[derive(Debug, Clone, Error)]
pub enum SendFailure {
    /// Provedor recusou a mensagem
    #[error("provider rejected the message: {0}")]
    Rejected(String),

    /// Número de destino inválido
    #[error("invalid destination number: {0}")]
    InvalidDestination(String),

    /// Falha de rede/transporte (possivelmente transitória)
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Um envio individual, já com o número normalizado
#[derive(Debug, Clone)]
pub struct TemplateSendRequest<'a> {
    pub tenant_id: TenantId,
    pub contact_id: ContactId,
    pub phone: &'a Phone,
    pub template: &'a MessageTemplate,
    pub parameters: &'a TemplateParameters,
    /// Somente dígitos
    pub destination: String,
}

#[async_trait]
pub trait TemplateSender: Send + Sync {
    /// Retorna o id da mensagem no provedor
    async fn send_template(
        &self,
        request: &TemplateSendRequest<'_>,
    ) -> std::result::Result<String, SendFailure>;
}
