//! Bulk Send: disparo de um template para todos os contatos de um cliente que passam num filtro
//!
//! Fluxo de uma invocação (`SendBulkTemplate::handle`):
//!   1. Validação do comando (ids, nome do template, parâmetros, filtros)
//!   2. Pré-condições: cliente existe, telefone pertence ao cliente, template APPROVED
//!   3. Seleção: contatos do cliente que passam no `BulkSendFilters` (ordem estável)
//!   4. Envio: uma tentativa por contato, falhas isoladas (erro, timeout ou panic)
//!   5. Agregação: `BulkSendResult` com contadores, erros e timestamps
//!
//! Exemplo:
//! ```text
//! forVipContacts() -> 3 contatos -> [ok, falha (número inválido), ok]
//!   -> BulkSendResult { total: 3, sucesso: 2, falha: 1, errors: ["Contact Maria (...): ..."] }
//! ```
//!
//! Falhas nos passos 1 e 2 abortam a chamada inteira antes de qualquer contato ser consultado.
//! Falhas no passo 4 nunca abortam o lote.

pub mod aggregator;
pub mod attempt;
pub mod contact;
pub mod engine;
pub mod error;
pub mod filters;
pub mod normalize;
pub mod ports;
pub mod selector;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{BulkSendResult, ResultAggregator};
pub use attempt::{DispatchContext, SendAttempt, SendOutcome};
pub use contact::{CategoryId, Contact, ContactId, Phone, PhoneId, Tenant, TenantId};
pub use engine::{BulkSendCommand, DispatchConfig, SendBulkTemplate};
pub use error::{BulkSendError, Result};
pub use filters::BulkSendFilters;
pub use ports::{ContactStore, SendFailure, TemplateCatalog, TemplateSendRequest, TemplateSender};
pub use selector::ContactSelector;
pub use template::{validate_template_name, MessageTemplate, ParameterFormat, TemplateParameters, TemplateStatus};
