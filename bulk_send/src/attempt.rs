//! Tentativa de envio para um único contato, com falha isolada

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::contact::{Contact, ContactId, Phone, TenantId};
use crate::normalize::normalize_phone_number;
use crate::ports::{SendFailure, TemplateSendRequest, TemplateSender};
use crate::template::{MessageTemplate, TemplateParameters};

/// Dados invariantes do lote, resolvidos antes da primeira tentativa
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub tenant_id: TenantId,
    pub phone: Phone,
    pub template: MessageTemplate,
    pub parameters: TemplateParameters,
}

/// Resultado de uma tentativa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub contact_id: ContactId,
    pub success: bool,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn succeeded(contact_id: ContactId) -> Self {
        Self {
            contact_id,
            success: true,
            error: None,
        }
    }

    pub fn failed(contact_id: ContactId, error: impl Into<String>) -> Self {
        Self {
            contact_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Clone)]
pub struct SendAttempt {
    sender: Arc<dyn TemplateSender>,
    timeout: Duration,
}

impl SendAttempt {
    pub fn new(sender: Arc<dyn TemplateSender>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    /// Nunca falha: erro, timeout ou panic do sender viram `SendOutcome::failed`
    pub async fn attempt(&self, ctx: &DispatchContext, contact: &Contact) -> SendOutcome {
        let destination = match normalize_phone_number(&contact.phone_number) {
            Some(number) => number,
            None => {
                let failure = SendFailure::InvalidDestination(format!("'{}'", contact.phone_number));
                return self.record_failure(contact, failure.to_string());
            }
        };

        let request = TemplateSendRequest {
            tenant_id: ctx.tenant_id,
            contact_id: contact.id,
            phone: &ctx.phone,
            template: &ctx.template,
            parameters: &ctx.parameters,
            destination,
        };

        let send = AssertUnwindSafe(self.sender.send_template(&request)).catch_unwind();

        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(Ok(message_id))) => {
                tracing::debug!(
                    "📤 Template '{}' enviado para contato {} (message_id: {})",
                    ctx.template.name,
                    contact.id,
                    message_id
                );
                SendOutcome::succeeded(contact.id)
            }
            Ok(Ok(Err(failure))) => self.record_failure(contact, failure.to_string()),
            Ok(Err(panic)) => self.record_failure(
                contact,
                format!("unexpected error: {}", panic_message(panic.as_ref())),
            ),
            Err(_) => self.record_failure(
                contact,
                format!("timed out after {}ms", self.timeout.as_millis()),
            ),
        }
    }

    fn record_failure(&self, contact: &Contact, cause: String) -> SendOutcome {
        let message = format!("Contact {}: {}", contact.label(), cause);
        tracing::warn!("❌ {}", message);
        SendOutcome::failed(contact.id, message)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
