//! Adaptador `TemplateSender` sobre a WhatsApp Cloud API

use async_trait::async_trait;
use bulk_send::{SendFailure, TemplateParameters, TemplateSendRequest, TemplateSender};
use whatsapp::{TemplateMessage, TemplateParameter, WhatsAppClient, WhatsAppError};

use crate::utils::logging::log_whatsapp_api_error;
use crate::utils::{single_line_summary, MAX_ERROR_DETAIL_BYTES};

/// Códigos da Cloud API que indicam destino inválido ou inalcançável
const INVALID_DESTINATION_CODES: &[i64] = &[
    131021, // destinatário igual ao remetente
    131026, // mensagem não entregável (número sem WhatsApp)
    131030, // número fora da lista permitida
];

pub struct WhatsAppTemplateSender {
    client: WhatsAppClient,
}

impl WhatsAppTemplateSender {
    pub fn new(client: WhatsAppClient) -> Self {
        Self { client }
    }
}

fn to_body_parameters(parameters: &TemplateParameters) -> Vec<TemplateParameter> {
    match parameters {
        TemplateParameters::Positional(values) => values
            .iter()
            .map(|v| TemplateParameter::Positional(v.clone()))
            .collect(),
        TemplateParameters::Named(values) => values
            .iter()
            .map(|(name, value)| TemplateParameter::Named {
                name: name.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

fn to_send_failure(err: WhatsAppError) -> SendFailure {
    match err {
        WhatsAppError::ApiError { code: Some(code), message, .. }
            if INVALID_DESTINATION_CODES.contains(&code) =>
        {
            SendFailure::InvalidDestination(single_line_summary(&message, MAX_ERROR_DETAIL_BYTES))
        }
        err if err.is_rejection() => {
            SendFailure::Rejected(single_line_summary(&err.to_string(), MAX_ERROR_DETAIL_BYTES))
        }
        err => SendFailure::Transport(single_line_summary(&err.to_string(), MAX_ERROR_DETAIL_BYTES)),
    }
}

#[async_trait]
impl TemplateSender for WhatsAppTemplateSender {
    async fn send_template(&self, request: &TemplateSendRequest<'_>) -> Result<String, SendFailure> {
        let message = TemplateMessage::new(
            request.destination.clone(),
            request.template.name.clone(),
            request.template.language.clone(),
        )
        .with_parameters(to_body_parameters(request.parameters));

        let phone_number_id = &request.phone.provider_phone_number_id;

        match self.client.send_template(phone_number_id, &message).await {
            Ok(message_id) => {
                tracing::debug!(
                    "📤 Template '{}' enviado para contato {} (message id {})",
                    request.template.name,
                    request.contact_id,
                    message_id
                );
                Ok(message_id)
            }
            Err(err) => {
                let status = match &err {
                    WhatsAppError::ApiError { status, .. } => Some(*status),
                    _ => None,
                };
                log_whatsapp_api_error(phone_number_id, status, &err.to_string());
                Err(to_send_failure(err))
            }
        }
    }
}
