//! Gatilhos HTTP do disparo em massa
//!
//! Três formas de montar os filtros (genérico, VIP e por tags) e um preview
//! que seleciona sem enviar. Todas terminam no mesmo `SendBulkTemplate`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use bulk_send::{
    BulkSendCommand, BulkSendFilters, Contact, ParameterFormat, PhoneId, TemplateParameters, TenantId,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BulkSendRequest {
    pub template_name: String,
    #[serde(default)]
    pub parameters: TemplateParameters,
    #[serde(default)]
    pub parameter_format: Option<ParameterFormat>,
    #[serde(default)]
    pub filters: BulkSendFilters,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VipBulkSendRequest {
    pub template_name: String,
    #[serde(default)]
    pub parameters: TemplateParameters,
    #[serde(default)]
    pub parameter_format: Option<ParameterFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaggedBulkSendRequest {
    pub template_name: String,
    #[serde(default)]
    pub parameters: TemplateParameters,
    #[serde(default)]
    pub parameter_format: Option<ParameterFormat>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewContact {
    pub id: String,
    pub name: String,
    pub phone_number: String,
}

impl From<&Contact> for PreviewContact {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            phone_number: contact.phone_number.clone(),
        }
    }
}

/// Falhas de extração (JSON malformado, `Content-Type` ausente) e de desserialização
/// do tipo alvo viram `AppError::ValidationError`, respondendo no formato JSON padrão
fn parse_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> AppResult<T> {
    let Json(body) = body.map_err(|rejection| {
        let detail = rejection.body_text();
        log_validation_error("body", &detail);
        AppError::ValidationError(format!("Invalid request body: {}", detail))
    })?;

    serde_json::from_value(body).map_err(|e| {
        log_validation_error("body", &e.to_string());
        AppError::ValidationError(format!("Invalid request body: {}", e))
    })
}

fn parse_ids(tenant_id: &str, phone_id: &str) -> AppResult<(TenantId, PhoneId)> {
    let tenant_id = tenant_id.parse::<TenantId>()?;
    let phone_id = phone_id.parse::<PhoneId>()?;
    Ok((tenant_id, phone_id))
}

async fn run(state: &AppState, command: BulkSendCommand, trigger: &str) -> AppResult<Json<Value>> {
    let start_time = Instant::now();
    let endpoint = format!(
        "/api/v1/clients/{}/phones/{}/bulk-send",
        command.tenant_id, command.phone_id
    );
    let template_name = command.template_name.clone();

    log_bulk_send_started(
        &command.tenant_id.to_string(),
        &command.phone_id.to_string(),
        &template_name,
        trigger,
    );

    let result = match state.bulk_send.handle(command).await {
        Ok(result) => result,
        Err(e) => {
            log_bulk_send_rejected(&template_name, &e.to_string());
            return Err(e.into());
        }
    };

    log_bulk_send_completed(
        &template_name,
        result.total_contacts,
        result.successful_sends,
        result.failed_sends,
    );
    log_request_processed(&endpoint, 200, start_time.elapsed().as_millis() as u64);

    Ok(Json(json!({
        "success": true,
        "result": result,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// POST /api/v1/clients/:tenant_id/phones/:phone_id/bulk-send
pub async fn bulk_send(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, phone_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send", "POST");

    let (tenant_id, phone_id) = parse_ids(&tenant_id, &phone_id)?;
    let request: BulkSendRequest = parse_body(body)?;

    let command = BulkSendCommand {
        tenant_id,
        phone_id,
        template_name: request.template_name,
        parameters: request.parameters,
        parameter_format: request.parameter_format,
        filters: request.filters,
    };

    run(&state, command, "generic").await
}

/// POST /api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/vip
pub async fn bulk_send_vip(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, phone_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/vip", "POST");

    let (tenant_id, phone_id) = parse_ids(&tenant_id, &phone_id)?;
    let request: VipBulkSendRequest = parse_body(body)?;

    let command = BulkSendCommand {
        tenant_id,
        phone_id,
        template_name: request.template_name,
        parameters: request.parameters,
        parameter_format: request.parameter_format,
        filters: BulkSendFilters::for_vip_contacts(),
    };

    run(&state, command, "vip").await
}

/// POST /api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/tagged
pub async fn bulk_send_tagged(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, phone_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/tagged", "POST");

    let (tenant_id, phone_id) = parse_ids(&tenant_id, &phone_id)?;
    let request: TaggedBulkSendRequest = parse_body(body)?;
    let filters = BulkSendFilters::for_tagged_contacts(request.tag_names)?;

    let command = BulkSendCommand {
        tenant_id,
        phone_id,
        template_name: request.template_name,
        parameters: request.parameters,
        parameter_format: request.parameter_format,
        filters,
    };

    run(&state, command, "tagged").await
}

/// POST /api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/preview
///
/// Mesma validação do disparo genérico; nada é enviado.
pub async fn bulk_send_preview(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, phone_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/v1/clients/:tenant_id/phones/:phone_id/bulk-send/preview", "POST");

    let (tenant_id, phone_id) = parse_ids(&tenant_id, &phone_id)?;
    let request: BulkSendRequest = parse_body(body)?;

    let command = BulkSendCommand {
        tenant_id,
        phone_id,
        template_name: request.template_name,
        parameters: request.parameters,
        parameter_format: request.parameter_format,
        filters: request.filters,
    };

    let contacts = state.bulk_send.preview(&command).await?;
    let preview: Vec<PreviewContact> = contacts.iter().map(PreviewContact::from).collect();

    log_info(&format!(
        "👀 Preview '{}': {} contatos seriam atingidos",
        command.template_name,
        preview.len()
    ));

    Ok(Json(json!({
        "success": true,
        "totalContacts": preview.len(),
        "contacts": preview,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
