//! Cliente HTTP para a WhatsApp Cloud API

use reqwest::{Client as HttpClient, Response};
use std::time::Duration;

use crate::error::{Result, WhatsAppError};
use crate::types::{ApiErrorEnvelope, SendMessageResponse, TemplateMessage};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v21.0";

#[derive(Clone)]
pub struct WhatsAppClient {
    http_client: HttpClient,
    access_token: String,
    base_url: String,
    api_version: String,
}

impl WhatsAppClient {
    /// Cria um novo cliente com os endpoints padrão
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_options(access_token, DEFAULT_BASE_URL, DEFAULT_API_VERSION, 30, 5)
    }

    /// Cria um novo cliente com endpoint e timeouts customizados
    pub fn with_options(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(WhatsAppError::ConfigError("access token is empty".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| WhatsAppError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            access_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into().trim_matches('/').to_string(),
        })
    }

    /// Envia uma mensagem de template; retorna o id da mensagem (`wamid...`)
    pub async fn send_template(&self, phone_number_id: &str, message: &TemplateMessage) -> Result<String> {
        let url = format!(
            "{}/{}/{}/messages",
            self.base_url, self.api_version, phone_number_id
        );

        tracing::debug!("POST {} (template '{}' → {})", url, message.name, message.to);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&message.to_payload())
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let body: SendMessageResponse = response.json().await?;

        body.messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| WhatsAppError::InvalidResponse("response without messages[0].id".to_string()))
    }

    /// Converte status não-2xx em `WhatsAppError::ApiError`
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, code) = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.message, envelope.error.code),
            Err(_) if body.is_empty() => (status.canonical_reason().unwrap_or("unknown").to_string(), None),
            Err(_) => (body, None),
        };

        tracing::error!(
            "WhatsApp API error: status {} - code {:?} - {}",
            status.as_u16(),
            code,
            message
        );

        Err(WhatsAppError::ApiError {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
