use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub whatsapp: WhatsAppSettings,
    #[serde(default)]
    pub bulk_send: BulkSendSettings,
    pub directory: DirectorySettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhatsAppSettings {
    pub api_token: String,
    #[serde(default = "default_whatsapp_base_url")]
    pub base_url: String,
    #[serde(default = "default_whatsapp_api_version")]
    pub api_version: String,
    #[serde(default = "default_whatsapp_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BulkSendSettings {
    pub max_concurrency: usize,
    pub per_contact_timeout_seconds: u64,
}

impl Default for BulkSendSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            per_contact_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectorySettings {
    pub path: String,  // YAML com clientes, telefones, templates e contatos
}

fn default_whatsapp_base_url() -> String {
    whatsapp::client::DEFAULT_BASE_URL.to_string()
}

fn default_whatsapp_api_version() -> String {
    whatsapp::client::DEFAULT_API_VERSION.to_string()
}

fn default_whatsapp_timeout() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente específicas
        if let Ok(token) = std::env::var("WHATSAPP_API_TOKEN") {
            builder = builder.set_override("whatsapp.api_token", token)?;
        }
        if let Ok(base_url) = std::env::var("WHATSAPP_BASE_URL") {
            builder = builder.set_override("whatsapp.base_url", base_url)?;
        }
        if let Ok(path) = std::env::var("DIRECTORY_PATH") {
            builder = builder.set_override("directory.path", path)?;
        }

        // CHATBOT_CRM__BULK_SEND__MAX_CONCURRENCY=8
        builder = builder.add_source(Environment::with_prefix("CHATBOT_CRM").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}
