//! Cliente da WhatsApp Cloud API
//!
//! Escopo restrito ao que o middleware usa: envio de mensagens de template
//! com parâmetros de corpo posicionais ou nomeados.
//!
//! ```rust,ignore
//! use whatsapp::{TemplateMessage, TemplateParameter, WhatsAppClient};
//!
//! let client = WhatsAppClient::new(std::env::var("WHATSAPP_API_TOKEN")?)?;
//! let message = TemplateMessage::new("5511988887777", "promo_outubro", "pt_BR")
//!     .with_parameters(vec![TemplateParameter::Positional("Maria".into())]);
//! let message_id = client.send_template("1098765", &message).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::WhatsAppClient;
pub use error::{Result, WhatsAppError};
pub use types::{TemplateMessage, TemplateParameter};
