//! Payloads da Cloud API para mensagens de template

use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateParameter {
    /// `{{1}}`, `{{2}}`... na ordem em que aparecem
    Positional(String),
    /// `{{first_name}}`
    Named { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct TemplateMessage {
    /// Número de destino, apenas dígitos
    pub to: String,
    pub name: String,
    pub language_code: String,
    pub body_parameters: Vec<TemplateParameter>,
}

impl TemplateMessage {
    pub fn new(to: impl Into<String>, name: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            name: name.into(),
            language_code: language_code.into(),
            body_parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<TemplateParameter>) -> Self {
        self.body_parameters = parameters;
        self
    }

    /// Corpo do `POST /{phone_number_id}/messages`
    pub fn to_payload(&self) -> Value {
        let mut template = json!({
            "name": self.name,
            "language": { "code": self.language_code }
        });

        if !self.body_parameters.is_empty() {
            let parameters: Vec<Value> = self
                .body_parameters
                .iter()
                .map(|p| match p {
                    TemplateParameter::Positional(value) => json!({
                        "type": "text",
                        "text": value
                    }),
                    TemplateParameter::Named { name, value } => json!({
                        "type": "text",
                        "parameter_name": name,
                        "text": value
                    }),
                })
                .collect();

            template["components"] = json!([{ "type": "body", "parameters": parameters }]);
        }

        json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": self.to,
            "type": "template",
            "template": template
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_without_parameters_has_no_components() {
        let payload = TemplateMessage::new("5511988887777", "hello_world", "en_US").to_payload();

        assert_eq!(payload["type"], "template");
        assert_eq!(payload["to"], "5511988887777");
        assert_eq!(payload["template"]["language"]["code"], "en_US");
        assert!(payload["template"].get("components").is_none());
    }

    #[test]
    fn test_payload_with_named_parameters() {
        let payload = TemplateMessage::new("5511988887777", "promo", "pt_BR")
            .with_parameters(vec![TemplateParameter::Named {
                name: "first_name".to_string(),
                value: "Maria".to_string(),
            }])
            .to_payload();

        let param = &payload["template"]["components"][0]["parameters"][0];
        assert_eq!(payload["template"]["components"][0]["type"], "body");
        assert_eq!(param["parameter_name"], "first_name");
        assert_eq!(param["text"], "Maria");
    }
}
