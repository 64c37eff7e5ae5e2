//! Templates de mensagem: ciclo de vida, formato de parâmetros e validação de nome

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::contact::PhoneId;
use crate::error::{BulkSendError, Result};

/// Tamanho máximo de nome de template aceito pelo provedor
pub const MAX_TEMPLATE_NAME_LEN: usize = 512;

/// Estado do template no ciclo de vida do provedor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Paused,
    Disabled,
}

impl TemplateStatus {
    /// Apenas templates aprovados são aceitos para disparo
    pub fn is_sendable(self) -> bool {
        matches!(self, TemplateStatus::Approved)
    }
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplateStatus::Draft => "DRAFT",
            TemplateStatus::Pending => "PENDING",
            TemplateStatus::Approved => "APPROVED",
            TemplateStatus::Rejected => "REJECTED",
            TemplateStatus::Paused => "PAUSED",
            TemplateStatus::Disabled => "DISABLED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterFormat {
    #[default]
    Positional,
    Named,
}

/// Template registrado para um cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub name: String,
    pub language: String,
    pub status: TemplateStatus,
    /// `None` = disponível para todos os telefones do cliente
    #[serde(default)]
    pub phone_id: Option<PhoneId>,
    /// Quantidade de placeholders declarada; `None` = não verificada
    #[serde(default)]
    pub parameter_count: Option<usize>,
}

/// Valores dos placeholders do template
///
/// JSON array → posicional (`{{1}}`, `{{2}}`...), JSON object → nomeado (`{{first_name}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateParameters {
    Positional(Vec<String>),
    Named(BTreeMap<String, String>),
}

impl Default for TemplateParameters {
    fn default() -> Self {
        TemplateParameters::Positional(Vec::new())
    }
}

impl TemplateParameters {
    pub fn len(&self) -> usize {
        match self {
            TemplateParameters::Positional(values) => values.len(),
            TemplateParameters::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> ParameterFormat {
        match self {
            TemplateParameters::Positional(_) => ParameterFormat::Positional,
            TemplateParameters::Named(_) => ParameterFormat::Named,
        }
    }

    /// Valida os valores e a coerência com o formato declarado na requisição
    ///
    /// Lista vazia é compatível com qualquer formato.
    pub fn validate(&self, declared: Option<ParameterFormat>) -> Result<ParameterFormat> {
        if let Some(declared) = declared {
            if !self.is_empty() && declared != self.format() {
                return Err(BulkSendError::validation(format!(
                    "parameterFormat {:?} does not match the parameters shape ({:?})",
                    declared,
                    self.format()
                )));
            }
        }

        match self {
            TemplateParameters::Positional(values) => {
                if let Some(idx) = values.iter().position(|v| v.trim().is_empty()) {
                    return Err(BulkSendError::validation(format!(
                        "parameter {} is empty",
                        idx + 1
                    )));
                }
            }
            TemplateParameters::Named(values) => {
                for (name, value) in values {
                    if !is_identifier(name) {
                        return Err(BulkSendError::validation(format!(
                            "invalid parameter name '{}' (expected [a-z0-9_]+)",
                            name
                        )));
                    }
                    if value.trim().is_empty() {
                        return Err(BulkSendError::validation(format!(
                            "parameter '{}' is empty",
                            name
                        )));
                    }
                }
            }
        }

        Ok(declared.unwrap_or_else(|| self.format()))
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Nome de template: 1..=512 caracteres em `[a-z0-9_]`
pub fn validate_template_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BulkSendError::validation("templateName is required"));
    }
    if name.len() > MAX_TEMPLATE_NAME_LEN {
        return Err(BulkSendError::validation(format!(
            "templateName longer than {} characters",
            MAX_TEMPLATE_NAME_LEN
        )));
    }
    if !is_identifier(name) {
        return Err(BulkSendError::validation(format!(
            "invalid templateName '{}' (expected [a-z0-9_]+)",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_approved_is_sendable() {
        assert!(TemplateStatus::Approved.is_sendable());
        for status in [
            TemplateStatus::Draft,
            TemplateStatus::Pending,
            TemplateStatus::Rejected,
            TemplateStatus::Paused,
            TemplateStatus::Disabled,
        ] {
            assert!(!status.is_sendable(), "{} não deveria ser enviável", status);
        }
    }

    #[test]
    fn test_parameters_shape_from_json() {
        let positional: TemplateParameters = serde_json::from_value(json!(["Maria", "10%"])).unwrap();
        assert_eq!(positional.format(), ParameterFormat::Positional);
        assert_eq!(positional.len(), 2);

        let named: TemplateParameters =
            serde_json::from_value(json!({"first_name": "Maria"})).unwrap();
        assert_eq!(named.format(), ParameterFormat::Named);
    }

    #[test]
    fn test_validate_rejects_format_mismatch() {
        let params = TemplateParameters::Positional(vec!["a".to_string()]);
        assert!(params.validate(Some(ParameterFormat::Named)).is_err());
        assert_eq!(params.validate(None).unwrap(), ParameterFormat::Positional);
    }

    #[test]
    fn test_validate_empty_list_accepts_declared_format() {
        let params = TemplateParameters::default();
        assert_eq!(
            params.validate(Some(ParameterFormat::Named)).unwrap(),
            ParameterFormat::Named
        );
    }

    #[test]
    fn test_validate_named_parameter_rules() {
        let mut values = BTreeMap::new();
        values.insert("First Name".to_string(), "Maria".to_string());
        assert!(TemplateParameters::Named(values).validate(None).is_err());

        let mut values = BTreeMap::new();
        values.insert("first_name".to_string(), " ".to_string());
        assert!(TemplateParameters::Named(values).validate(None).is_err());
    }

    #[test]
    fn test_validate_template_name() {
        assert!(validate_template_name("promo_outubro_2025").is_ok());
        assert!(validate_template_name("").is_err());
        assert!(validate_template_name("Promo Outubro").is_err());
        assert!(validate_template_name(&"a".repeat(513)).is_err());
    }
}
