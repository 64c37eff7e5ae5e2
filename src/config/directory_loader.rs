//! Carregador do diretório de clientes
//!
//! Responsável por carregar clientes, telefones, templates, categorias e contatos
//! de um arquivo YAML (caminho em `directory.path` / `DIRECTORY_PATH`).

use bulk_send::{
    validate_template_name, CategoryId, Contact, ContactId, MessageTemplate, Phone, PhoneId, Tenant,
    TenantId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Erro ao ler arquivo {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML inválido: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Diretório inconsistente: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryDocument {
    #[serde(default)]
    pub tenants: Vec<TenantEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantEntry {
    pub id: TenantId,
    pub name: String,
    #[serde(default)]
    pub phones: Vec<PhoneEntry>,
    #[serde(default)]
    pub templates: Vec<MessageTemplate>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub contacts: Vec<ContactEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub id: PhoneId,
    pub display_number: String,
    pub provider_phone_number_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: CategoryId,
    pub name: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEntry {
    pub id: ContactId,
    #[serde(default)]
    pub name: String,
    pub phone_number: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub vip: bool,
    #[serde(default)]
    pub marketing_consent: bool,
    #[serde(default)]
    pub preferred_contact_method: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// Dados de um cliente já validados
#[derive(Debug, Clone)]
pub struct TenantData {
    pub tenant: Tenant,
    pub phones: HashMap<PhoneId, Phone>,
    pub templates: Vec<MessageTemplate>,
    pub categories: HashMap<CategoryId, String>,
    pub contacts: Vec<Contact>,
}

/// Diretório completo, indexado por cliente
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub tenants: HashMap<TenantId, TenantData>,
}

impl DirectorySnapshot {
    /// Carrega do arquivo local
    pub async fn load_from_file(path: &str) -> Result<Self, DirectoryError> {
        tracing::info!("📂 Carregando diretório de clientes de: {}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DirectoryError::Io {
                path: path.to_string(),
                source,
            })?;

        Self::parse_yaml(&content)
    }

    /// Parse do conteúdo YAML
    pub fn parse_yaml(content: &str) -> Result<Self, DirectoryError> {
        let document: DirectoryDocument = serde_yaml::from_str(content)?;
        Self::from_document(document)
    }

    pub fn from_document(document: DirectoryDocument) -> Result<Self, DirectoryError> {
        let mut tenants = HashMap::new();
        let mut phone_ids = HashSet::new();
        let mut contact_ids = HashSet::new();

        for entry in document.tenants {
            let tenant_id = entry.id;

            if tenants.contains_key(&tenant_id) {
                return Err(DirectoryError::Invalid(format!("tenant {} duplicado", tenant_id)));
            }

            let mut phones = HashMap::new();
            for phone in entry.phones {
                if !phone_ids.insert(phone.id) {
                    return Err(DirectoryError::Invalid(format!("phone {} duplicado", phone.id)));
                }
                phones.insert(
                    phone.id,
                    Phone {
                        id: phone.id,
                        tenant_id,
                        display_number: phone.display_number,
                        provider_phone_number_id: phone.provider_phone_number_id,
                    },
                );
            }

            let mut template_keys = HashSet::new();
            for template in &entry.templates {
                validate_template_name(&template.name)
                    .map_err(|e| DirectoryError::Invalid(format!("tenant {}: {}", tenant_id, e)))?;

                if let Some(phone_id) = template.phone_id {
                    if !phones.contains_key(&phone_id) {
                        return Err(DirectoryError::Invalid(format!(
                            "template '{}' referencia phone {} que não pertence ao tenant {}",
                            template.name, phone_id, tenant_id
                        )));
                    }
                }

                if !template_keys.insert((template.name.clone(), template.phone_id)) {
                    return Err(DirectoryError::Invalid(format!(
                        "template '{}' duplicado no tenant {}",
                        template.name, tenant_id
                    )));
                }
            }

            let categories: HashMap<CategoryId, String> = entry
                .categories
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();

            let mut contacts = Vec::with_capacity(entry.contacts.len());
            for contact in entry.contacts {
                if !contact_ids.insert(contact.id) {
                    return Err(DirectoryError::Invalid(format!("contato {} duplicado", contact.id)));
                }

                if let Some(unknown) = contact.category_ids.iter().find(|id| !categories.contains_key(*id)) {
                    return Err(DirectoryError::Invalid(format!(
                        "contato {} referencia categoria {} fora do tenant {}",
                        contact.id, unknown, tenant_id
                    )));
                }

                contacts.push(Contact {
                    id: contact.id,
                    tenant_id,
                    name: contact.name,
                    phone_number: contact.phone_number,
                    active: contact.active,
                    vip: contact.vip,
                    marketing_consent: contact.marketing_consent,
                    preferred_contact_method: contact.preferred_contact_method,
                    tags: contact.tags,
                    category_ids: contact.category_ids,
                    created_at: contact.created_at,
                });
            }

            tenants.insert(
                tenant_id,
                TenantData {
                    tenant: Tenant {
                        id: tenant_id,
                        name: entry.name,
                    },
                    phones,
                    templates: entry.templates,
                    categories,
                    contacts,
                },
            );
        }

        Ok(Self { tenants })
    }

    pub fn contact_count(&self) -> usize {
        self.tenants.values().map(|t| t.contacts.len()).sum()
    }
}
