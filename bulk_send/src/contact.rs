//! Entidades lidas pelo motor (cliente, telefone, contato)
//!
//! São mantidas pela camada de CRUD; aqui são apenas lidas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BulkSendError;

macro_rules! opaque_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = BulkSendError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map($name)
                    .map_err(|_| BulkSendError::Validation(format!("invalid {} '{}'", $label, s)))
            }
        }
    };
}

opaque_id!(TenantId, "tenant id");
opaque_id!(PhoneId, "phone id");
opaque_id!(ContactId, "contact id");
opaque_id!(CategoryId, "category id");

/// Cliente (tenant): fronteira de isolamento de todos os dados
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
}

/// Canal de telefone WhatsApp de um cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
    pub tenant_id: TenantId,
    pub display_number: String,
    /// ID do número no provedor (Cloud API `phone_number_id`)
    pub provider_phone_number_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub tenant_id: TenantId,
    pub name: String,
    pub phone_number: String,
    pub active: bool,
    pub vip: bool,
    pub marketing_consent: bool,
    pub preferred_contact_method: Option<String>,
    pub tags: Vec<String>,
    pub category_ids: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Identificação legível usada nas mensagens de erro do lote
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            format!("{} <{}>", self.id, self.phone_number)
        } else {
            format!("{} ({}) <{}>", self.name, self.id, self.phone_number)
        }
    }
}
