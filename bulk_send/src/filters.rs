//! Especificação de filtro do disparo em massa
//!
//! AND entre dimensões, OR dentro de uma dimensão multi-valorada (tags, categorias).
//! Campo opcional ausente (`None`) não impõe restrição.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::contact::{CategoryId, Contact};
use crate::error::{BulkSendError, Result};
use crate::normalize::normalize_tag;

pub const DEFAULT_CONTACT_METHOD: &str = "WHATSAPP";

fn default_only_active() -> bool {
    true
}

fn default_preferred_contact_method() -> Option<String> {
    Some(DEFAULT_CONTACT_METHOD.to_string())
}

fn default_marketing_consent() -> Option<bool> {
    Some(true)
}

/// Filtros de seleção de contatos
///
/// Na desserialização, campo ausente recebe o default e `null` explícito
/// remove a restrição (`"marketingConsent": null` = sem filtro de consentimento).
/// Chave desconhecida é rejeitada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BulkSendFilters {
    #[serde(default = "default_only_active")]
    pub only_active: bool,
    #[serde(default)]
    pub only_vip: Option<bool>,
    #[serde(default)]
    pub tag_names: Option<BTreeSet<String>>,
    #[serde(default)]
    pub category_ids: Option<BTreeSet<CategoryId>>,
    #[serde(default = "default_preferred_contact_method")]
    pub preferred_contact_method: Option<String>,
    #[serde(default = "default_marketing_consent")]
    pub marketing_consent: Option<bool>,
}

impl Default for BulkSendFilters {
    fn default() -> Self {
        Self {
            only_active: default_only_active(),
            only_vip: None,
            tag_names: None,
            category_ids: None,
            preferred_contact_method: default_preferred_contact_method(),
            marketing_consent: default_marketing_consent(),
        }
    }
}

impl BulkSendFilters {
    /// Contatos VIP ativos com consentimento de marketing
    pub fn for_vip_contacts() -> Self {
        Self {
            only_active: true,
            only_vip: Some(true),
            tag_names: None,
            category_ids: None,
            preferred_contact_method: None,
            marketing_consent: Some(true),
        }
    }

    /// Contatos ativos com consentimento que tenham pelo menos uma das tags
    pub fn for_tagged_contacts<I, S>(tag_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: BTreeSet<String> = tag_names
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.trim().is_empty())
            .collect();

        if tags.is_empty() {
            return Err(BulkSendError::validation(
                "tagNames must contain at least one tag",
            ));
        }

        Ok(Self {
            only_active: true,
            only_vip: None,
            tag_names: Some(tags),
            category_ids: None,
            preferred_contact_method: None,
            marketing_consent: Some(true),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(tags) = &self.tag_names {
            if tags.iter().any(|t| normalize_tag(t).is_empty()) {
                return Err(BulkSendError::validation("tagNames contains a blank tag"));
            }
        }

        if let Some(method) = &self.preferred_contact_method {
            if method.trim().is_empty() {
                return Err(BulkSendError::validation(
                    "preferredContactMethod must not be blank",
                ));
            }
        }

        Ok(())
    }

    /// Compila o filtro num predicado; as tags são normalizadas uma única vez
    pub fn predicate(&self) -> impl Fn(&Contact) -> bool + '_ {
        let wanted_tags: Option<HashSet<String>> = self
            .tag_names
            .as_ref()
            .filter(|tags| !tags.is_empty())
            .map(|tags| tags.iter().map(|t| normalize_tag(t)).collect());

        let wanted_categories = self.category_ids.as_ref().filter(|ids| !ids.is_empty());

        move |contact: &Contact| {
            if self.only_active && !contact.active {
                return false;
            }

            if let Some(vip) = self.only_vip {
                if contact.vip != vip {
                    return false;
                }
            }

            if let Some(wanted) = &wanted_tags {
                let has_tag = contact
                    .tags
                    .iter()
                    .any(|tag| wanted.contains(&normalize_tag(tag)));
                if !has_tag {
                    return false;
                }
            }

            if let Some(wanted) = wanted_categories {
                if !contact.category_ids.iter().any(|id| wanted.contains(id)) {
                    return false;
                }
            }

            if let Some(method) = &self.preferred_contact_method {
                let matches = contact
                    .preferred_contact_method
                    .as_deref()
                    .map(|m| m.trim().eq_ignore_ascii_case(method.trim()))
                    .unwrap_or(false);
                if !matches {
                    return false;
                }
            }

            if let Some(consent) = self.marketing_consent {
                if contact.marketing_consent != consent {
                    return false;
                }
            }

            true
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        (self.predicate())(contact)
    }
}
