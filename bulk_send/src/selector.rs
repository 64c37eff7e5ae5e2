//! Seleção de contatos de um cliente a partir de um `BulkSendFilters`

use std::collections::HashSet;

use crate::contact::{Contact, Tenant, TenantId};
use crate::error::{BulkSendError, Result};
use crate::filters::BulkSendFilters;
use crate::ports::ContactStore;

pub struct ContactSelector<'a> {
    store: &'a dyn ContactStore,
}

impl<'a> ContactSelector<'a> {
    pub fn new(store: &'a dyn ContactStore) -> Self {
        Self { store }
    }

    /// Retorna os contatos do cliente que passam no filtro, ordenados por
    /// (`created_at`, `id`), sem duplicatas
    ///
    /// Contatos de outro cliente devolvidos pelo store são descartados.
    pub async fn select(&self, tenant_id: TenantId, filters: &BulkSendFilters) -> Result<Vec<Contact>> {
        let tenant = self
            .store
            .find_tenant(tenant_id)
            .await?
            .ok_or_else(|| BulkSendError::not_found(format!("tenant {}", tenant_id)))?;

        self.select_for_tenant(&tenant, filters).await
    }

    /// Igual a `select`, para um cliente já resolvido pelo chamador
    pub async fn select_for_tenant(&self, tenant: &Tenant, filters: &BulkSendFilters) -> Result<Vec<Contact>> {
        let tenant_id = tenant.id;
        let candidates = self.store.find_contacts(tenant_id, filters).await?;
        let fetched = candidates.len();

        let predicate = filters.predicate();
        let mut seen = HashSet::new();
        let mut contacts: Vec<Contact> = candidates
            .into_iter()
            .filter(|contact| {
                if contact.tenant_id != tenant_id {
                    tracing::warn!(
                        "⚠️ Contato {} pertence ao tenant {} e foi descartado da seleção do tenant {}",
                        contact.id,
                        contact.tenant_id,
                        tenant_id
                    );
                    return false;
                }
                true
            })
            .filter(|contact| predicate(contact))
            .filter(|contact| seen.insert(contact.id))
            .collect();

        contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        tracing::debug!(
            "🔍 Tenant {}: {} contatos selecionados de {} candidatos",
            tenant_id,
            contacts.len(),
            fetched
        );

        Ok(contacts)
    }
}
