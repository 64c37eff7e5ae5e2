//! Diretório de clientes em memória
//!
//! Implementa `ContactStore` e `TemplateCatalog` sobre o snapshot carregado do YAML.
//! `reload` troca o snapshot inteiro de uma vez: disparos em andamento continuam
//! lendo o snapshot antigo até terminar a consulta.

use async_trait::async_trait;
use bulk_send::{
    BulkSendError, BulkSendFilters, Contact, ContactStore, MessageTemplate, Phone, PhoneId,
    TemplateCatalog, Tenant, TenantId,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{DirectoryError, DirectorySnapshot};

pub struct TenantDirectory {
    snapshot: RwLock<Arc<DirectorySnapshot>>,
    source_path: Option<String>,
}

/// Contadores do diretório após carga ou recarga
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub tenants: usize,
    pub contacts: usize,
}

impl TenantDirectory {
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            source_path: None,
        }
    }

    /// Carrega do arquivo e lembra o caminho para `reload`
    pub async fn load(path: &str) -> Result<Self, DirectoryError> {
        let snapshot = DirectorySnapshot::load_from_file(path).await?;
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            source_path: Some(path.to_string()),
        })
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Relê o arquivo de origem; em caso de erro o snapshot atual é mantido
    pub async fn reload(&self) -> Result<DirectoryStats, DirectoryError> {
        let path = self.source_path.as_deref().ok_or_else(|| {
            DirectoryError::Invalid("diretório sem arquivo de origem".to_string())
        })?;

        let fresh = DirectorySnapshot::load_from_file(path).await?;
        let stats = stats_of(&fresh);

        *self.snapshot.write().await = Arc::new(fresh);
        tracing::info!(
            "🔄 Diretório recarregado: {} tenants, {} contatos",
            stats.tenants,
            stats.contacts
        );

        Ok(stats)
    }

    pub async fn stats(&self) -> DirectoryStats {
        let snapshot = self.current().await;
        stats_of(&snapshot)
    }

    async fn current(&self) -> Arc<DirectorySnapshot> {
        self.snapshot.read().await.clone()
    }
}

fn stats_of(snapshot: &DirectorySnapshot) -> DirectoryStats {
    DirectoryStats {
        tenants: snapshot.tenants.len(),
        contacts: snapshot.contact_count(),
    }
}

#[async_trait]
impl ContactStore for TenantDirectory {
    async fn find_tenant(&self, tenant_id: TenantId) -> bulk_send::Result<Option<Tenant>> {
        let snapshot = self.current().await;
        Ok(snapshot.tenants.get(&tenant_id).map(|t| t.tenant.clone()))
    }

    async fn find_phone(
        &self,
        tenant_id: TenantId,
        phone_id: PhoneId,
    ) -> bulk_send::Result<Option<Phone>> {
        let snapshot = self.current().await;
        Ok(snapshot
            .tenants
            .get(&tenant_id)
            .and_then(|t| t.phones.get(&phone_id))
            .cloned())
    }

    async fn find_contacts(
        &self,
        tenant_id: TenantId,
        filters: &BulkSendFilters,
    ) -> bulk_send::Result<Vec<Contact>> {
        let snapshot = self.current().await;
        let tenant = snapshot
            .tenants
            .get(&tenant_id)
            .ok_or_else(|| BulkSendError::not_found(format!("tenant {}", tenant_id)))?;

        let keep = filters.predicate();
        Ok(tenant
            .contacts
            .iter()
            .filter(|c| keep(*c))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TemplateCatalog for TenantDirectory {
    /// Template específico do telefone tem prioridade sobre o template do cliente
    async fn find_template(
        &self,
        tenant_id: TenantId,
        phone_id: PhoneId,
        template_name: &str,
    ) -> bulk_send::Result<Option<MessageTemplate>> {
        let snapshot = self.current().await;
        let Some(tenant) = snapshot.tenants.get(&tenant_id) else {
            return Ok(None);
        };

        let named: Vec<&MessageTemplate> = tenant
            .templates
            .iter()
            .filter(|t| t.name == template_name)
            .collect();

        Ok(named
            .iter()
            .find(|t| t.phone_id == Some(phone_id))
            .or_else(|| named.iter().find(|t| t.phone_id.is_none()))
            .map(|t| MessageTemplate::clone(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_send::TemplateStatus;

    const TENANT_A: &str = "6f1c2a1e-0000-4000-8000-000000000001";
    const TENANT_B: &str = "6f1c2a1e-0000-4000-8000-000000000002";
    const PHONE_A1: &str = "6f1c2a1e-0000-4000-8000-0000000000a1";
    const PHONE_A2: &str = "6f1c2a1e-0000-4000-8000-0000000000a2";
    const PHONE_B1: &str = "6f1c2a1e-0000-4000-8000-0000000000b1";

    fn sample_yaml(extra_contact_name: &str) -> String {
        format!(
            r#"
tenants:
  - id: {TENANT_A}
    name: Acme
    phones:
      - id: {PHONE_A1}
        display_number: "+55 11 4000-0001"
        provider_phone_number_id: "111"
      - id: {PHONE_A2}
        display_number: "+55 11 4000-0002"
        provider_phone_number_id: "112"
    templates:
      - name: promo
        language: pt_BR
        status: APPROVED
      - name: promo
        language: en_US
        status: PAUSED
        phone_id: {PHONE_A2}
    contacts:
      - id: 6f1c2a1e-0000-4000-8000-0000000000f1
        name: Maria
        phone_number: "5511988887777"
        vip: true
        marketing_consent: true
        preferred_contact_method: WHATSAPP
        created_at: 2025-01-10T12:00:00Z
      - id: 6f1c2a1e-0000-4000-8000-0000000000f2
        name: {extra_contact_name}
        phone_number: "5511977776666"
        active: false
        created_at: 2025-01-11T12:00:00Z
  - id: {TENANT_B}
    name: Beta
    phones:
      - id: {PHONE_B1}
        display_number: "+55 21 4000-0000"
        provider_phone_number_id: "221"
    contacts:
      - id: 6f1c2a1e-0000-4000-8000-0000000000f3
        name: Outro
        phone_number: "5521966665555"
        marketing_consent: true
        preferred_contact_method: WHATSAPP
        created_at: 2025-01-09T12:00:00Z
"#
        )
    }

    fn directory() -> TenantDirectory {
        TenantDirectory::new(DirectorySnapshot::parse_yaml(&sample_yaml("João")).unwrap())
    }

    fn id<T: std::str::FromStr>(s: &str) -> T
    where
        T::Err: std::fmt::Debug,
    {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_phone_of_other_tenant_is_not_found() {
        let dir = directory();

        assert!(dir.find_phone(id(TENANT_A), id(PHONE_A1)).await.unwrap().is_some());
        assert!(dir.find_phone(id(TENANT_A), id(PHONE_B1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contacts_are_scoped_to_tenant() {
        let dir = directory();
        let filters = BulkSendFilters {
            only_active: false,
            marketing_consent: None,
            preferred_contact_method: None,
            ..BulkSendFilters::default()
        };

        let contacts = dir.find_contacts(id(TENANT_A), &filters).await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert!(contacts.iter().all(|c| c.tenant_id == id::<TenantId>(TENANT_A)));
    }

    #[tokio::test]
    async fn test_default_filters_are_applied_in_query() {
        let dir = directory();

        let contacts = dir
            .find_contacts(id(TENANT_A), &BulkSendFilters::default())
            .await
            .unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Maria");
    }

    #[tokio::test]
    async fn test_phone_specific_template_takes_precedence() {
        let dir = directory();

        let generic = dir
            .find_template(id(TENANT_A), id(PHONE_A1), "promo")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(generic.status, TemplateStatus::Approved);

        let specific = dir
            .find_template(id(TENANT_A), id(PHONE_A2), "promo")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(specific.status, TemplateStatus::Paused);

        assert!(dir
            .find_template(id(TENANT_B), id(PHONE_B1), "promo")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let path = std::env::temp_dir().join(format!("directory-{}.yaml", uuid::Uuid::new_v4()));
        let path_str = path.to_string_lossy().to_string();

        tokio::fs::write(&path, sample_yaml("João")).await.unwrap();
        let dir = TenantDirectory::load(&path_str).await.unwrap();
        assert_eq!(dir.stats().await, DirectoryStats { tenants: 2, contacts: 3 });

        tokio::fs::write(&path, sample_yaml("João Renomeado")).await.unwrap();
        dir.reload().await.unwrap();

        let filters = BulkSendFilters {
            only_active: false,
            marketing_consent: None,
            preferred_contact_method: None,
            ..BulkSendFilters::default()
        };
        let contacts = dir.find_contacts(id(TENANT_A), &filters).await.unwrap();
        assert!(contacts.iter().any(|c| c.name == "João Renomeado"));

        // Arquivo inválido mantém o snapshot anterior
        tokio::fs::write(&path, "tenants: [").await.unwrap();
        assert!(dir.reload().await.is_err());
        assert_eq!(dir.stats().await.contacts, 3);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_reload_without_source_fails() {
        let dir = directory();
        assert!(matches!(dir.reload().await, Err(DirectoryError::Invalid(_))));
    }
}
