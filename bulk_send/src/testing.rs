//! Fakes em memória para os testes do crate

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::contact::{CategoryId, Contact, ContactId, Phone, PhoneId, Tenant, TenantId};
use crate::error::Result;
use crate::filters::BulkSendFilters;
use crate::ports::{ContactStore, SendFailure, TemplateCatalog, TemplateSendRequest, TemplateSender};
use crate::template::{MessageTemplate, TemplateStatus};

static CREATION_SEQ: AtomicI64 = AtomicI64::new(0);

fn next_created_at() -> DateTime<Utc> {
    let seq = CREATION_SEQ.fetch_add(1, Ordering::SeqCst);
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq)
}

pub struct ContactBuilder {
    contact: Contact,
}

impl ContactBuilder {
    pub fn new(tenant_id: TenantId) -> Self {
        let seq = CREATION_SEQ.load(Ordering::SeqCst);
        Self {
            contact: Contact {
                id: ContactId::new(),
                tenant_id,
                name: format!("Contato {}", seq),
                phone_number: format!("+55 11 9{:08}", seq.rem_euclid(100_000_000)),
                active: true,
                vip: false,
                marketing_consent: true,
                preferred_contact_method: Some("WHATSAPP".to_string()),
                tags: Vec::new(),
                category_ids: Vec::new(),
                created_at: next_created_at(),
            },
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.contact.active = active;
        self
    }

    pub fn vip(mut self, vip: bool) -> Self {
        self.contact.vip = vip;
        self
    }

    pub fn consent(mut self, consent: bool) -> Self {
        self.contact.marketing_consent = consent;
        self
    }

    pub fn method(mut self, method: Option<&str>) -> Self {
        self.contact.preferred_contact_method = method.map(str::to_string);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.contact.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn categories(mut self, ids: &[CategoryId]) -> Self {
        self.contact.category_ids = ids.to_vec();
        self
    }

    pub fn phone_number(mut self, number: &str) -> Self {
        self.contact.phone_number = number.to_string();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.contact.created_at = at;
        self
    }

    pub fn build(self) -> Contact {
        self.contact
    }
}

#[derive(Default)]
struct StoreData {
    tenants: HashMap<TenantId, Tenant>,
    phones: HashMap<PhoneId, Phone>,
    templates: Vec<(TenantId, MessageTemplate)>,
    contacts: Vec<Contact>,
}

/// Store em memória; `leaking_tenants` simula uma consulta sem escopo de tenant
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
    leak: bool,
    pub contact_queries: AtomicUsize,
    pub tenant_queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaking_tenants(mut self) -> Self {
        self.leak = true;
        self
    }

    pub fn add_tenant(&self, name: &str) -> TenantId {
        let id = TenantId::new();
        self.data.lock().unwrap().tenants.insert(
            id,
            Tenant {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn add_phone(&self, tenant_id: TenantId) -> PhoneId {
        let id = PhoneId::new();
        self.data.lock().unwrap().phones.insert(
            id,
            Phone {
                id,
                tenant_id,
                display_number: "+55 11 4000-0000".to_string(),
                provider_phone_number_id: format!("pn-{}", id),
            },
        );
        id
    }

    pub fn add_template(&self, tenant_id: TenantId, name: &str, status: TemplateStatus) {
        self.data.lock().unwrap().templates.push((
            tenant_id,
            MessageTemplate {
                name: name.to_string(),
                language: "pt_BR".to_string(),
                status,
                phone_id: None,
                parameter_count: None,
            },
        ));
    }

    pub fn add_template_with_params(&self, tenant_id: TenantId, name: &str, count: usize) {
        self.data.lock().unwrap().templates.push((
            tenant_id,
            MessageTemplate {
                name: name.to_string(),
                language: "pt_BR".to_string(),
                status: TemplateStatus::Approved,
                phone_id: None,
                parameter_count: Some(count),
            },
        ));
    }

    pub fn add_contact(&self, contact: Contact) {
        self.data.lock().unwrap().contacts.push(contact);
    }

    pub fn contact_query_count(&self) -> usize {
        self.contact_queries.load(Ordering::SeqCst)
    }

    pub fn tenant_query_count(&self) -> usize {
        self.tenant_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn find_tenant(&self, tenant_id: TenantId) -> Result<Option<Tenant>> {
        self.tenant_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.lock().unwrap().tenants.get(&tenant_id).cloned())
    }

    async fn find_phone(&self, tenant_id: TenantId, phone_id: PhoneId) -> Result<Option<Phone>> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .phones
            .get(&phone_id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_contacts(&self, tenant_id: TenantId, _filters: &BulkSendFilters) -> Result<Vec<Contact>> {
        self.contact_queries.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();
        Ok(data
            .contacts
            .iter()
            .filter(|c| self.leak || c.tenant_id == tenant_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TemplateCatalog for InMemoryStore {
    async fn find_template(
        &self,
        tenant_id: TenantId,
        phone_id: PhoneId,
        template_name: &str,
    ) -> Result<Option<MessageTemplate>> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .templates
            .iter()
            .find(|(tenant, t)| {
                *tenant == tenant_id
                    && t.name == template_name
                    && t.phone_id.map_or(true, |p| p == phone_id)
            })
            .map(|(_, t)| t.clone()))
    }
}

/// Comportamento do sender para um contato específico
#[derive(Clone)]
pub enum Behavior {
    Fail(SendFailure),
    Panic,
    Hang,
}

/// Sender que registra a ordem das tentativas
#[derive(Default)]
pub struct RecordingSender {
    behaviors: Mutex<HashMap<ContactId, Behavior>>,
    attempted: Mutex<Vec<ContactId>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub delay_ms: u64,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    pub fn on(&self, contact_id: ContactId, behavior: Behavior) {
        self.behaviors.lock().unwrap().insert(contact_id, behavior);
    }

    pub fn attempted(&self) -> Vec<ContactId> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn attempted_set(&self) -> HashSet<ContactId> {
        self.attempted().into_iter().collect()
    }
}

#[async_trait]
impl TemplateSender for RecordingSender {
    async fn send_template(
        &self,
        request: &TemplateSendRequest<'_>,
    ) -> std::result::Result<String, SendFailure> {
        self.attempted.lock().unwrap().push(request.contact_id);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        let behavior = self.behaviors.lock().unwrap().get(&request.contact_id).cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match behavior {
            None => Ok(format!("wamid.{}", request.contact_id)),
            Some(Behavior::Fail(failure)) => Err(failure),
            Some(Behavior::Panic) => panic!("sender exploded for {}", request.contact_id),
            Some(Behavior::Hang) => std::future::pending().await,
        }
    }
}
