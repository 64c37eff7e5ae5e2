//! `SendBulkTemplate`: seleciona contatos e dispara um template para cada um
//!
//! Estados de uma invocação: selecionando -> enviando -> agregado.
//! Não há retry: reenviar o mesmo filtro reenvia para todos os contatos.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::{BulkSendResult, ResultAggregator};
use crate::attempt::{DispatchContext, SendAttempt, SendOutcome};
use crate::contact::{Contact, PhoneId, Tenant, TenantId};
use crate::error::{BulkSendError, Result};
use crate::filters::BulkSendFilters;
use crate::ports::{ContactStore, TemplateCatalog, TemplateSender};
use crate::selector::ContactSelector;
use crate::template::{validate_template_name, ParameterFormat, TemplateParameters};

/// Configuração do disparo
const DEFAULT_MAX_CONCURRENCY: usize = 4;
const DEFAULT_PER_CONTACT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Envios simultâneos; 1 = sequencial
    pub max_concurrency: usize,
    pub per_contact_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            per_contact_timeout: Duration::from_secs(DEFAULT_PER_CONTACT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BulkSendCommand {
    pub tenant_id: TenantId,
    pub phone_id: PhoneId,
    pub template_name: String,
    pub parameters: TemplateParameters,
    pub parameter_format: Option<ParameterFormat>,
    pub filters: BulkSendFilters,
}

pub struct SendBulkTemplate {
    store: Arc<dyn ContactStore>,
    catalog: Arc<dyn TemplateCatalog>,
    sender: Arc<dyn TemplateSender>,
    config: DispatchConfig,
}

impl SendBulkTemplate {
    pub fn new(
        store: Arc<dyn ContactStore>,
        catalog: Arc<dyn TemplateCatalog>,
        sender: Arc<dyn TemplateSender>,
    ) -> Self {
        Self {
            store,
            catalog,
            sender,
            config: DispatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Executa o lote completo
    ///
    /// Erros de validação e pré-condição retornam `Err` antes de qualquer
    /// contato ser consultado. Depois disso, sempre retorna um resultado completo.
    pub async fn handle(&self, command: BulkSendCommand) -> Result<BulkSendResult> {
        let (tenant, ctx) = self.prepare(&command).await?;

        let contacts = ContactSelector::new(self.store.as_ref())
            .select_for_tenant(&tenant, &command.filters)
            .await?;

        tracing::info!(
            "🚀 Disparo '{}' (tenant {}, phone {}): {} contatos selecionados",
            ctx.template.name,
            ctx.tenant_id,
            ctx.phone.id,
            contacts.len()
        );

        let result = self.dispatch(&ctx, &contacts).await;

        tracing::info!(
            "✅ Disparo '{}' concluído: {}/{} enviados, {} falhas",
            ctx.template.name,
            result.successful_sends,
            result.total_contacts,
            result.failed_sends
        );

        Ok(result)
    }

    /// Mesma validação e seleção de `handle`, sem enviar nada
    pub async fn preview(&self, command: &BulkSendCommand) -> Result<Vec<Contact>> {
        let (tenant, _) = self.prepare(command).await?;

        ContactSelector::new(self.store.as_ref())
            .select_for_tenant(&tenant, &command.filters)
            .await
    }

    /// Validação + pré-condições invariantes do lote (checadas uma única vez)
    ///
    /// O cliente resolvido aqui é o mesmo usado na seleção.
    async fn prepare(&self, command: &BulkSendCommand) -> Result<(Tenant, DispatchContext)> {
        validate_template_name(&command.template_name)?;
        command.filters.validate()?;
        command.parameters.validate(command.parameter_format)?;

        let tenant = self
            .store
            .find_tenant(command.tenant_id)
            .await?
            .ok_or_else(|| BulkSendError::not_found(format!("tenant {}", command.tenant_id)))?;

        let phone = self
            .store
            .find_phone(tenant.id, command.phone_id)
            .await?
            .ok_or_else(|| {
                BulkSendError::not_found(format!(
                    "phone {} for tenant {}",
                    command.phone_id, tenant.id
                ))
            })?;

        let template = self
            .catalog
            .find_template(tenant.id, phone.id, &command.template_name)
            .await?
            .ok_or_else(|| {
                BulkSendError::not_found(format!(
                    "template '{}' for phone {}",
                    command.template_name, phone.id
                ))
            })?;

        if !template.status.is_sendable() {
            tracing::warn!(
                "⛔ Template '{}' com status {} - disparo recusado",
                template.name,
                template.status
            );
            return Err(BulkSendError::TemplateNotSendable {
                name: template.name,
                status: template.status,
            });
        }

        if let Some(expected) = template.parameter_count {
            if expected != command.parameters.len() {
                return Err(BulkSendError::validation(format!(
                    "template '{}' expects {} parameters, got {}",
                    template.name,
                    expected,
                    command.parameters.len()
                )));
            }
        }

        let ctx = DispatchContext {
            tenant_id: tenant.id,
            phone,
            template,
            parameters: command.parameters.clone(),
        };

        Ok((tenant, ctx))
    }

    /// `buffered` mantém a ordem de submissão mesmo com envios simultâneos
    async fn dispatch(&self, ctx: &DispatchContext, contacts: &[Contact]) -> BulkSendResult {
        let attempt = SendAttempt::new(Arc::clone(&self.sender), self.config.per_contact_timeout);
        let aggregator = ResultAggregator::start();

        // Futures montados fora do stream; `handle` precisa continuar `Send`
        let pending: Vec<_> = contacts
            .iter()
            .map(|contact| attempt.attempt(ctx, contact))
            .collect();

        let outcomes: Vec<SendOutcome> = stream::iter(pending)
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        aggregator.aggregate(outcomes)
    }
}
