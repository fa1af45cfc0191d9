use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use podwarden_core::{AppError, AppResult};
use podwarden_domain::{AuditCategory, AuditEventType};
use tracing::{debug, info, warn};

use crate::{AuditEvent, AuditLog, RequestContext, StoredAuditEvent};

/// Target of an audited mutation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AuditTarget<'a> {
    pub category: AuditCategory,
    pub event_type: AuditEventType,
    pub namespace: Option<&'a str>,
    pub name: &'a str,
    pub dry_run: bool,
}

/// Writes the audit record ahead of a mutation and runs the mutation after it.
///
/// The audit record is never compensated: a failed mutation leaves its audit
/// row behind as evidence of the attempt.
#[derive(Clone)]
pub(crate) struct AuditTrail {
    audit_log: Arc<dyn AuditLog>,
}

impl AuditTrail {
    pub(crate) fn new(audit_log: Arc<dyn AuditLog>) -> Self {
        Self { audit_log }
    }

    /// Records the audit event, then runs `mutation` only if the write succeeded.
    ///
    /// Dry-run mutations persist nothing and are forwarded without an audit event.
    pub(crate) async fn audited<T, F>(
        &self,
        ctx: &RequestContext,
        target: AuditTarget<'_>,
        mutation: F,
    ) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if target.dry_run {
            debug!(
                category = target.category.as_str(),
                event_type = target.event_type.as_str(),
                name = target.name,
                "dry-run mutation forwarded without audit event"
            );
            return ctx.run(mutation).await.map_err(store_failure);
        }

        let stored = self.record(ctx, target).await?;

        match ctx.run(mutation).await {
            Ok(value) => {
                info!(
                    category = target.category.as_str(),
                    event_type = target.event_type.as_str(),
                    name = target.name,
                    event_id = %stored.event_id,
                    "audited mutation applied"
                );
                Ok(value)
            }
            Err(error) => {
                warn!(
                    error = %error,
                    category = target.category.as_str(),
                    event_type = target.event_type.as_str(),
                    name = target.name,
                    event_id = %stored.event_id,
                    "mutation failed after audit event was recorded"
                );
                Err(store_failure(error))
            }
        }
    }

    async fn record(
        &self,
        ctx: &RequestContext,
        target: AuditTarget<'_>,
    ) -> AppResult<StoredAuditEvent> {
        let event = AuditEvent {
            category: target.category,
            event_type: target.event_type,
            occurred_at: Utc::now(),
            owner_subject: ctx.actor().subject().to_owned(),
            resource_namespace: target
                .namespace
                .filter(|namespace| !namespace.is_empty())
                .map(str::to_owned),
            resource_name: target.name.to_owned(),
        };

        ctx.run(self.audit_log.record(event))
            .await
            .map_err(|error| match error {
                AppError::Cancelled(message) => AppError::Cancelled(message),
                other => {
                    warn!(
                        error = %other,
                        category = target.category.as_str(),
                        event_type = target.event_type.as_str(),
                        name = target.name,
                        "audit write failed, mutation not attempted"
                    );
                    AppError::AuditWrite(other.to_string())
                }
            })
    }
}

/// Keeps the store's own classification of rejected mutations; transport and
/// unclassified failures become [`AppError::Store`].
fn store_failure(error: AppError) -> AppError {
    match error {
        AppError::Cancelled(_)
        | AppError::Store(_)
        | AppError::NotFound(_)
        | AppError::Conflict(_)
        | AppError::Validation(_) => error,
        other => AppError::Store(other.to_string()),
    }
}
