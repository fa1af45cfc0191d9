use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podwarden_core::AppResult;
use podwarden_domain::{AuditCategory, AuditEventType};
use uuid::Uuid;

/// Audit record of an attempted mutation, written before the mutation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Resource family.
    pub category: AuditCategory,
    /// Mutation type.
    pub event_type: AuditEventType,
    /// When the mutation was attempted.
    pub occurred_at: DateTime<Utc>,
    /// Subject that requested the mutation.
    pub owner_subject: String,
    /// Namespace of the target, when namespaced.
    pub resource_namespace: Option<String>,
    /// Name or identifier of the target.
    pub resource_name: String,
}

/// Audit event after it was durably stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEvent {
    /// Store-assigned event identifier.
    pub event_id: Uuid,
    /// The stored event.
    pub event: AuditEvent,
}

/// Port for the append-only audit log.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Durably appends one event. `Ok` means the event is stored.
    async fn record(&self, event: AuditEvent) -> AppResult<StoredAuditEvent>;
}
