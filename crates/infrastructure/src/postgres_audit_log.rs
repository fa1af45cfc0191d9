use async_trait::async_trait;
use sqlx::PgPool;

use podwarden_application::{AuditEvent, AuditLog, StoredAuditEvent};
use podwarden_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit log.
///
/// `record` returns only after the insert has committed, so a successful
/// result is a durable audit row.
#[derive(Clone)]
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    /// Creates an audit log with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn record(&self, event: AuditEvent) -> AppResult<StoredAuditEvent> {
        let event_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO audit_events (
                category,
                event_type,
                occurred_at,
                owner_subject,
                resource_namespace,
                resource_name
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(event.category.as_str())
        .bind(event.event_type.as_str())
        .bind(event.occurred_at)
        .bind(event.owner_subject.as_str())
        .bind(event.resource_namespace.as_deref())
        .bind(event.resource_name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

        Ok(StoredAuditEvent { event_id, event })
    }
}

#[cfg(test)]
mod tests;
