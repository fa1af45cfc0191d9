use async_trait::async_trait;
use podwarden_application::{AuditEvent, AuditLog, StoredAuditEvent};
use podwarden_core::AppResult;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only in-memory audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    events: RwLock<Vec<StoredAuditEvent>>,
}

impl InMemoryAuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored event in append order.
    pub async fn events(&self) -> Vec<StoredAuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, event: AuditEvent) -> AppResult<StoredAuditEvent> {
        let stored = StoredAuditEvent {
            event_id: Uuid::new_v4(),
            event,
        };
        self.events.write().await.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use podwarden_application::{AuditEvent, AuditLog};
    use podwarden_domain::{AuditCategory, AuditEventType};

    use super::InMemoryAuditLog;

    #[tokio::test]
    async fn events_are_kept_in_append_order() {
        let audit_log = InMemoryAuditLog::new();
        for name in ["first", "second"] {
            let result = audit_log
                .record(AuditEvent {
                    category: AuditCategory::Pod,
                    event_type: AuditEventType::Delete,
                    occurred_at: Utc::now(),
                    owner_subject: "alice".to_owned(),
                    resource_namespace: Some("default".to_owned()),
                    resource_name: name.to_owned(),
                })
                .await;
            assert!(result.is_ok());
        }

        let names: Vec<String> = audit_log
            .events()
            .await
            .into_iter()
            .map(|stored| stored.event.resource_name)
            .collect();
        assert_eq!(names, vec!["first".to_owned(), "second".to_owned()]);
    }
}
