use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use podwarden_core::{AppError, AppResult, UserIdentity};
use podwarden_domain::{AuditCategory, AuditEventType, UserId};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{NewUser, UserRecord, UserRepository, UserService};
use crate::{AuditEvent, AuditLog, RequestContext, StoredAuditEvent};

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<Vec<UserRecord>>,
    writes: Mutex<usize>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        *self.writes.lock().await += 1;
        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|existing| existing.username == user.username.as_str())
        {
            return Err(AppError::Conflict("username taken".to_owned()));
        }

        let record = UserRecord {
            id: user.id,
            username: user.username.as_str().to_owned(),
            email: user.email,
            created_at: Utc::now(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<bool> {
        *self.writes.lock().await += 1;
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|user| user.id != user_id);
        Ok(users.len() < before)
    }
}

#[derive(Default)]
struct FakeAuditLog {
    events: Mutex<Vec<AuditEvent>>,
    fail: bool,
}

#[async_trait]
impl AuditLog for FakeAuditLog {
    async fn record(&self, event: AuditEvent) -> AppResult<StoredAuditEvent> {
        if self.fail {
            return Err(AppError::Internal("audit table locked".to_owned()));
        }
        self.events.lock().await.push(event.clone());
        Ok(StoredAuditEvent {
            event_id: Uuid::new_v4(),
            event,
        })
    }
}

fn ctx() -> RequestContext {
    RequestContext::new(UserIdentity::new("admin"))
}

#[tokio::test]
async fn create_user_records_user_audit_event() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog::default());
    let service = UserService::new(repository.clone(), audit_log.clone());

    let created = service
        .create_user(&ctx(), " bob ", Some("bob@example.com".to_owned()))
        .await;

    let Ok(created) = created else {
        panic!("create_user failed");
    };
    assert_eq!(created.username, "bob");
    let events = audit_log.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category, AuditCategory::User);
    assert_eq!(events[0].event_type, AuditEventType::Create);
    assert_eq!(events[0].resource_name, "bob");
    assert_eq!(events[0].resource_namespace, None);
    assert_eq!(events[0].owner_subject, "admin");
}

#[tokio::test]
async fn invalid_username_is_rejected_before_audit() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog::default());
    let service = UserService::new(repository.clone(), audit_log.clone());

    let result = service.create_user(&ctx(), "bob smith", None).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(audit_log.events.lock().await.is_empty());
    assert_eq!(*repository.writes.lock().await, 0);
}

#[tokio::test]
async fn failing_audit_log_blocks_user_creation() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog {
        fail: true,
        ..FakeAuditLog::default()
    });
    let service = UserService::new(repository.clone(), audit_log);

    let result = service.create_user(&ctx(), "bob", None).await;

    assert!(matches!(result, Err(AppError::AuditWrite(_))));
    assert_eq!(*repository.writes.lock().await, 0);
}

#[tokio::test]
async fn duplicate_username_leaves_audit_record_and_fails_as_conflict() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog::default());
    let service = UserService::new(repository.clone(), audit_log.clone());

    let first = service.create_user(&ctx(), "bob", None).await;
    let second = service.create_user(&ctx(), "bob", None).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(audit_log.events.lock().await.len(), 2);
}

#[tokio::test]
async fn delete_user_audits_then_removes_row() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog::default());
    let service = UserService::new(repository.clone(), audit_log.clone());
    let created = service
        .create_user(&ctx(), "carol", None)
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = service.delete_user(&ctx(), created.id).await;

    assert!(result.is_ok());
    assert!(repository.users.lock().await.is_empty());
    let events = audit_log.events.lock().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].event_type, AuditEventType::Delete);
    assert_eq!(events[1].resource_name, "carol");
}

#[tokio::test]
async fn deleting_unknown_user_is_not_found_without_audit() {
    let repository = Arc::new(FakeUserRepository::default());
    let audit_log = Arc::new(FakeAuditLog::default());
    let service = UserService::new(repository.clone(), audit_log.clone());

    let result = service.delete_user(&ctx(), UserId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(audit_log.events.lock().await.is_empty());
    assert_eq!(*repository.writes.lock().await, 0);
}
