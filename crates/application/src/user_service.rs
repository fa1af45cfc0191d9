//! User account ports and application service.
//!
//! Account creation and deletion go through the same audit-first ordering as
//! cluster mutations, under the `User` audit category.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use podwarden_core::{AppError, AppResult};
use podwarden_domain::{AuditCategory, AuditEventType, UserId, Username};

use crate::audit_trail::{AuditTarget, AuditTrail};
use crate::{AuditLog, RequestContext};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identifier assigned before the audit write so both refer to the same row.
    pub id: UserId,
    /// Validated username.
    pub username: Username,
    /// Optional contact email.
    pub email: Option<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A duplicate username is a conflict.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Deletes a user, returning whether a row was removed.
    async fn delete(&self, user_id: UserId) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for audited user lifecycle operations.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    audit_trail: AuditTrail,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>, audit_log: Arc<dyn AuditLog>) -> Self {
        Self {
            user_repository,
            audit_trail: AuditTrail::new(audit_log),
        }
    }

    /// Creates a user after recording its audit event.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        email: Option<String>,
    ) -> AppResult<UserRecord> {
        let username = Username::new(username)?;
        let email = email
            .map(|email| email.trim().to_owned())
            .filter(|email| !email.is_empty());
        let user = NewUser {
            id: UserId::new(),
            username,
            email,
        };
        let resource_name = user.username.as_str().to_owned();

        self.audit_trail
            .audited(
                ctx,
                AuditTarget {
                    category: AuditCategory::User,
                    event_type: AuditEventType::Create,
                    namespace: None,
                    name: resource_name.as_str(),
                    dry_run: false,
                },
                self.user_repository.create(user),
            )
            .await
    }

    /// Deletes an existing user after recording its audit event.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: UserId) -> AppResult<()> {
        let user = ctx
            .run(self.user_repository.find_by_id(user_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        let removed = self
            .audit_trail
            .audited(
                ctx,
                AuditTarget {
                    category: AuditCategory::User,
                    event_type: AuditEventType::Delete,
                    namespace: None,
                    name: user.username.as_str(),
                    dry_run: false,
                },
                self.user_repository.delete(user_id),
            )
            .await?;

        if !removed {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' was removed concurrently"
            )));
        }

        Ok(())
    }

    /// Returns a user record by ID, if it exists.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.user_repository.find_by_id(user_id).await
    }
}

#[cfg(test)]
mod tests;
