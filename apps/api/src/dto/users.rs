use chrono::{DateTime, Utc};
use podwarden_application::UserRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming payload for user creation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
}

/// API representation of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.as_uuid(),
            username: value.username,
            email: value.email,
            created_at: value.created_at,
        }
    }
}
