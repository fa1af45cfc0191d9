use std::str::FromStr;

use podwarden_core::AppError;
use serde::{Deserialize, Serialize};

/// Resource family an audit event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCategory {
    /// Relational-store user accounts.
    User,
    /// Cluster pods.
    Pod,
    /// Cluster deployments.
    Deployment,
    /// Cluster namespaces.
    Namespace,
}

impl AuditCategory {
    /// Returns a stable storage value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Pod => "pod",
            Self::Deployment => "deployment",
            Self::Namespace => "namespace",
        }
    }
}

impl FromStr for AuditCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "pod" => Ok(Self::Pod),
            "deployment" => Ok(Self::Deployment),
            "namespace" => Ok(Self::Namespace),
            _ => Err(AppError::Validation(format!(
                "unknown audit category '{value}'"
            ))),
        }
    }
}

/// Mutation type recorded by an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Object creation.
    Create,
    /// Allow-listed object update.
    Update,
    /// Object deletion.
    Delete,
}

impl AuditEventType {
    /// Returns a stable storage value for this event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for AuditEventType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown audit event type '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AuditCategory, AuditEventType};

    #[test]
    fn storage_values_parse_back() {
        for category in [
            AuditCategory::User,
            AuditCategory::Pod,
            AuditCategory::Deployment,
            AuditCategory::Namespace,
        ] {
            assert_eq!(AuditCategory::from_str(category.as_str()).ok(), Some(category));
        }

        for event_type in [
            AuditEventType::Create,
            AuditEventType::Update,
            AuditEventType::Delete,
        ] {
            assert_eq!(
                AuditEventType::from_str(event_type.as_str()).ok(),
                Some(event_type)
            );
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(AuditCategory::from_str("cronjob").is_err());
    }
}
