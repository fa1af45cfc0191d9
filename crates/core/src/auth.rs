use serde::{Deserialize, Serialize};

/// Authenticated caller, used as the owner reference of audit events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
}

impl UserIdentity {
    /// Creates an identity from the subject asserted by the upstream proxy.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Returns the stable subject of the caller.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}
