use std::collections::BTreeMap;

use podwarden_domain::Namespace;
use serde::Deserialize;

/// Incoming payload for namespace creation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNamespaceRequest {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl From<CreateNamespaceRequest> for Namespace {
    fn from(value: CreateNamespaceRequest) -> Self {
        let mut namespace = Namespace::named(value.name.trim());
        namespace.metadata.labels = value.labels;
        namespace
    }
}
