use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AuditCategory;

/// Namespace applied to namespaced objects when the caller names none.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Standard object metadata shared by every managed kind.
///
/// Fields this service does not model are kept in `extra` so a stored object
/// survives a read-modify-write cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique per namespace and kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning namespace for namespaced kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Store-assigned unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Opaque store concurrency token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    /// Object labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Object annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Metadata fields preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ObjectMeta {
    /// Returns the object name or an empty string when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns the object namespace or an empty string when unset.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    /// Returns the object UID or an empty string when unset.
    #[must_use]
    pub fn uid(&self) -> &str {
        self.uid.as_deref().unwrap_or_default()
    }

    /// Returns whether the object is addressed by `name_or_uid`.
    #[must_use]
    pub fn matches_name_or_uid(&self, name_or_uid: &str) -> bool {
        !name_or_uid.is_empty() && (self.name() == name_or_uid || self.uid() == name_or_uid)
    }
}

/// Resource kinds managed by the mutation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Core `v1/Pod`.
    Pod,
    /// `apps/v1/Deployment`.
    Deployment,
    /// Core `v1/Namespace`, cluster scoped.
    Namespace,
}

impl ResourceKind {
    /// Returns the `apiVersion` stamped on objects of this kind.
    #[must_use]
    pub fn api_version(self) -> &'static str {
        match self {
            Self::Pod | Self::Namespace => "v1",
            Self::Deployment => "apps/v1",
        }
    }

    /// Returns the `kind` tag stamped on objects of this kind.
    #[must_use]
    pub fn kind_name(self) -> &'static str {
        match self {
            Self::Pod => "Pod",
            Self::Deployment => "Deployment",
            Self::Namespace => "Namespace",
        }
    }

    /// Returns the plural resource name used in store paths.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::Pod => "pods",
            Self::Deployment => "deployments",
            Self::Namespace => "namespaces",
        }
    }

    /// Returns whether objects of this kind live inside a namespace.
    #[must_use]
    pub fn is_namespaced(self) -> bool {
        !matches!(self, Self::Namespace)
    }

    /// Returns the audit category for mutations of this kind.
    #[must_use]
    pub fn audit_category(self) -> AuditCategory {
        match self {
            Self::Pod => AuditCategory::Pod,
            Self::Deployment => AuditCategory::Deployment,
            Self::Namespace => AuditCategory::Namespace,
        }
    }

    /// Resolves the effective namespace for a request.
    ///
    /// Namespaced kinds fall back to [`DEFAULT_NAMESPACE`]; cluster-scoped kinds
    /// always resolve to an empty namespace.
    #[must_use]
    pub fn effective_namespace(self, requested: &str) -> String {
        if !self.is_namespaced() {
            return String::new();
        }

        let trimmed = requested.trim();
        if trimmed.is_empty() {
            DEFAULT_NAMESPACE.to_owned()
        } else {
            trimmed.to_owned()
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.kind_name())
    }
}

/// An object held by the orchestration store that the pipeline can create and delete.
pub trait ManagedResource:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind tag for every object of this type.
    const KIND: ResourceKind;

    /// Returns the object metadata.
    fn metadata(&self) -> &ObjectMeta;

    /// Returns mutable object metadata.
    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    /// Overwrites the `apiVersion`/`kind` pair.
    fn set_type_meta(&mut self, api_version: &str, kind: &str);

    /// Stamps the canonical type meta and effective namespace onto the object.
    fn normalize(&mut self, namespace: &str) {
        self.set_type_meta(Self::KIND.api_version(), Self::KIND.kind_name());
        if Self::KIND.is_namespaced() {
            self.metadata_mut().namespace = Some(Self::KIND.effective_namespace(namespace));
        } else {
            self.metadata_mut().namespace = None;
        }
    }
}

/// A managed object that also accepts allow-listed updates.
pub trait MergeableResource: ManagedResource {
    /// Sparse update request whose fields are exactly the mutable set.
    type UpdateRequest: std::fmt::Debug + Send + Sync;

    /// Produces the object to persist from the stored object and a request.
    fn merge(existing: Self, request: &Self::UpdateRequest) -> Self;
}
