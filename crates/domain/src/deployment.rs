use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mutation_policy::merge_pod_spec;
use crate::{
    DeploymentUpdateRequest, ManagedResource, MergeableResource, ObjectMeta, PodSpec,
    ResourceKind,
};

/// Deployment object as exchanged with the orchestration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// API group version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Kind tag.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Desired deployment state.
    #[serde(default)]
    pub spec: DeploymentSpec,
    /// Top-level fields preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Deployment specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Desired number of pod replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// Template stamped out for each replica.
    #[serde(default)]
    pub template: PodTemplateSpec,
    /// Spec fields preserved verbatim (selector, strategy, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Pod template embedded in workload controllers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
    /// Template metadata, copied onto each pod.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Pod spec for each replica.
    #[serde(default)]
    pub spec: PodSpec,
    /// Template fields preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ManagedResource for Deployment {
    const KIND: ResourceKind = ResourceKind::Deployment;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn set_type_meta(&mut self, api_version: &str, kind: &str) {
        api_version.clone_into(&mut self.api_version);
        kind.clone_into(&mut self.kind);
    }
}

impl MergeableResource for Deployment {
    type UpdateRequest = DeploymentUpdateRequest;

    fn merge(existing: Self, request: &Self::UpdateRequest) -> Self {
        let DeploymentSpec {
            replicas,
            template,
            extra,
        } = existing.spec;

        Self {
            spec: DeploymentSpec {
                replicas: request.replicas.or(replicas),
                template: PodTemplateSpec {
                    spec: merge_pod_spec(template.spec, &request.template),
                    ..template
                },
                extra,
            },
            ..existing
        }
    }
}
