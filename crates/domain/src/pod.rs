use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mutation_policy::merge_pod_spec;
use crate::{ManagedResource, MergeableResource, ObjectMeta, PodUpdateRequest, ResourceKind};

/// Pod object as exchanged with the orchestration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// API group version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Kind tag.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Desired pod state.
    #[serde(default)]
    pub spec: PodSpec,
    /// Top-level fields preserved verbatim (for example `status`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Pod specification with the allow-listed fields modelled explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Application containers.
    #[serde(default)]
    pub containers: Vec<Container>,
    /// Init containers, run to completion before application containers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<Container>,
    /// Node taint tolerations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    /// Seconds the pod may stay active before the system fails it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_deadline_seconds: Option<i64>,
    /// Grace period granted to the pod on termination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,
    /// Spec fields preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A container inside a pod spec. `name` is the join key for image patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name, unique within the pod.
    pub name: String,
    /// Container image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Container fields preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Container {
    /// Creates a container with only a name and image.
    #[must_use]
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: Some(image.into()),
            extra: BTreeMap::new(),
        }
    }
}

/// Toleration of a node taint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toleration {
    /// Taint key the toleration applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// `Exists` or `Equal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Taint value matched by `Equal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Taint effect matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Seconds a `NoExecute` taint is tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

impl ManagedResource for Pod {
    const KIND: ResourceKind = ResourceKind::Pod;

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

impl MergeableResource for Pod {
    type UpdateRequest = PodUpdateRequest;

    fn merge(existing: Self, request: &Self::UpdateRequest) -> Self {
        Self {
            spec: merge_pod_spec(existing.spec, request),
            ..existing
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Pod;

    #[test]
    fn pod_keeps_unmodelled_fields() {
        let raw = json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {
                "containers": [{
                    "name": "nginx",
                    "image": "nginx:1.25",
                    "ports": [{"containerPort": 80}]
                }],
                "nodeSelector": {"disk": "ssd"},
                "restartPolicy": "Always"
            },
            "status": {"phase": "Running"}
        });

        let pod: Pod = serde_json::from_value(raw.clone()).unwrap_or_else(|_| unreachable!());
        assert_eq!(pod.spec.containers[0].image.as_deref(), Some("nginx:1.25"));
        assert!(pod.spec.extra.contains_key("nodeSelector"));

        let encoded = serde_json::to_value(&pod).unwrap_or_else(|_| unreachable!());
        assert_eq!(encoded, raw);
    }
}
