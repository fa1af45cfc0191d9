//! Allow-listed update requests.
//!
//! Each request type names exactly the fields an update may change. Anything
//! else on a stored object is unreachable through these types.

use serde::{Deserialize, Serialize};

use crate::Toleration;

/// Image replacement for one container, joined on the container name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPatch {
    /// Name of an existing container. Unknown names are ignored.
    pub name: String,
    /// New image reference.
    pub image: String,
}

impl ContainerPatch {
    /// Creates a container image patch.
    #[must_use]
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// Toleration appended to the stored tolerations on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TolerationAddition {
    /// Taint key.
    pub key: Option<String>,
    /// `Exists` or `Equal`.
    pub operator: Option<String>,
    /// Taint value.
    pub value: Option<String>,
    /// Taint effect.
    pub effect: Option<String>,
    /// Seconds a `NoExecute` taint is tolerated.
    pub toleration_seconds: Option<i64>,
}

impl From<TolerationAddition> for Toleration {
    fn from(value: TolerationAddition) -> Self {
        Self {
            key: value.key,
            operator: value.operator,
            value: value.value,
            effect: value.effect,
            toleration_seconds: value.toleration_seconds,
        }
    }
}

/// Allow-listed changes to a pod spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodUpdateRequest {
    /// Image replacements for application containers.
    pub containers: Vec<ContainerPatch>,
    /// Image replacements for init containers.
    pub init_containers: Vec<ContainerPatch>,
    /// Tolerations appended after the stored ones.
    pub toleration_additions: Vec<TolerationAddition>,
    /// Replaces the stored active deadline, including clearing it.
    pub active_deadline_seconds: Option<i64>,
    /// Applied only while the stored grace period is unset.
    pub termination_grace_period_seconds: Option<i64>,
}

/// Allow-listed changes to a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentUpdateRequest {
    /// Replica count, replaced only when provided.
    pub replicas: Option<i32>,
    /// Changes applied to the pod template spec.
    pub template: PodUpdateRequest,
}
