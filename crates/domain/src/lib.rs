//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod deployment;
pub mod mutation_policy;
mod namespace;
mod object;
mod pod;
mod update;
mod user;

pub use audit::{AuditCategory, AuditEventType};
pub use deployment::{Deployment, DeploymentSpec, PodTemplateSpec};
pub use namespace::Namespace;
pub use object::{DEFAULT_NAMESPACE, ManagedResource, MergeableResource, ObjectMeta, ResourceKind};
pub use pod::{Container, Pod, PodSpec, Toleration};
pub use update::{ContainerPatch, DeploymentUpdateRequest, PodUpdateRequest, TolerationAddition};
pub use user::{USERNAME_MAX_LENGTH, UserId, Username};
