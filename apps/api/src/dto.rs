mod common;
mod deployments;
mod namespaces;
mod pods;
mod users;

pub use common::{ApiEnvelope, HealthDependencyStatus, HealthResponse, ObjectListResponse};
pub use deployments::UpdateDeploymentRequest;
pub use namespaces::CreateNamespaceRequest;
pub use pods::UpdatePodRequest;
pub use users::{CreateUserRequest, UserResponse};
