use std::time::Duration;

use podwarden_application::{MutationPipeline, RequestContext, UserService};
use podwarden_core::UserIdentity;
use podwarden_domain::{Deployment, Namespace, Pod};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pod_pipeline: MutationPipeline<Pod>,
    pub deployment_pipeline: MutationPipeline<Deployment>,
    pub namespace_pipeline: MutationPipeline<Namespace>,
    pub user_service: UserService,
    pub postgres_pool: PgPool,
    pub actor_header: String,
    pub request_timeout: Duration,
}

impl AppState {
    /// Builds the per-request context for an authenticated actor.
    pub fn request_context(&self, actor: UserIdentity) -> RequestContext {
        RequestContext::new(actor).with_timeout(self.request_timeout)
    }
}
