use std::sync::Arc;

use podwarden_application::{AuditLog, MutationPipeline, UserService};
use podwarden_core::AppError;
use podwarden_infrastructure::{PostgresAuditLog, PostgresUserRepository};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod object_stores;

pub async fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let audit_log: Arc<dyn AuditLog> = Arc::new(PostgresAuditLog::new(pool.clone()));
    let stores = object_stores::build_object_stores(config.object_store_backend).await?;
    let limits = config.resolver_limits;

    Ok(AppState {
        pod_pipeline: MutationPipeline::new(stores.pods, audit_log.clone(), limits),
        deployment_pipeline: MutationPipeline::new(stores.deployments, audit_log.clone(), limits),
        namespace_pipeline: MutationPipeline::new(stores.namespaces, audit_log.clone(), limits),
        user_service: UserService::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            audit_log,
        ),
        postgres_pool: pool,
        actor_header: config.actor_header.clone(),
        request_timeout: config.request_timeout,
    })
}
