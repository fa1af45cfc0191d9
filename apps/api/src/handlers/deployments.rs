use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use podwarden_core::{AppError, UserIdentity};
use podwarden_domain::{Deployment, DeploymentUpdateRequest};

use crate::dto::{ApiEnvelope, ObjectListResponse, UpdateDeploymentRequest};
use crate::error::ApiResult;
use crate::handlers::{ListQuery, MutationQuery};
use crate::state::AppState;

pub async fn create_deployment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(namespace): Path<String>,
    Query(query): Query<MutationQuery>,
    Json(payload): Json<Deployment>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Deployment>>)> {
    let ctx = state.request_context(user);
    let deployment = state
        .deployment_pipeline
        .create(&ctx, namespace.as_str(), payload, query.options())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(deployment))))
}

pub async fn list_deployments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiEnvelope<ObjectListResponse<Deployment>>>> {
    let ctx = state.request_context(user);
    let page = state
        .deployment_pipeline
        .list(&ctx, namespace.as_str(), query.into())
        .await?;

    Ok(Json(ApiEnvelope::ok(ObjectListResponse::from(page))))
}

pub async fn get_deployment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
) -> ApiResult<Json<ApiEnvelope<Deployment>>> {
    let ctx = state.request_context(user);
    let deployment = state
        .deployment_pipeline
        .find(&ctx, namespace.as_str(), id.as_str())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "deployment '{id}' does not exist in namespace '{namespace}'"
            ))
        })?;

    Ok(Json(ApiEnvelope::ok(deployment)))
}

pub async fn update_deployment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
    Query(query): Query<MutationQuery>,
    Json(payload): Json<UpdateDeploymentRequest>,
) -> ApiResult<Json<ApiEnvelope<Deployment>>> {
    let request = DeploymentUpdateRequest::try_from(payload)?;
    let ctx = state.request_context(user);
    let deployment = state
        .deployment_pipeline
        .update(&ctx, namespace.as_str(), id.as_str(), &request, query.options())
        .await?;

    Ok(Json(ApiEnvelope::ok(deployment)))
}

pub async fn delete_deployment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
    Query(query): Query<MutationQuery>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let ctx = state.request_context(user);
    state
        .deployment_pipeline
        .delete(&ctx, namespace.as_str(), id.as_str(), query.options())
        .await?;

    Ok(Json(ApiEnvelope::done(format!("deployment '{id}' deleted"))))
}
