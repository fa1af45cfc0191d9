use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use podwarden_core::{AppError, UserIdentity};
use podwarden_domain::{Pod, PodUpdateRequest};

use crate::dto::{ApiEnvelope, ObjectListResponse, UpdatePodRequest};
use crate::error::ApiResult;
use crate::handlers::{ListQuery, MutationQuery};
use crate::state::AppState;

pub async fn create_pod_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(namespace): Path<String>,
    Query(query): Query<MutationQuery>,
    Json(payload): Json<Pod>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Pod>>)> {
    let ctx = state.request_context(user);
    let pod = state
        .pod_pipeline
        .create(&ctx, namespace.as_str(), payload, query.options())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(pod))))
}

pub async fn list_pods_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiEnvelope<ObjectListResponse<Pod>>>> {
    let ctx = state.request_context(user);
    let page = state
        .pod_pipeline
        .list(&ctx, namespace.as_str(), query.into())
        .await?;

    Ok(Json(ApiEnvelope::ok(ObjectListResponse::from(page))))
}

pub async fn get_pod_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
) -> ApiResult<Json<ApiEnvelope<Pod>>> {
    let ctx = state.request_context(user);
    let pod = state
        .pod_pipeline
        .find(&ctx, namespace.as_str(), id.as_str())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("pod '{id}' does not exist in namespace '{namespace}'"))
        })?;

    Ok(Json(ApiEnvelope::ok(pod)))
}

pub async fn update_pod_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
    Query(query): Query<MutationQuery>,
    Json(payload): Json<UpdatePodRequest>,
) -> ApiResult<Json<ApiEnvelope<Pod>>> {
    let request = PodUpdateRequest::try_from(payload)?;
    let ctx = state.request_context(user);
    let pod = state
        .pod_pipeline
        .update(&ctx, namespace.as_str(), id.as_str(), &request, query.options())
        .await?;

    Ok(Json(ApiEnvelope::ok(pod)))
}

pub async fn delete_pod_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((namespace, id)): Path<(String, String)>,
    Query(query): Query<MutationQuery>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let ctx = state.request_context(user);
    state
        .pod_pipeline
        .delete(&ctx, namespace.as_str(), id.as_str(), query.options())
        .await?;

    Ok(Json(ApiEnvelope::done(format!("pod '{id}' deleted"))))
}
