use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use podwarden_core::UserIdentity;
use podwarden_domain::Namespace;

use crate::dto::{ApiEnvelope, CreateNamespaceRequest};
use crate::error::ApiResult;
use crate::handlers::MutationQuery;
use crate::state::AppState;

pub async fn create_namespace_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<MutationQuery>,
    Json(payload): Json<CreateNamespaceRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<Namespace>>)> {
    let ctx = state.request_context(user);
    let namespace = state
        .namespace_pipeline
        .create(&ctx, "", Namespace::from(payload), query.options())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(namespace))))
}

pub async fn delete_namespace_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(namespace): Path<String>,
    Query(query): Query<MutationQuery>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let ctx = state.request_context(user);
    state
        .namespace_pipeline
        .delete(&ctx, "", namespace.as_str(), query.options())
        .await?;

    Ok(Json(ApiEnvelope::done(format!(
        "namespace '{namespace}' deleted"
    ))))
}
