use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use podwarden_core::{AppError, UserIdentity};
use podwarden_domain::UserId;

use crate::dto::{ApiEnvelope, CreateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiEnvelope<UserResponse>>)> {
    let ctx = state.request_context(user);
    let created = state
        .user_service
        .create_user(&ctx, payload.username.as_str(), payload.email)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(UserResponse::from(created))),
    ))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<UserResponse>>> {
    let user_id = UserId::parse(user_id.as_str())?;
    let user = state
        .user_service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

    Ok(Json(ApiEnvelope::ok(UserResponse::from(user))))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let user_id = UserId::parse(user_id.as_str())?;
    let ctx = state.request_context(user);
    state.user_service.delete_user(&ctx, user_id).await?;

    Ok(Json(ApiEnvelope::done(format!("user '{user_id}' deleted"))))
}
