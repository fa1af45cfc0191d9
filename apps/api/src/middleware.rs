use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use podwarden_core::{AppError, AppResult, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the caller from the trusted actor header set by the auth proxy.
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = actor_from_headers(request.headers(), state.actor_header.as_str())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn actor_from_headers(headers: &HeaderMap, header_name: &str) -> AppResult<UserIdentity> {
    let subject = headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("{header_name} header is required")))?;

    Ok(UserIdentity::new(subject))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use podwarden_core::AppError;

    use super::actor_from_headers;

    #[test]
    fn actor_header_becomes_identity_subject() {
        let mut headers = HeaderMap::new();
        headers.insert("x-remote-user", HeaderValue::from_static(" alice "));

        let identity = actor_from_headers(&headers, "x-remote-user");

        assert_eq!(
            identity.ok().map(|identity| identity.subject().to_owned()),
            Some("alice".to_owned())
        );
    }

    #[test]
    fn missing_or_blank_actor_is_unauthorized() {
        let mut blank = HeaderMap::new();
        blank.insert("x-remote-user", HeaderValue::from_static("  "));

        assert!(matches!(
            actor_from_headers(&HeaderMap::new(), "x-remote-user"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            actor_from_headers(&blank, "x-remote-user"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
