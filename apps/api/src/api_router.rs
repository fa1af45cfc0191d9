use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{deployments, health, namespaces, pods, users};
use crate::middleware;
use crate::state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/namespaces", post(namespaces::create_namespace_handler))
        .route(
            "/api/namespaces/{namespace}",
            delete(namespaces::delete_namespace_handler),
        )
        .route(
            "/api/namespaces/{namespace}/pods",
            get(pods::list_pods_handler).post(pods::create_pod_handler),
        )
        .route(
            "/api/namespaces/{namespace}/pods/{id}",
            get(pods::get_pod_handler)
                .put(pods::update_pod_handler)
                .delete(pods::delete_pod_handler),
        )
        .route(
            "/api/namespaces/{namespace}/deployments",
            get(deployments::list_deployments_handler)
                .post(deployments::create_deployment_handler),
        )
        .route(
            "/api/namespaces/{namespace}/deployments/{id}",
            get(deployments::get_deployment_handler)
                .put(deployments::update_deployment_handler)
                .delete(deployments::delete_deployment_handler),
        )
        .route("/api/users", post(users::create_user_handler))
        .route(
            "/api/users/{user_id}",
            get(users::get_user_handler).delete(users::delete_user_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_actor,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
