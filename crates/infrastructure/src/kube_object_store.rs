use std::marker::PhantomData;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment as K8sDeployment;
use k8s_openapi::api::core::v1::{Namespace as K8sNamespace, Pod as K8sPod};
use kube::Client;
use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, ListParams, PostParams};
use podwarden_application::{ListOptions, MutationOptions, ObjectPage, ObjectStore};
use podwarden_core::{AppError, AppResult};
use podwarden_domain::{ManagedResource, ResourceKind};
use tracing::debug;

/// Field manager recorded on every write this service makes.
const FIELD_MANAGER: &str = "podwarden";

/// Kubernetes API server adapter for one managed kind.
///
/// Objects travel as `DynamicObject` so fields outside the local model reach
/// the API server untouched.
pub struct KubeObjectStore<R> {
    client: Client,
    api_resource: ApiResource,
    _kind: PhantomData<fn() -> R>,
}

impl<R: ManagedResource> KubeObjectStore<R> {
    /// Creates a store that talks to the cluster behind `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_resource: api_resource(R::KIND),
            _kind: PhantomData,
        }
    }

    fn api(&self, namespace: &str) -> Api<DynamicObject> {
        if R::KIND.is_namespaced() && !namespace.is_empty() {
            Api::namespaced_with(self.client.clone(), namespace, &self.api_resource)
        } else {
            Api::all_with(self.client.clone(), &self.api_resource)
        }
    }
}

#[async_trait]
impl<R: ManagedResource> ObjectStore<R> for KubeObjectStore<R> {
    async fn list(&self, namespace: &str, options: &ListOptions) -> AppResult<ObjectPage<R>> {
        let mut params = ListParams::default();
        if let Some(limit) = options.limit {
            params = params.limit(limit);
        }
        if let Some(token) = options.continue_token.as_deref() {
            params = params.continue_token(token);
        }
        if let Some(selector) = options.label_selector.as_deref() {
            params = params.labels(selector);
        }
        if let Some(selector) = options.field_selector.as_deref() {
            params = params.fields(selector);
        }

        let list = self
            .api(namespace)
            .list(&params)
            .await
            .map_err(|error| map_kube_error(R::KIND, "list", error))?;

        debug!(
            kind = %R::KIND,
            namespace,
            items = list.items.len(),
            "listed objects from api server"
        );

        let continue_token = list.metadata.continue_.filter(|token| !token.is_empty());
        let items = list
            .items
            .into_iter()
            .map(from_dynamic::<R>)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ObjectPage {
            items,
            continue_token,
        })
    }

    async fn create(&self, namespace: &str, object: R, options: MutationOptions) -> AppResult<R> {
        let created = self
            .api(namespace)
            .create(&post_params(options), &to_dynamic(&object)?)
            .await
            .map_err(|error| map_kube_error(R::KIND, "create", error))?;

        from_dynamic(created)
    }

    async fn update(&self, namespace: &str, object: R, options: MutationOptions) -> AppResult<R> {
        let name = object.metadata().name().to_owned();
        let replaced = self
            .api(namespace)
            .replace(&name, &post_params(options), &to_dynamic(&object)?)
            .await
            .map_err(|error| map_kube_error(R::KIND, "replace", error))?;

        from_dynamic(replaced)
    }

    async fn delete(&self, namespace: &str, name: &str, options: MutationOptions) -> AppResult<()> {
        let params = DeleteParams {
            dry_run: options.dry_run,
            ..DeleteParams::default()
        };

        self.api(namespace)
            .delete(name, &params)
            .await
            .map_err(|error| map_kube_error(R::KIND, "delete", error))?;

        Ok(())
    }
}

fn api_resource(kind: ResourceKind) -> ApiResource {
    match kind {
        ResourceKind::Pod => ApiResource::erase::<K8sPod>(&()),
        ResourceKind::Deployment => ApiResource::erase::<K8sDeployment>(&()),
        ResourceKind::Namespace => ApiResource::erase::<K8sNamespace>(&()),
    }
}

fn post_params(options: MutationOptions) -> PostParams {
    PostParams {
        dry_run: options.dry_run,
        field_manager: Some(FIELD_MANAGER.to_owned()),
    }
}

fn to_dynamic<R: ManagedResource>(object: &R) -> AppResult<DynamicObject> {
    serde_json::to_value(object)
        .and_then(serde_json::from_value)
        .map_err(|error| AppError::Internal(format!("failed to encode object: {error}")))
}

fn from_dynamic<R: ManagedResource>(object: DynamicObject) -> AppResult<R> {
    let mut decoded: R = serde_json::to_value(object)
        .and_then(serde_json::from_value)
        .map_err(|error| {
            AppError::Store(format!("api server returned an undecodable {}: {error}", R::KIND))
        })?;

    // List items come back without type meta.
    decoded.set_type_meta(R::KIND.api_version(), R::KIND.kind_name());
    Ok(decoded)
}

fn map_kube_error(kind: ResourceKind, operation: &str, error: kube::Error) -> AppError {
    match error {
        kube::Error::Api(response) => {
            let message = format!("{operation} {kind} failed: {}", response.message);
            match response.code {
                404 => AppError::NotFound(message),
                409 => AppError::Conflict(message),
                400 | 422 => AppError::Validation(message),
                401 => AppError::Unauthorized(message),
                403 => AppError::Forbidden(message),
                _ => AppError::Store(message),
            }
        }
        other => AppError::Store(format!("{operation} {kind} failed: {other}")),
    }
}
