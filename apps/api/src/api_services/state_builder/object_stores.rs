use std::sync::Arc;

use podwarden_application::ObjectStore;
use podwarden_core::AppResult;
use podwarden_domain::{Deployment, Namespace, Pod};
use podwarden_infrastructure::{ClusterConnection, InMemoryObjectStore};
use tracing::warn;

use crate::api_config::ObjectStoreBackend;

pub(super) struct ObjectStores {
    pub pods: Arc<dyn ObjectStore<Pod>>,
    pub deployments: Arc<dyn ObjectStore<Deployment>>,
    pub namespaces: Arc<dyn ObjectStore<Namespace>>,
}

pub(super) async fn build_object_stores(backend: ObjectStoreBackend) -> AppResult<ObjectStores> {
    match backend {
        ObjectStoreBackend::Kubernetes => {
            let connection = ClusterConnection::infer().await?;
            Ok(ObjectStores {
                pods: Arc::new(connection.object_store::<Pod>()),
                deployments: Arc::new(connection.object_store::<Deployment>()),
                namespaces: Arc::new(connection.object_store::<Namespace>()),
            })
        }
        ObjectStoreBackend::Memory => {
            warn!("using process-local object store; cluster state is not persisted");
            Ok(ObjectStores {
                pods: Arc::new(InMemoryObjectStore::<Pod>::new()),
                deployments: Arc::new(InMemoryObjectStore::<Deployment>::new()),
                namespaces: Arc::new(InMemoryObjectStore::<Namespace>::new()),
            })
        }
    }
}
