use std::time::Duration;

use kube::{Client, Config};
use podwarden_core::{AppError, AppResult};
use podwarden_domain::ManagedResource;
use tracing::info;

use crate::KubeObjectStore;

/// Read timeout applied to every API server request.
const API_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection to the Kubernetes API server shared by every kind's store.
#[derive(Clone)]
pub struct ClusterConnection {
    client: Client,
}

impl std::fmt::Debug for ClusterConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConnection")
            .field("default_namespace", &self.client.default_namespace())
            .finish_non_exhaustive()
    }
}

impl ClusterConnection {
    /// Connects using the in-cluster environment or the local kubeconfig.
    pub async fn infer() -> AppResult<Self> {
        let mut config = Config::infer().await.map_err(|error| {
            AppError::Internal(format!("failed to load kubernetes client config: {error}"))
        })?;
        config.read_timeout = Some(API_READ_TIMEOUT);

        let cluster_url = config.cluster_url.to_string();
        let client = Client::try_from(config).map_err(|error| {
            AppError::Internal(format!("failed to build kubernetes client: {error}"))
        })?;

        info!(cluster_url = %cluster_url, "kubernetes client configured");
        Ok(Self { client })
    }

    /// Returns an object store for one managed kind.
    #[must_use]
    pub fn object_store<R: ManagedResource>(&self) -> KubeObjectStore<R> {
        KubeObjectStore::new(self.client.clone())
    }
}
