use async_trait::async_trait;
use podwarden_core::AppResult;
use podwarden_domain::ManagedResource;

/// Largest page size any list call may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination and selector options for list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum items per page.
    pub limit: Option<u32>,
    /// Opaque token returned by the previous page.
    pub continue_token: Option<String>,
    /// Label selector, for example `app=web,tier!=cache`.
    pub label_selector: Option<String>,
    /// Field selector, for example `metadata.name=web`.
    pub field_selector: Option<String>,
}

/// One page of a list call.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPage<R> {
    /// Items in store order.
    pub items: Vec<R>,
    /// Token for the next page, absent on the last page.
    pub continue_token: Option<String>,
}

/// Options shared by create, update and delete calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationOptions {
    /// Validate the mutation without persisting it.
    pub dry_run: bool,
}

/// Port to the orchestration store for one resource kind.
///
/// Implementations are authoritative for ordering, concurrency tokens and
/// existence. `namespace` is empty for cluster-scoped kinds.
#[async_trait]
pub trait ObjectStore<R: ManagedResource>: Send + Sync {
    /// Lists one page of objects.
    async fn list(&self, namespace: &str, options: &ListOptions) -> AppResult<ObjectPage<R>>;

    /// Creates an object and returns the stored version.
    async fn create(&self, namespace: &str, object: R, options: MutationOptions) -> AppResult<R>;

    /// Replaces an existing object and returns the stored version.
    async fn update(&self, namespace: &str, object: R, options: MutationOptions) -> AppResult<R>;

    /// Deletes an object by name.
    async fn delete(&self, namespace: &str, name: &str, options: MutationOptions) -> AppResult<()>;
}
