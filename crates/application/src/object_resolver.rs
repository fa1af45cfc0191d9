use std::sync::Arc;

use podwarden_core::{AppError, AppResult};
use podwarden_domain::ManagedResource;
use tracing::debug;

use crate::{ListOptions, MAX_PAGE_SIZE, ObjectStore, RequestContext};

/// Bounds on a paginated lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverLimits {
    /// Items requested per page, at most [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    /// Page fetches allowed before the lookup is abandoned.
    pub max_pages: u32,
}

impl ResolverLimits {
    /// Creates limits, clamping both values into their valid ranges.
    #[must_use]
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            max_pages: max_pages.max(1),
        }
    }
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE, 50)
    }
}

/// Finds objects by name or UID by walking list pages.
pub struct ObjectResolver<R: ManagedResource> {
    store: Arc<dyn ObjectStore<R>>,
    limits: ResolverLimits,
}

impl<R: ManagedResource> Clone for ObjectResolver<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            limits: self.limits,
        }
    }
}

impl<R: ManagedResource> ObjectResolver<R> {
    /// Creates a resolver over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore<R>>, limits: ResolverLimits) -> Self {
        Self { store, limits }
    }

    /// Returns the first object in store order whose name or UID equals `name_or_uid`.
    ///
    /// `Ok(None)` means every page was scanned without a match. Hitting the
    /// page cap fails with [`AppError::ResolutionExhausted`] instead.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        name_or_uid: &str,
        options: ListOptions,
    ) -> AppResult<Option<R>> {
        let name_or_uid = name_or_uid.trim();
        if name_or_uid.is_empty() {
            return Err(AppError::Validation(format!(
                "{} name or uid must not be empty",
                R::KIND
            )));
        }

        let namespace = R::KIND.effective_namespace(namespace);
        let page_size = options
            .limit
            .map_or(self.limits.page_size, |limit| {
                limit.clamp(1, self.limits.page_size)
            });
        let mut options = ListOptions {
            limit: Some(page_size),
            ..options
        };

        for page_number in 1..=self.limits.max_pages {
            let page = ctx.run(self.store.list(&namespace, &options)).await?;
            ctx.ensure_active()?;

            if let Some(found) = page
                .items
                .into_iter()
                .find(|item| item.metadata().matches_name_or_uid(name_or_uid))
            {
                debug!(
                    kind = %R::KIND,
                    namespace = %namespace,
                    name_or_uid,
                    page_number,
                    "resolved object"
                );
                return Ok(Some(found));
            }

            match page.continue_token.filter(|token| !token.is_empty()) {
                Some(token) => options.continue_token = Some(token),
                None => {
                    debug!(
                        kind = %R::KIND,
                        namespace = %namespace,
                        name_or_uid,
                        pages = page_number,
                        "object not found"
                    );
                    return Ok(None);
                }
            }
        }

        Err(AppError::ResolutionExhausted(format!(
            "{} '{}' in namespace '{}' was not resolved within {} pages",
            R::KIND,
            name_or_uid,
            namespace,
            self.limits.max_pages
        )))
    }
}
