use std::sync::Arc;

use podwarden_core::{AppError, AppResult};
use podwarden_domain::{AuditEventType, ManagedResource, MergeableResource};

use crate::audit_trail::{AuditTarget, AuditTrail};
use crate::{
    AuditLog, ListOptions, MAX_PAGE_SIZE, MutationOptions, ObjectPage, ObjectResolver,
    ObjectStore, RequestContext, ResolverLimits,
};

/// Audited create, update and delete for one managed kind, plus lookups.
///
/// Every successful mutation is preceded by exactly one durable audit write
/// followed by exactly one store call. Updates additionally resolve and merge
/// the stored object before the audit write.
pub struct MutationPipeline<R: ManagedResource> {
    store: Arc<dyn ObjectStore<R>>,
    resolver: ObjectResolver<R>,
    audit_trail: AuditTrail,
}

impl<R: ManagedResource> Clone for MutationPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
            audit_trail: self.audit_trail.clone(),
        }
    }
}

impl<R: ManagedResource> MutationPipeline<R> {
    /// Creates a pipeline over a store and an audit log.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore<R>>,
        audit_log: Arc<dyn AuditLog>,
        limits: ResolverLimits,
    ) -> Self {
        Self {
            resolver: ObjectResolver::new(Arc::clone(&store), limits),
            store,
            audit_trail: AuditTrail::new(audit_log),
        }
    }

    /// Looks up an object by name or UID.
    pub async fn find(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        name_or_uid: &str,
    ) -> AppResult<Option<R>> {
        self.resolver
            .resolve(ctx, namespace, name_or_uid, ListOptions::default())
            .await
    }

    /// Creates an object after recording its audit event.
    ///
    /// The path `namespace` wins over the object's own namespace; when both are
    /// empty namespaced kinds land in the default namespace.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        mut object: R,
        options: MutationOptions,
    ) -> AppResult<R> {
        let requested_namespace = if namespace.trim().is_empty() {
            object.metadata().namespace().to_owned()
        } else {
            namespace.to_owned()
        };
        object.normalize(&requested_namespace);

        let namespace = object.metadata().namespace().to_owned();
        let name = object.metadata().name().to_owned();
        if name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "{} metadata.name must not be empty",
                R::KIND
            )));
        }

        self.audit_trail
            .audited(
                ctx,
                AuditTarget {
                    category: R::KIND.audit_category(),
                    event_type: AuditEventType::Create,
                    namespace: Some(namespace.as_str()),
                    name: name.as_str(),
                    dry_run: options.dry_run,
                },
                self.store.create(&namespace, object, options),
            )
            .await
    }

    /// Deletes an object by name or UID after recording its audit event.
    ///
    /// The object is resolved first so the audit record and the store call
    /// both name the stored object. An unresolvable id fails with
    /// [`AppError::NotFound`] before anything is written.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        name_or_uid: &str,
        options: MutationOptions,
    ) -> AppResult<()> {
        let existing = self.require(ctx, namespace, name_or_uid).await?;
        let namespace = R::KIND.effective_namespace(namespace);
        let name = existing.metadata().name();

        self.audit_trail
            .audited(
                ctx,
                AuditTarget {
                    category: R::KIND.audit_category(),
                    event_type: AuditEventType::Delete,
                    namespace: Some(namespace.as_str()),
                    name,
                    dry_run: options.dry_run,
                },
                self.store.delete(&namespace, name, options),
            )
            .await
    }

    /// Lists one page of objects, passing selectors through to the store.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        options: ListOptions,
    ) -> AppResult<ObjectPage<R>> {
        let namespace = R::KIND.effective_namespace(namespace);
        let options = ListOptions {
            limit: Some(options.limit.map_or(MAX_PAGE_SIZE, |limit| {
                limit.clamp(1, MAX_PAGE_SIZE)
            })),
            ..options
        };

        ctx.run(self.store.list(&namespace, &options)).await
    }

    async fn require(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        name_or_uid: &str,
    ) -> AppResult<R> {
        self.resolver
            .resolve(ctx, namespace, name_or_uid, ListOptions::default())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} '{}' does not exist in namespace '{}'",
                    R::KIND,
                    name_or_uid,
                    R::KIND.effective_namespace(namespace)
                ))
            })
    }
}

impl<R: MergeableResource> MutationPipeline<R> {
    /// Applies an allow-listed update to an existing object.
    ///
    /// Order is fixed: resolve, merge, audit, mutate. An unresolvable id fails
    /// with [`AppError::NotFound`] before anything is written.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        namespace: &str,
        name_or_uid: &str,
        request: &R::UpdateRequest,
        options: MutationOptions,
    ) -> AppResult<R> {
        let existing = self.require(ctx, namespace, name_or_uid).await?;

        let mut merged = R::merge(existing, request);
        let stored_namespace = merged.metadata().namespace().to_owned();
        merged.normalize(&stored_namespace);

        let namespace = merged.metadata().namespace().to_owned();
        let name = merged.metadata().name().to_owned();

        self.audit_trail
            .audited(
                ctx,
                AuditTarget {
                    category: R::KIND.audit_category(),
                    event_type: AuditEventType::Update,
                    namespace: Some(namespace.as_str()),
                    name: name.as_str(),
                    dry_run: options.dry_run,
                },
                self.store.update(&namespace, merged, options),
            )
            .await
    }
}
