use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use podwarden_application::{ListOptions, MutationOptions, ObjectPage, ObjectStore};
use podwarden_core::{AppError, AppResult};
use podwarden_domain::{ManagedResource, ObjectMeta};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory object store for one kind, ordered by creation.
///
/// Continue tokens are offsets into the filtered list. Stored objects get a
/// UID on create and a fresh resource version on every write.
#[derive(Debug)]
pub struct InMemoryObjectStore<R> {
    objects: RwLock<Vec<R>>,
    revision: AtomicU64,
}

impl<R: ManagedResource> InMemoryObjectStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Creates a store holding `objects` in the given order.
    #[must_use]
    pub fn with_objects(objects: Vec<R>) -> Self {
        Self {
            revision: AtomicU64::new(objects.len() as u64),
            objects: RwLock::new(objects),
        }
    }

    /// Returns a snapshot of every stored object.
    pub async fn snapshot(&self) -> Vec<R> {
        self.objects.read().await.clone()
    }

    fn next_revision(&self) -> String {
        (self.revision.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

impl<R: ManagedResource> Default for InMemoryObjectStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ManagedResource> ObjectStore<R> for InMemoryObjectStore<R> {
    async fn list(&self, namespace: &str, options: &ListOptions) -> AppResult<ObjectPage<R>> {
        let labels = parse_label_selector(options.label_selector.as_deref())?;
        let fields = parse_field_selector(options.field_selector.as_deref())?;
        let offset = match options.continue_token.as_deref() {
            None | Some("") => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                AppError::Validation(format!("invalid continue token '{token}'"))
            })?,
        };

        let objects = self.objects.read().await;
        let matching: Vec<&R> = objects
            .iter()
            .filter(|object| in_namespace(object.metadata(), namespace))
            .filter(|object| labels.iter().all(|term| term.matches(object.metadata())))
            .filter(|object| fields.iter().all(|term| term.matches(object.metadata())))
            .collect();

        let limit = options
            .limit
            .map_or(usize::MAX, |limit| limit.max(1) as usize);
        let end = offset.saturating_add(limit).min(matching.len());
        let items = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|object| (*object).clone())
            .collect();
        let continue_token = (end < matching.len()).then(|| end.to_string());

        Ok(ObjectPage {
            items,
            continue_token,
        })
    }

    async fn create(&self, namespace: &str, mut object: R, options: MutationOptions) -> AppResult<R> {
        let name = object.metadata().name().to_owned();
        let mut objects = self.objects.write().await;
        if objects
            .iter()
            .any(|stored| same_object(stored.metadata(), namespace, &name))
        {
            return Err(AppError::Conflict(format!(
                "{} '{}' already exists",
                R::KIND,
                name
            )));
        }

        let metadata = object.metadata_mut();
        metadata.uid = Some(Uuid::new_v4().to_string());
        metadata.resource_version = Some(self.next_revision());

        if !options.dry_run {
            objects.push(object.clone());
        }
        Ok(object)
    }

    async fn update(&self, namespace: &str, mut object: R, options: MutationOptions) -> AppResult<R> {
        let name = object.metadata().name().to_owned();
        let mut objects = self.objects.write().await;
        let Some(slot) = objects
            .iter_mut()
            .find(|stored| same_object(stored.metadata(), namespace, &name))
        else {
            return Err(AppError::NotFound(format!(
                "{} '{}' does not exist",
                R::KIND,
                name
            )));
        };

        if let Some(expected) = object.metadata().resource_version.as_deref()
            && slot.metadata().resource_version.as_deref() != Some(expected)
        {
            return Err(AppError::Conflict(format!(
                "{} '{}' was modified concurrently",
                R::KIND,
                name
            )));
        }

        let uid = slot.metadata().uid.clone();
        let metadata = object.metadata_mut();
        metadata.uid = uid;
        metadata.resource_version = Some(self.next_revision());

        if !options.dry_run {
            *slot = object.clone();
        }
        Ok(object)
    }

    async fn delete(&self, namespace: &str, name: &str, options: MutationOptions) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        let Some(position) = objects
            .iter()
            .position(|stored| same_object(stored.metadata(), namespace, name))
        else {
            return Err(AppError::NotFound(format!(
                "{} '{}' does not exist",
                R::KIND,
                name
            )));
        };

        if !options.dry_run {
            objects.remove(position);
        }
        Ok(())
    }
}

fn in_namespace(metadata: &ObjectMeta, namespace: &str) -> bool {
    namespace.is_empty() || metadata.namespace() == namespace
}

fn same_object(metadata: &ObjectMeta, namespace: &str, name: &str) -> bool {
    metadata.namespace() == namespace && metadata.name() == name
}

#[derive(Debug, PartialEq, Eq)]
enum LabelTerm {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    Absent(String),
}

impl LabelTerm {
    fn matches(&self, metadata: &ObjectMeta) -> bool {
        match self {
            Self::Equals(key, value) => metadata.labels.get(key) == Some(value),
            Self::NotEquals(key, value) => metadata.labels.get(key) != Some(value),
            Self::Exists(key) => metadata.labels.contains_key(key),
            Self::Absent(key) => !metadata.labels.contains_key(key),
        }
    }
}

fn parse_label_selector(selector: Option<&str>) -> AppResult<Vec<LabelTerm>> {
    selector_terms(selector)
        .map(|term| {
            if let Some((key, value)) = term.split_once("!=") {
                return Ok(LabelTerm::NotEquals(key.trim().to_owned(), value.trim().to_owned()));
            }
            if let Some((key, value)) = term.split_once("==").or_else(|| term.split_once('=')) {
                return Ok(LabelTerm::Equals(key.trim().to_owned(), value.trim().to_owned()));
            }
            if let Some(key) = term.strip_prefix('!') {
                return Ok(LabelTerm::Absent(key.trim().to_owned()));
            }
            if term.contains(char::is_whitespace) {
                return Err(AppError::Validation(format!(
                    "unsupported label selector term '{term}'"
                )));
            }
            Ok(LabelTerm::Exists(term.to_owned()))
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
struct FieldTerm {
    field: FieldPath,
    value: String,
    negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldPath {
    Name,
    Namespace,
}

impl FieldTerm {
    fn matches(&self, metadata: &ObjectMeta) -> bool {
        let actual = match self.field {
            FieldPath::Name => metadata.name(),
            FieldPath::Namespace => metadata.namespace(),
        };
        (actual == self.value) != self.negated
    }
}

fn parse_field_selector(selector: Option<&str>) -> AppResult<Vec<FieldTerm>> {
    selector_terms(selector)
        .map(|term| {
            let (path, value, negated) = if let Some((path, value)) = term.split_once("!=") {
                (path, value, true)
            } else if let Some((path, value)) =
                term.split_once("==").or_else(|| term.split_once('='))
            {
                (path, value, false)
            } else {
                return Err(AppError::Validation(format!(
                    "field selector term '{term}' needs an operator"
                )));
            };

            let field = match path.trim() {
                "metadata.name" => FieldPath::Name,
                "metadata.namespace" => FieldPath::Namespace,
                other => {
                    return Err(AppError::Validation(format!(
                        "unsupported field selector '{other}'"
                    )));
                }
            };

            Ok(FieldTerm {
                field,
                value: value.trim().to_owned(),
                negated,
            })
        })
        .collect()
}

fn selector_terms(selector: Option<&str>) -> impl Iterator<Item = &str> {
    selector
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests;
