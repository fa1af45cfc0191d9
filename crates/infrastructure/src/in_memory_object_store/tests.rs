use std::collections::BTreeMap;

use podwarden_application::{ListOptions, MutationOptions, ObjectStore};
use podwarden_core::AppError;
use podwarden_domain::{Namespace, ObjectMeta, Pod};

use super::InMemoryObjectStore;

fn pod(namespace: &str, name: &str, app: &str) -> Pod {
    Pod {
        api_version: "v1".to_owned(),
        kind: "Pod".to_owned(),
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            labels: BTreeMap::from([("app".to_owned(), app.to_owned())]),
            ..ObjectMeta::default()
        },
        ..Pod::default()
    }
}

fn names(pods: &[Pod]) -> Vec<&str> {
    pods.iter().map(|pod| pod.metadata.name()).collect()
}

#[tokio::test]
async fn list_pages_through_namespace_in_creation_order() {
    let store = InMemoryObjectStore::with_objects(vec![
        pod("default", "a", "web"),
        pod("other", "x", "web"),
        pod("default", "b", "web"),
        pod("default", "c", "db"),
    ]);

    let first = store
        .list(
            "default",
            &ListOptions {
                limit: Some(2),
                ..ListOptions::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(names(&first.items), vec!["a", "b"]);
    assert_eq!(first.continue_token.as_deref(), Some("2"));

    let second = store
        .list(
            "default",
            &ListOptions {
                limit: Some(2),
                continue_token: first.continue_token,
                ..ListOptions::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(names(&second.items), vec!["c"]);
    assert_eq!(second.continue_token, None);
}

#[tokio::test]
async fn list_applies_label_and_field_selectors() {
    let store = InMemoryObjectStore::with_objects(vec![
        pod("default", "a", "web"),
        pod("default", "b", "db"),
        pod("default", "c", "web"),
    ]);

    let by_label = store
        .list(
            "default",
            &ListOptions {
                label_selector: Some("app=web".to_owned()),
                ..ListOptions::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(names(&by_label.items), vec!["a", "c"]);

    let by_field = store
        .list(
            "default",
            &ListOptions {
                label_selector: Some("app!=db".to_owned()),
                field_selector: Some("metadata.name!=a".to_owned()),
                ..ListOptions::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(names(&by_field.items), vec!["c"]);
}

#[tokio::test]
async fn unsupported_field_selector_is_rejected() {
    let store: InMemoryObjectStore<Pod> = InMemoryObjectStore::new();

    let result = store
        .list(
            "default",
            &ListOptions {
                field_selector: Some("status.phase=Running".to_owned()),
                ..ListOptions::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_assigns_uid_and_rejects_duplicates() {
    let store = InMemoryObjectStore::new();

    let created = store
        .create("default", pod("default", "web", "web"), MutationOptions::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    let duplicate = store
        .create("default", pod("default", "web", "web"), MutationOptions::default())
        .await;

    assert!(!created.metadata.uid().is_empty());
    assert_eq!(created.metadata.resource_version.as_deref(), Some("1"));
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_keeps_uid_and_enforces_resource_version() {
    let store = InMemoryObjectStore::new();
    let created = store
        .create("default", pod("default", "web", "web"), MutationOptions::default())
        .await
        .unwrap_or_else(|_| unreachable!());

    let mut changed = created.clone();
    changed.metadata.labels.insert("tier".to_owned(), "front".to_owned());
    let updated = store
        .update("default", changed.clone(), MutationOptions::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    let stale = store
        .update("default", changed, MutationOptions::default())
        .await;

    assert_eq!(updated.metadata.uid, created.metadata.uid);
    assert_ne!(updated.metadata.resource_version, created.metadata.resource_version);
    assert!(matches!(stale, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_and_delete_of_missing_object_are_not_found() {
    let store = InMemoryObjectStore::new();

    let updated = store
        .update("default", pod("default", "ghost", "web"), MutationOptions::default())
        .await;
    let deleted = store
        .delete("default", "ghost", MutationOptions::default())
        .await;

    assert!(matches!(updated, Err(AppError::NotFound(_))));
    assert!(matches!(deleted, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let store = InMemoryObjectStore::with_objects(vec![pod("default", "a", "web")]);

    let created = store
        .create("default", pod("default", "b", "web"), MutationOptions { dry_run: true })
        .await;
    let deleted = store
        .delete("default", "a", MutationOptions { dry_run: true })
        .await;

    assert!(created.is_ok());
    assert!(deleted.is_ok());
    assert_eq!(names(&store.snapshot().await), vec!["a"]);
}

#[tokio::test]
async fn cluster_scoped_objects_list_without_namespace() {
    let store = InMemoryObjectStore::with_objects(vec![
        Namespace::named("team-a"),
        Namespace::named("team-b"),
    ]);

    let page = store
        .list("", &ListOptions::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    let deleted = store.delete("", "team-a", MutationOptions::default()).await;

    assert_eq!(page.items.len(), 2);
    assert!(deleted.is_ok());
    assert_eq!(store.snapshot().await.len(), 1);
}
