use chrono::Utc;
use podwarden_application::{AuditEvent, AuditLog};
use podwarden_domain::{AuditCategory, AuditEventType};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresAuditLog;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres audit log tests: {error}");
    }

    Some(pool)
}

#[tokio::test]
async fn recorded_event_is_durable_and_returns_its_id() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let audit_log = PostgresAuditLog::new(pool.clone());
    let resource_name = format!("web-{}", uuid::Uuid::new_v4());
    let stored = audit_log
        .record(AuditEvent {
            category: AuditCategory::Deployment,
            event_type: AuditEventType::Update,
            occurred_at: Utc::now(),
            owner_subject: "alice".to_owned(),
            resource_namespace: Some("prod".to_owned()),
            resource_name: resource_name.clone(),
        })
        .await;
    let Ok(stored) = stored else {
        panic!("audit insert failed");
    };

    let row = sqlx::query_as::<_, (String, String, String, Option<String>)>(
        r#"
        SELECT category, event_type, owner_subject, resource_namespace
        FROM audit_events
        WHERE id = $1
        "#,
    )
    .bind(stored.event_id)
    .fetch_one(&pool)
    .await;

    assert_eq!(
        row.ok(),
        Some((
            "deployment".to_owned(),
            "update".to_owned(),
            "alice".to_owned(),
            Some("prod".to_owned()),
        ))
    );
}

#[tokio::test]
async fn cluster_scoped_event_has_no_namespace() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let audit_log = PostgresAuditLog::new(pool.clone());
    let stored = audit_log
        .record(AuditEvent {
            category: AuditCategory::Namespace,
            event_type: AuditEventType::Delete,
            occurred_at: Utc::now(),
            owner_subject: "alice".to_owned(),
            resource_namespace: None,
            resource_name: "team-a".to_owned(),
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let namespace = sqlx::query_scalar::<_, Option<String>>(
        "SELECT resource_namespace FROM audit_events WHERE id = $1",
    )
    .bind(stored.event_id)
    .fetch_one(&pool)
    .await;

    assert!(matches!(namespace, Ok(None)));
}
