//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod cluster_connection;
mod in_memory_audit_log;
mod in_memory_object_store;
mod kube_object_store;
mod postgres_audit_log;
mod postgres_user_repository;

pub use cluster_connection::ClusterConnection;
pub use in_memory_audit_log::InMemoryAuditLog;
pub use in_memory_object_store::InMemoryObjectStore;
pub use kube_object_store::KubeObjectStore;
pub use postgres_audit_log::PostgresAuditLog;
pub use postgres_user_repository::PostgresUserRepository;
