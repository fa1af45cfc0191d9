//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod audit_trail;
mod cluster_ports;
mod mutation_pipeline;
mod object_resolver;
mod request_context;
mod user_service;

pub use audit_ports::{AuditEvent, AuditLog, StoredAuditEvent};
pub use cluster_ports::{ListOptions, MAX_PAGE_SIZE, MutationOptions, ObjectPage, ObjectStore};
pub use mutation_pipeline::MutationPipeline;
pub use object_resolver::{ObjectResolver, ResolverLimits};
pub use request_context::{CancellationToken, RequestContext};
pub use user_service::{NewUser, UserRecord, UserRepository, UserService};
