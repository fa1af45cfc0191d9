use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use podwarden_application::{MAX_PAGE_SIZE, ResolverLimits};
use podwarden_core::AppError;
use tracing_subscriber::EnvFilter;

/// Which orchestration store backs the object pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStoreBackend {
    Kubernetes,
    Memory,
}

impl FromStr for ObjectStoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kubernetes" | "k8s" => Ok(Self::Kubernetes),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "OBJECT_STORE_BACKEND must be either 'kubernetes' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub object_store_backend: ObjectStoreBackend,
    pub resolver_limits: ResolverLimits,
    pub request_timeout: Duration,
    pub actor_header: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env_or("API_PORT", 3001_u16)?;

        let object_store_backend = env::var("OBJECT_STORE_BACKEND")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.parse::<ObjectStoreBackend>())
            .transpose()?
            .unwrap_or(ObjectStoreBackend::Kubernetes);

        let resolver_limits = ResolverLimits::new(
            parse_env_or("RESOLVER_PAGE_SIZE", MAX_PAGE_SIZE)?,
            parse_env_or("RESOLVER_MAX_PAGES", 50_u32)?,
        );

        let request_timeout_seconds = parse_env_or("REQUEST_TIMEOUT_SECONDS", 30_u64)?;
        if request_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "REQUEST_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let actor_header = env::var("ACTOR_HEADER")
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "x-remote-user".to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            object_store_backend,
            resolver_limits,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            actor_header,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_optional(name, env::var(name).ok().as_deref(), default)
}

fn parse_optional<T>(name: &str, raw: Option<&str>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
    }
}

#[cfg(test)]
mod tests {
    use podwarden_core::AppError;

    use super::{ObjectStoreBackend, parse_optional};

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!(
            "Kubernetes".parse::<ObjectStoreBackend>().ok(),
            Some(ObjectStoreBackend::Kubernetes)
        );
        assert_eq!(
            " memory ".parse::<ObjectStoreBackend>().ok(),
            Some(ObjectStoreBackend::Memory)
        );
        assert!(matches!(
            "etcd".parse::<ObjectStoreBackend>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn missing_or_blank_values_use_the_default() {
        assert!(matches!(parse_optional("API_PORT", None, 3001_u16), Ok(3001)));
        assert!(matches!(parse_optional("API_PORT", Some("  "), 3001_u16), Ok(3001)));
        assert!(matches!(parse_optional("API_PORT", Some("8080"), 3001_u16), Ok(8080)));
    }

    #[test]
    fn malformed_values_fail_fast() {
        let result = parse_optional("RESOLVER_MAX_PAGES", Some("many"), 50_u32);

        assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("RESOLVER_MAX_PAGES")));
    }
}
