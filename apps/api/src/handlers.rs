pub mod deployments;
pub mod health;
pub mod namespaces;
pub mod pods;
pub mod users;

use podwarden_application::{ListOptions, MutationOptions};
use serde::Deserialize;

/// Query parameters accepted by every mutating route.
#[derive(Debug, Default, Deserialize)]
pub struct MutationQuery {
    #[serde(default)]
    pub dry_run: bool,
}

impl MutationQuery {
    pub fn options(&self) -> MutationOptions {
        MutationOptions {
            dry_run: self.dry_run,
        }
    }
}

/// Query parameters accepted by list routes, in Kubernetes list spelling.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub limit: Option<u32>,
    #[serde(rename = "continue")]
    pub continue_token: Option<String>,
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
}

impl From<ListQuery> for ListOptions {
    fn from(query: ListQuery) -> Self {
        Self {
            limit: query.limit,
            continue_token: query.continue_token.filter(|token| !token.is_empty()),
            label_selector: query.label_selector.filter(|selector| !selector.trim().is_empty()),
            field_selector: query.field_selector.filter(|selector| !selector.trim().is_empty()),
        }
    }
}
