use podwarden_core::{AppError, AppResult};
use podwarden_domain::{DeploymentUpdateRequest, PodUpdateRequest};
use serde::Deserialize;

use super::UpdatePodRequest;

/// Allow-listed deployment update body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDeploymentRequest {
    pub replicas: Option<i32>,
    #[serde(default)]
    pub template: UpdatePodRequest,
}

impl TryFrom<UpdateDeploymentRequest> for DeploymentUpdateRequest {
    type Error = AppError;

    fn try_from(value: UpdateDeploymentRequest) -> AppResult<Self> {
        if value.replicas.is_some_and(|replicas| replicas < 0) {
            return Err(AppError::Validation(
                "replicas must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            replicas: value.replicas,
            template: PodUpdateRequest::try_from(value.template)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use podwarden_core::AppError;
    use podwarden_domain::DeploymentUpdateRequest;
    use serde_json::json;

    use super::UpdateDeploymentRequest;

    #[test]
    fn template_patch_is_nested() {
        let body = serde_json::from_value::<UpdateDeploymentRequest>(json!({
            "replicas": 3,
            "template": {"containers": [{"name": "api", "image": "api:2"}]}
        }))
        .unwrap_or_else(|_| unreachable!());

        let request = DeploymentUpdateRequest::try_from(body).unwrap_or_else(|_| unreachable!());

        assert_eq!(request.replicas, Some(3));
        assert_eq!(request.template.containers.len(), 1);
    }

    #[test]
    fn negative_replicas_and_unknown_fields_are_rejected() {
        let negative = serde_json::from_value::<UpdateDeploymentRequest>(json!({"replicas": -1}))
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            DeploymentUpdateRequest::try_from(negative),
            Err(AppError::Validation(_))
        ));
        assert!(
            serde_json::from_value::<UpdateDeploymentRequest>(json!({"strategy": {}})).is_err()
        );
    }
}
