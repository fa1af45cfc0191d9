use podwarden_core::{AppError, AppResult};
use podwarden_domain::{ContainerPatch, PodUpdateRequest, TolerationAddition};
use serde::Deserialize;

/// Allow-listed pod update body. Any other field is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePodRequest {
    #[serde(default)]
    pub containers: Vec<ContainerImageRequest>,
    #[serde(default)]
    pub init_containers: Vec<ContainerImageRequest>,
    #[serde(default)]
    pub tolerations: Vec<TolerationRequest>,
    pub active_deadline_seconds: Option<i64>,
    pub termination_grace_period_seconds: Option<i64>,
}

/// New image for a named container.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerImageRequest {
    pub name: String,
    pub image: String,
}

/// Toleration to append.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TolerationRequest {
    pub key: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
    pub effect: Option<String>,
    pub toleration_seconds: Option<i64>,
}

impl TryFrom<UpdatePodRequest> for PodUpdateRequest {
    type Error = AppError;

    fn try_from(value: UpdatePodRequest) -> AppResult<Self> {
        if let Some(seconds) = value.active_deadline_seconds
            && seconds <= 0
        {
            return Err(AppError::Validation(
                "activeDeadlineSeconds must be positive".to_owned(),
            ));
        }
        if let Some(seconds) = value.termination_grace_period_seconds
            && seconds < 0
        {
            return Err(AppError::Validation(
                "terminationGracePeriodSeconds must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            containers: container_patches(value.containers)?,
            init_containers: container_patches(value.init_containers)?,
            toleration_additions: value
                .tolerations
                .into_iter()
                .map(|toleration| TolerationAddition {
                    key: toleration.key,
                    operator: toleration.operator,
                    value: toleration.value,
                    effect: toleration.effect,
                    toleration_seconds: toleration.toleration_seconds,
                })
                .collect(),
            active_deadline_seconds: value.active_deadline_seconds,
            termination_grace_period_seconds: value.termination_grace_period_seconds,
        })
    }
}

fn container_patches(requests: Vec<ContainerImageRequest>) -> AppResult<Vec<ContainerPatch>> {
    requests
        .into_iter()
        .map(|request| {
            if request.name.trim().is_empty() || request.image.trim().is_empty() {
                return Err(AppError::Validation(
                    "container patches need a name and an image".to_owned(),
                ));
            }
            Ok(ContainerPatch::new(request.name, request.image))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use podwarden_core::AppError;
    use podwarden_domain::{ContainerPatch, PodUpdateRequest};
    use serde_json::json;

    use super::UpdatePodRequest;

    #[test]
    fn body_converts_to_allow_listed_request() {
        let body = serde_json::from_value::<UpdatePodRequest>(json!({
            "containers": [{"name": "nginx", "image": "nginx:1.27"}],
            "tolerations": [{"key": "gpu", "operator": "Exists"}],
            "terminationGracePeriodSeconds": 30
        }))
        .unwrap_or_else(|_| unreachable!());

        let request = PodUpdateRequest::try_from(body).unwrap_or_else(|_| unreachable!());

        assert_eq!(request.containers, vec![ContainerPatch::new("nginx", "nginx:1.27")]);
        assert_eq!(request.toleration_additions.len(), 1);
        assert_eq!(request.termination_grace_period_seconds, Some(30));
        assert_eq!(request.active_deadline_seconds, None);
    }

    #[test]
    fn fields_outside_the_allow_list_are_rejected() {
        for body in [
            json!({"metadata": {"labels": {"team": "x"}}}),
            json!({"containers": [{"name": "nginx", "image": "v2", "command": ["sh"]}]}),
            json!({"nodeName": "worker-1"}),
        ] {
            assert!(serde_json::from_value::<UpdatePodRequest>(body).is_err());
        }
    }

    #[test]
    fn blank_container_patch_is_invalid() {
        let body = UpdatePodRequest {
            containers: vec![super::ContainerImageRequest {
                name: " ".to_owned(),
                image: "v2".to_owned(),
            }],
            ..UpdatePodRequest::default()
        };

        assert!(matches!(
            PodUpdateRequest::try_from(body),
            Err(AppError::Validation(_))
        ));
    }
}
