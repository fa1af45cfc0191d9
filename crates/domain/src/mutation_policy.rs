//! Field-level merge rules for allow-listed updates.
//!
//! | field                            | rule                               |
//! |----------------------------------|------------------------------------|
//! | container / init-container image | overwrite when the name is known   |
//! | tolerations                      | append, never dedupe or remove     |
//! | `activeDeadlineSeconds`          | overwrite, `None` clears           |
//! | `terminationGracePeriodSeconds`  | set once, ignored when already set |
//!
//! Every other field is moved through from the stored object untouched.

use std::collections::HashMap;

use crate::{Container, ContainerPatch, PodSpec, PodUpdateRequest, Toleration};

/// Merges an allow-listed request into a stored pod spec.
#[must_use]
pub fn merge_pod_spec(existing: PodSpec, request: &PodUpdateRequest) -> PodSpec {
    let PodSpec {
        containers,
        init_containers,
        tolerations,
        active_deadline_seconds: _,
        termination_grace_period_seconds,
        extra,
    } = existing;

    PodSpec {
        containers: patch_container_images(containers, &request.containers),
        init_containers: patch_container_images(init_containers, &request.init_containers),
        tolerations: append_tolerations(tolerations, request),
        active_deadline_seconds: request.active_deadline_seconds,
        termination_grace_period_seconds: termination_grace_period_seconds
            .or(request.termination_grace_period_seconds),
        extra,
    }
}

/// Overwrites the image of every stored container named by a patch.
///
/// Output order follows the stored containers; patches for unknown names are
/// dropped. When a request names the same container twice the last patch wins.
#[must_use]
pub fn patch_container_images(
    existing: Vec<Container>,
    patches: &[ContainerPatch],
) -> Vec<Container> {
    if patches.is_empty() {
        return existing;
    }

    let images_by_name: HashMap<&str, &str> = patches
        .iter()
        .map(|patch| (patch.name.as_str(), patch.image.as_str()))
        .collect();

    existing
        .into_iter()
        .map(|mut container| {
            if let Some(image) = images_by_name.get(container.name.as_str()) {
                container.image = Some((*image).to_owned());
            }
            container
        })
        .collect()
}

fn append_tolerations(existing: Vec<Toleration>, request: &PodUpdateRequest) -> Vec<Toleration> {
    let mut tolerations = existing;
    tolerations.extend(
        request
            .toleration_additions
            .iter()
            .cloned()
            .map(Toleration::from),
    );
    tolerations
}
