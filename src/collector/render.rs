// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Render the final collector from a template and the aggregated options.

use crate::collector::document::CollectorConfig;
use crate::collector::overlay::{configure_exporters_endpoints, configure_exporters_secrets};
use crate::error::Result;
use crate::options::Options;
use crate::types::collector::{OpenTelemetryCollector, OpenTelemetryCollectorSpec};
use crate::types::Signal;
use k8s_openapi::api::core::v1::{Secret, SecretVolumeSource, Volume, VolumeMount};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use tracing::{debug, instrument};

/// Apply every endpoint overlay, then every secret overlay, to the template's
/// configuration document.
pub fn build_collector_config(options: &Options, signal: Signal) -> Result<CollectorConfig> {
    let annotation = signal.target_output_annotation();
    let mut cfg = CollectorConfig::from_yaml(&options.collector.spec.config)?;

    for cm in &options.config_maps {
        configure_exporters_endpoints(&mut cfg, cm, annotation)?;
    }
    for secret in &options.secrets {
        configure_exporters_secrets(&mut cfg, secret, annotation)?;
    }

    Ok(cfg)
}

/// Mount `secret` read-only at `/<secret-name>`. Already mounted Secrets are skipped.
pub fn configure_volumes(spec: &mut OpenTelemetryCollectorSpec, secret: &Secret) {
    let name = secret.name_any();
    if spec.volumes.iter().any(|v| v.name == name) {
        debug!("Volume {} already present", name);
        return;
    }

    spec.volumes.push(Volume {
        name: name.clone(),
        secret: Some(SecretVolumeSource {
            secret_name: Some(name.clone()),
            ..Default::default()
        }),
        ..Default::default()
    });
    spec.volume_mounts.push(VolumeMount {
        name: name.clone(),
        mount_path: format!("/{}", name),
        read_only: Some(true),
        ..Default::default()
    });
}

/// Produce the collector for one managed cluster. The template is never modified.
#[instrument(skip(options), fields(cluster = %options.cluster_name, collector = %options.collector.name_any()))]
pub fn render_collector(options: &Options, signal: Signal) -> Result<OpenTelemetryCollector> {
    let cfg = build_collector_config(options, signal)?;

    let mut spec = options.collector.spec.clone();
    spec.config = cfg.to_yaml()?;

    let annotation = signal.target_output_annotation();
    for secret in options
        .secrets
        .iter()
        .filter(|s| s.annotations().contains_key(annotation))
    {
        configure_volumes(&mut spec, secret);
    }

    let template = &options.collector.metadata;
    Ok(OpenTelemetryCollector {
        metadata: ObjectMeta {
            name: template.name.clone(),
            namespace: template.namespace.clone(),
            labels: template.labels.clone(),
            ..Default::default()
        },
        spec,
    })
}
