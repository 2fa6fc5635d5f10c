// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Collects everything the collector renderer needs for one addon instance.

use crate::auth::{build_authentication_map, resolve_ca, AuthConfig, SecretsProvider};
use crate::classify::{Classifier, ManagedObject, ResourceKind};
use crate::constants::resources;
use crate::error::{AddonError, Result};
use crate::kubernetes::{cancellable, get_namespaced};
use crate::types::addon::AddOnConfig;
use crate::types::{AddOnDeploymentConfig, ManagedClusterAddOn, ObjectKey, OpenTelemetryCollector, Signal};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Input for rendering one addon instance. Built fresh per reconciliation.
#[derive(Debug, Clone)]
pub struct Options {
    pub collector: OpenTelemetryCollector,
    /// Managed cluster name, which is also the addon's namespace on the hub
    pub cluster_name: String,
    /// Exporter ConfigMaps in declaration order
    pub config_maps: Vec<ConfigMap>,
    /// Exporter Secrets in declaration order, followed by resolved auth Secrets
    pub secrets: Vec<Secret>,
    pub deployment_config: Option<AddOnDeploymentConfig>,
}

/// Build the options for `addon`: fetch the collector template, classify the
/// declared configs and provision authentication Secrets when an auth
/// ConfigMap is present.
#[instrument(
    skip(client, addon, deployment_config, cancel),
    fields(addon = %addon.name_any(), cluster = %addon.namespace().unwrap_or_default())
)]
pub async fn build_options(
    client: &Client,
    signal: Signal,
    addon: &ManagedClusterAddOn,
    deployment_config: Option<&AddOnDeploymentConfig>,
    cancel: &CancellationToken,
) -> Result<Options> {
    if cancel.is_cancelled() {
        return Err(AddonError::Cancelled);
    }

    let cluster_name = addon.namespace().unwrap_or_default();
    let collector = get_collector_template(client, addon, cancel).await?;
    info!(
        "OpenTelemetry Collector template {}/{} found",
        collector.namespace().unwrap_or_default(),
        collector.name_any()
    );

    let mut options = Options {
        collector,
        cluster_name,
        config_maps: Vec::new(),
        secrets: Vec::new(),
        deployment_config: deployment_config.cloned(),
    };

    let classifier = Classifier::new(signal);
    let mut auth_cm: Option<ConfigMap> = None;
    let mut ca_secret: Option<Secret> = None;

    for config in &addon.spec.configs {
        let Some(obj) = fetch_managed_object(client, config, cancel).await? else {
            continue;
        };
        match (classifier.classify(&obj), obj) {
            (ResourceKind::AuthDefinition, ManagedObject::ConfigMap(cm)) => {
                replace_slot(&mut auth_cm, cm, "auth ConfigMap");
            }
            (ResourceKind::CaBundle, ManagedObject::Secret(secret)) => {
                replace_slot(&mut ca_secret, secret, "CA Secret");
            }
            (ResourceKind::ExporterConfig, ManagedObject::ConfigMap(cm)) => {
                options.config_maps.push(cm)
            }
            (ResourceKind::ExporterConfig, ManagedObject::Secret(secret)) => {
                options.secrets.push(secret)
            }
            _ => debug!("{} {} is not relevant for {}", config.resource, config.key(), signal),
        }
    }

    // A CA Secret is validated whether or not any target ends up using it
    if resolve_ca(ca_secret.as_ref())?.is_none() {
        warn!("No CA was found, proceeding without CA injection");
    }

    let Some(auth_cm) = auth_cm else {
        info!("No auth ConfigMap found, authentication not configured");
        return Ok(options);
    };

    let provider = SecretsProvider::new(
        &options.cluster_name,
        signal,
        AuthConfig::template(signal),
    );
    let requests = provider.generate_secrets(
        cancel,
        &build_authentication_map(&auth_cm),
        ca_secret.as_ref(),
    )?;
    let resolved = provider
        .fetch_secrets(client, cancel, &requests, signal.target_output_annotation())
        .await?;
    options.secrets.extend(resolved);

    Ok(options)
}

async fn get_collector_template(
    client: &Client,
    addon: &ManagedClusterAddOn,
    cancel: &CancellationToken,
) -> Result<OpenTelemetryCollector> {
    let key = addon
        .config_reference(resources::OPENTELEMETRY_GROUP, resources::OPENTELEMETRY_COLLECTORS)
        .ok_or_else(|| AddonError::NotFound {
            kind: "OpenTelemetryCollector".to_string(),
            namespace: addon.namespace().unwrap_or_default(),
            name: format!("<config reference of {}>", addon.name_any()),
        })?;

    info!("Retrieving OpenTelemetry Collector template {}", key);
    cancellable(cancel, get_namespaced(client, &key)).await
}

/// Fetch a declared ConfigMap or Secret; other config resources are not ours to read
async fn fetch_managed_object(
    client: &Client,
    config: &AddOnConfig,
    cancel: &CancellationToken,
) -> Result<Option<ManagedObject>> {
    let obj = match config.resource.as_str() {
        resources::CONFIG_MAPS => fetch_config::<ConfigMap>(client, config, cancel)
            .await?
            .map(ManagedObject::ConfigMap),
        resources::SECRETS => fetch_config::<Secret>(client, config, cancel)
            .await?
            .map(ManagedObject::Secret),
        _ => None,
    };
    Ok(obj)
}

/// Fetch a declared config object. Any failure other than cancellation is
/// logged and the object skipped.
async fn fetch_config<K>(
    client: &Client,
    config: &AddOnConfig,
    cancel: &CancellationToken,
) -> Result<Option<K>>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let key: ObjectKey = config.key();
    info!("Processing {} {}", config.resource, key);

    match cancellable(cancel, get_namespaced::<K>(client, &key)).await {
        Ok(obj) => Ok(Some(obj)),
        Err(AddonError::Cancelled) => Err(AddonError::Cancelled),
        Err(e) => {
            error!("There was a problem processing {} {}: {}", config.resource, key, e);
            Ok(None)
        }
    }
}

/// Fill a single-slot input; a second candidate replaces the first with a warning
fn replace_slot<K: ResourceExt>(slot: &mut Option<K>, candidate: K, label: &'static str) {
    let current = format!(
        "{}/{}",
        candidate.namespace().unwrap_or_default(),
        candidate.name_any()
    );

    if let Some(previous) = slot.as_ref() {
        let conflict = AddonError::ClassificationConflict {
            slot: label,
            previous: format!(
                "{}/{}",
                previous.namespace().unwrap_or_default(),
                previous.name_any()
            ),
            current: current.clone(),
        };
        warn!("{}", conflict);
    }

    info!("{} set: {}", label, current);
    *slot = Some(candidate);
}
