// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Addon reconciler - builds options for each addon instance and publishes the
//! rendered collector into the managed cluster's namespace.
//!
//! Collector template changes re-render every addon referencing the template.
//! The ConfigMaps and Secrets an addon reads are picked up on the periodic resync.

use crate::collector::render_collector;
use crate::config::Config;
use crate::constants::{data_keys, resources, ADDON_NAME};
use crate::error::{AddonError, Result};
use crate::kubernetes::{apply_namespaced, cancellable, get_namespaced};
use crate::options::build_options;
use crate::types::{AddOnDeploymentConfig, ManagedClusterAddOn, ObjectKey, OpenTelemetryCollector};
use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    api::ObjectMeta,
    runtime::{controller::Action, reflector::ObjectRef, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

pub struct AddonReconciler {
    client: Client,
    config: Config,
    shutdown: CancellationToken,
}

impl AddonReconciler {
    pub fn new(client: Client, config: Config, shutdown: CancellationToken) -> Self {
        Self {
            client,
            config,
            shutdown,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addons: Api<ManagedClusterAddOn> = Api::all(self.client.clone());
        let collectors: Api<OpenTelemetryCollector> = Api::all(self.client.clone());
        let shutdown = self.shutdown.clone();
        let context = Arc::new(self);

        let controller = Controller::new(addons, WatcherConfig::default());
        let store = controller.store();
        let controller = controller
            .watches(collectors, WatcherConfig::default(), move |collector| {
                addons_referencing(&store.state(), &collector)
            })
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled addon: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            });

        tokio::select! {
            _ = controller => warn!("Addon controller stream ended"),
            _ = shutdown.cancelled() => info!("Shutdown requested, stopping addon reconciler"),
        }

        Ok(())
    }
}

async fn reconcile(addon: Arc<ManagedClusterAddOn>, ctx: Arc<AddonReconciler>) -> Result<Action> {
    if addon.name_any() != ADDON_NAME {
        debug!("Skipping addon {}", addon.name_any());
        return Ok(Action::await_change());
    }

    let cancel = ctx.shutdown.child_token();
    reconcile_addon(&ctx.client, &ctx.config, &addon, &cancel).await?;

    Ok(Action::requeue(Duration::from_secs(ctx.config.resync_secs)))
}

/// Addon instances whose collector config reference points at `collector`
fn addons_referencing(
    addons: &[Arc<ManagedClusterAddOn>],
    collector: &OpenTelemetryCollector,
) -> Vec<ObjectRef<ManagedClusterAddOn>> {
    let key = ObjectKey::new(
        &collector.namespace().unwrap_or_default(),
        &collector.name_any(),
    );

    addons
        .iter()
        .filter(|addon| addon.name_any() == ADDON_NAME)
        .filter(|addon| {
            addon
                .config_reference(resources::OPENTELEMETRY_GROUP, resources::OPENTELEMETRY_COLLECTORS)
                .is_some_and(|reference| reference == key)
        })
        .map(|addon| ObjectRef::from_obj(addon.as_ref()))
        .collect()
}

/// Build, render and publish the collector for one addon instance
#[instrument(skip(client, config, addon, cancel), fields(cluster = %addon.namespace().unwrap_or_default()))]
pub async fn reconcile_addon(
    client: &Client,
    config: &Config,
    addon: &ManagedClusterAddOn,
    cancel: &CancellationToken,
) -> Result<ConfigMap> {
    let deployment_config = get_deployment_config(client, addon, cancel).await?;
    let options = build_options(
        client,
        config.signal,
        addon,
        deployment_config.as_ref(),
        cancel,
    )
    .await?;

    let collector = render_collector(&options, config.signal)?;
    let rendered = serde_yaml::to_string(&collector)?;

    let key = ObjectKey::new(&options.cluster_name, &config.rendered_configmap_name());
    let cm = ConfigMap {
        metadata: ObjectMeta {
            name: Some(key.name.clone()),
            namespace: Some(key.namespace.clone()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            data_keys::RENDERED_COLLECTOR.to_string(),
            rendered,
        )])),
        ..Default::default()
    };

    let applied = cancellable(cancel, apply_namespaced(client, &key, &cm)).await?;
    info!("Published rendered collector to ConfigMap {}", key);
    Ok(applied)
}

/// The deployment config is optional; a declared but missing one is logged and ignored.
async fn get_deployment_config(
    client: &Client,
    addon: &ManagedClusterAddOn,
    cancel: &CancellationToken,
) -> Result<Option<AddOnDeploymentConfig>> {
    let Some(key) = addon.declared_config(resources::ADDON_GROUP, resources::ADDON_DEPLOYMENT_CONFIGS)
    else {
        return Ok(None);
    };

    match cancellable(cancel, get_namespaced(client, &key)).await {
        Ok(adoc) => Ok(Some(adoc)),
        Err(e) if e.is_not_found() => {
            warn!("AddOnDeploymentConfig {} not found, continuing without it", key);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn error_policy(
    _addon: Arc<ManagedClusterAddOn>,
    error: &AddonError,
    ctx: Arc<AddonReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(Duration::from_secs(ctx.config.requeue_secs))
}
