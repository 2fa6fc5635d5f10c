// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed get/apply helpers with not-found mapping and cancellation

use crate::constants::OPERATOR_NAME;
use crate::error::{AddonError, Result};
use crate::types::ObjectKey;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, Resource,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Fetch a namespaced object, mapping a 404 to [`AddonError::NotFound`]
#[instrument(skip(client), fields(key = %key))]
pub async fn get_namespaced<K>(client: &Client, key: &ObjectKey) -> Result<K>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let api: Api<K> = Api::namespaced(client.clone(), &key.namespace);

    match api.get(&key.name).await {
        Ok(obj) => {
            debug!("Fetched {} {}", K::kind(&K::DynamicType::default()), key);
            Ok(obj)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => Err(AddonError::NotFound {
            kind: K::kind(&K::DynamicType::default()).to_string(),
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Server-side apply an object (create or update) as the addon field manager
#[instrument(skip(client, obj), fields(key = %key))]
pub async fn apply_namespaced<K>(client: &Client, key: &ObjectKey, obj: &K) -> Result<K>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + Serialize + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let api: Api<K> = Api::namespaced(client.clone(), &key.namespace);
    let pp = PatchParams::apply(OPERATOR_NAME).force();

    let applied = api.patch(&key.name, &pp, &Patch::Apply(obj)).await?;
    debug!("Applied {} {}", K::kind(&K::DynamicType::default()), key);
    Ok(applied)
}

/// Run `fut` unless `cancel` fires first
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AddonError::Cancelled),
        res = fut => res,
    }
}
