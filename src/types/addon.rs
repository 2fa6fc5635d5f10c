// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ObjectKey;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Per-cluster addon instance; lives in the managed cluster's namespace on the hub
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "addon.open-cluster-management.io",
    version = "v1alpha1",
    kind = "ManagedClusterAddOn"
)]
#[kube(namespaced)]
#[kube(status = "ManagedClusterAddOnStatus")]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterAddOnSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_namespace: Option<String>,
    /// Config objects in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configs: Vec<AddOnConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddOnConfig {
    #[serde(default)]
    pub group: String,
    pub resource: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

impl AddOnConfig {
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterAddOnStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_references: Vec<ConfigReference>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReference {
    #[serde(default)]
    pub group: String,
    pub resource: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_observed_generation: Option<i64>,
}

impl ManagedClusterAddOn {
    /// Find the first config reference of the given group/resource in the status
    pub fn config_reference(&self, group: &str, resource: &str) -> Option<ObjectKey> {
        self.status
            .as_ref()?
            .config_references
            .iter()
            .find(|r| r.group == group && r.resource == resource)
            .map(|r| ObjectKey::new(&r.namespace, &r.name))
    }

    /// Find the first declared config of the given group/resource in the spec
    pub fn declared_config(&self, group: &str, resource: &str) -> Option<ObjectKey> {
        self.spec
            .configs
            .iter()
            .find(|c| c.group == group && c.resource == resource)
            .map(AddOnConfig::key)
    }
}

/// Addon-framework deployment tuning for an addon instance
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "addon.open-cluster-management.io",
    version = "v1alpha1",
    kind = "AddOnDeploymentConfig"
)]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct AddOnDeploymentConfigSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customized_variables: Vec<CustomizedVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_install_namespace: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct CustomizedVariable {
    pub name: String,
    pub value: String,
}
