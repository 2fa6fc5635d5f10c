// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Label/annotation based classification of addon config objects.
//!
//! Classification only looks at metadata, never at the data payload. A
//! ConfigMap without the target-output annotation is the authentication
//! definition; that absence is the signal, not an error.

use crate::constants::labels;
use crate::types::Signal;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::ResourceExt;

/// Role a ConfigMap or Secret plays for the reconciled signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Not labelled for this signal
    Irrelevant,
    /// ConfigMap mapping target outputs to authentication methods
    AuthDefinition,
    /// Secret holding the CA bundle to inject into mTLS material
    CaBundle,
    /// Endpoint (ConfigMap) or credentials (Secret) for an exporter
    ExporterConfig,
}

/// A config object declared on an addon instance
#[derive(Debug, Clone)]
pub enum ManagedObject {
    ConfigMap(ConfigMap),
    Secret(Secret),
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    signal: Signal,
}

impl Classifier {
    pub fn new(signal: Signal) -> Self {
        Self { signal }
    }

    pub fn classify(&self, obj: &ManagedObject) -> ResourceKind {
        match obj {
            ManagedObject::ConfigMap(cm) => self.classify_config_map(cm),
            ManagedObject::Secret(secret) => self.classify_secret(secret),
        }
    }

    pub fn classify_config_map(&self, cm: &ConfigMap) -> ResourceKind {
        if !self.is_signal_resource(cm) {
            return ResourceKind::Irrelevant;
        }
        if self.exporter_name(cm).is_none() {
            return ResourceKind::AuthDefinition;
        }
        ResourceKind::ExporterConfig
    }

    pub fn classify_secret(&self, secret: &Secret) -> ResourceKind {
        if !self.is_signal_resource(secret) {
            return ResourceKind::Irrelevant;
        }
        if secret.annotations().contains_key(self.signal.ca_annotation()) {
            return ResourceKind::CaBundle;
        }
        ResourceKind::ExporterConfig
    }

    /// Check the signal label matches the reconciled signal
    pub fn is_signal_resource<K: ResourceExt>(&self, obj: &K) -> bool {
        obj.labels()
            .get(labels::SIGNAL)
            .is_some_and(|v| v == self.signal.as_str())
    }

    /// Exporter a ConfigMap or Secret is correlated with, if annotated
    pub fn exporter_name<'a, K: ResourceExt>(&self, obj: &'a K) -> Option<&'a str> {
        obj.annotations()
            .get(self.signal.target_output_annotation())
            .map(String::as_str)
    }
}
