// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resources and value types shared across the addon.

pub mod addon;
pub mod certificate;
pub mod collector;
pub mod signal;

pub use addon::{AddOnDeploymentConfig, ManagedClusterAddOn};
pub use certificate::Certificate;
pub use collector::OpenTelemetryCollector;
pub use signal::Signal;

use std::fmt;

/// Namespace-qualified object name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
