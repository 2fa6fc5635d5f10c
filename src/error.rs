// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddonError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("Missing field '{key}' in {resource}")]
    MissingField { resource: String, key: String },

    #[error("Malformed collector configuration: {0}")]
    MalformedConfig(String),

    #[error("{slot} already set to {previous}, replacing with {current}")]
    ClassificationConflict {
        slot: &'static str,
        previous: String,
        current: String,
    },

    #[error("Reconciliation cancelled")]
    Cancelled,

    #[error("Invalid collector configuration YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unknown signal: {0}")]
    InvalidSignal(String),
}

impl AddonError {
    /// True when a required upstream object could not be fetched
    pub fn is_not_found(&self) -> bool {
        matches!(self, AddonError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, AddonError>;
