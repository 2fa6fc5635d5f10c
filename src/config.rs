// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::Signal;
use anyhow::{Context, Result};
use std::env;

const DEFAULT_REQUEUE_SECS: u64 = 60;
const DEFAULT_RESYNC_SECS: u64 = 300;
const DEFAULT_RENDERED_CONFIGMAP_SUFFIX: &str = "collector-rendered";

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Signal family this process reconciles
    pub signal: Signal,
    /// Backoff before a failed reconciliation is retried
    pub requeue_secs: u64,
    /// Interval after which a successfully rendered addon is rendered again
    pub resync_secs: u64,
    /// The rendered collector is published as ConfigMap `<signal>-<suffix>`
    pub rendered_configmap_suffix: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signal = match lookup("SIGNAL") {
            Some(value) => value
                .parse()
                .with_context(|| format!("SIGNAL environment variable is invalid: {}", value))?,
            None => Signal::OpenTelemetry,
        };

        let requeue_secs = match lookup("REQUEUE_SECS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("REQUEUE_SECS must be a number of seconds, got {}", value))?,
            None => DEFAULT_REQUEUE_SECS,
        };

        let resync_secs = match lookup("RESYNC_SECS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("RESYNC_SECS must be a number of seconds, got {}", value))?,
            None => DEFAULT_RESYNC_SECS,
        };

        let rendered_configmap_suffix = lookup("RENDERED_CONFIGMAP_SUFFIX")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RENDERED_CONFIGMAP_SUFFIX.to_string());

        Ok(Config {
            signal,
            requeue_secs,
            resync_secs,
            rendered_configmap_suffix,
        })
    }

    /// Name of the ConfigMap the rendered collector is published to
    pub fn rendered_configmap_name(&self) -> String {
        format!("{}-{}", self.signal, self.rendered_configmap_suffix)
    }
}
