// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::annotations;
use crate::error::AddonError;
use std::fmt;
use std::str::FromStr;

/// Observability signal family; selects which label value and annotation keys apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    OpenTelemetry,
    Tracing,
    Logging,
    Metrics,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::OpenTelemetry,
        Signal::Tracing,
        Signal::Logging,
        Signal::Metrics,
    ];

    /// Value expected under the signal label
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::OpenTelemetry => "opentelemetry",
            Signal::Tracing => "tracing",
            Signal::Logging => "logging",
            Signal::Metrics => "metrics",
        }
    }

    /// Annotation naming the exporter (target output) a ConfigMap or Secret configures
    pub fn target_output_annotation(&self) -> &'static str {
        match self {
            Signal::OpenTelemetry => annotations::OPENTELEMETRY_TARGET_OUTPUT_NAME,
            Signal::Tracing => annotations::TRACING_TARGET_OUTPUT_NAME,
            Signal::Logging => annotations::LOGGING_TARGET_OUTPUT_NAME,
            Signal::Metrics => annotations::METRICS_TARGET_OUTPUT_NAME,
        }
    }

    /// Annotation marking the Secret that holds the CA bundle to inject
    pub fn ca_annotation(&self) -> &'static str {
        match self {
            Signal::OpenTelemetry => annotations::OPENTELEMETRY_CA,
            Signal::Tracing => annotations::TRACING_CA,
            Signal::Logging => annotations::LOGGING_CA,
            Signal::Metrics => annotations::METRICS_CA,
        }
    }

    /// In-cluster DNS name of the collector that presents the client certificate
    pub fn collector_service_dns(&self) -> &'static str {
        match self {
            Signal::OpenTelemetry | Signal::Tracing => {
                "opentelemetry-collector.spoke-otelcol.svc"
            }
            Signal::Logging => "collector.openshift-logging.svc",
            Signal::Metrics => "prometheus-agent.open-cluster-management-observability.svc",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Signal::OpenTelemetry => 0,
            Signal::Tracing => 1,
            Signal::Logging => 2,
            Signal::Metrics => 3,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = AddonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .into_iter()
            .find(|signal| signal.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AddonError::InvalidSignal(s.to_string()))
    }
}
