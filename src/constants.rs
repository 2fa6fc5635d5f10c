// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Name of the addon whose ManagedClusterAddOn objects are reconciled
pub const ADDON_NAME: &str = "multicluster-observability-addon";

/// The operator name used for server-side apply
pub const OPERATOR_NAME: &str = "observability-addon";

/// Kubernetes label keys used to select observability resources
pub mod labels {
    /// Signal a ConfigMap or Secret configures; the value must match the reconciled signal
    pub const SIGNAL: &str = "mcoa.openshift.io/signal";
}

/// Kubernetes annotation keys, one pair per signal family
pub mod annotations {
    pub const OPENTELEMETRY_TARGET_OUTPUT_NAME: &str =
        "opentelemetry.mcoa.openshift.io/target-output-name";
    pub const OPENTELEMETRY_CA: &str = "opentelemetry.mcoa.openshift.io/ca";

    pub const TRACING_TARGET_OUTPUT_NAME: &str = "tracing.mcoa.openshift.io/target-output-name";
    pub const TRACING_CA: &str = "tracing.mcoa.openshift.io/ca";

    pub const LOGGING_TARGET_OUTPUT_NAME: &str = "logging.mcoa.openshift.io/target-output-name";
    pub const LOGGING_CA: &str = "logging.mcoa.openshift.io/ca";

    pub const METRICS_TARGET_OUTPUT_NAME: &str = "metrics.mcoa.openshift.io/target-output-name";
    pub const METRICS_CA: &str = "metrics.mcoa.openshift.io/ca";
}

/// Data keys operators must use in ConfigMaps and Secrets
pub mod data_keys {
    /// Exporter endpoint URL in an exporter ConfigMap
    pub const ENDPOINT: &str = "endpoint";
    /// CA bundle in the CA Secret and in generated mTLS Secrets
    pub const CA_BUNDLE: &str = "ca.crt";
    pub const TLS_CERT: &str = "tls.crt";
    pub const TLS_KEY: &str = "tls.key";
    /// Rendered collector document in the published ConfigMap
    pub const RENDERED_COLLECTOR: &str = "collector.yaml";
}

/// Group/resource pairs as they appear in addon config references
pub mod resources {
    pub const CONFIG_MAPS: &str = "configmaps";
    pub const SECRETS: &str = "secrets";

    pub const OPENTELEMETRY_GROUP: &str = "opentelemetry.io";
    pub const OPENTELEMETRY_COLLECTORS: &str = "opentelemetrycollectors";

    pub const ADDON_GROUP: &str = "addon.open-cluster-management.io";
    pub const ADDON_DEPLOYMENT_CONFIGS: &str = "addondeploymentconfigs";
}

/// Authentication defaults shared by every signal
pub mod auth {
    pub const STATIC_SECRET_NAME: &str = "static-authentication";
    pub const STATIC_SECRET_NAMESPACE: &str = "open-cluster-management";

    pub const CLUSTER_ISSUER_NAME: &str = "mcoa-cluster-issuer";
    pub const CLUSTER_ISSUER_KIND: &str = "ClusterIssuer";
    pub const CERT_MANAGER_GROUP: &str = "cert-manager.io";
}
