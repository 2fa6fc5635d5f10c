// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Authentication methods and the per-signal default templates.

use crate::constants::auth;
use crate::types::certificate::{IssuerRef, X509Subject};
use crate::types::{ObjectKey, Signal};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

/// How a target output authenticates against its backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    /// Reuse an operator-provided Secret as is
    Static,
    /// Request a client certificate for the managed cluster
    Mtls,
}

impl FromStr for AuthenticationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "StaticAuthentication" => Ok(AuthenticationType::Static),
            "mTLS" => Ok(AuthenticationType::Mtls),
            other => Err(other.to_string()),
        }
    }
}

/// Target output name to authentication method, ordered by target name
pub type AuthenticationMap = BTreeMap<String, AuthenticationType>;

/// Build the authentication map from the authentication-definition ConfigMap.
/// Entries with an unknown method are skipped.
pub fn build_authentication_map(cm: &ConfigMap) -> AuthenticationMap {
    let Some(data) = cm.data.as_ref() else {
        return AuthenticationMap::new();
    };

    data.iter()
        .filter_map(|(target, method)| match method.parse() {
            Ok(auth_type) => Some((target.clone(), auth_type)),
            Err(unknown) => {
                warn!(
                    "Ignoring target '{}' in auth ConfigMap {}/{}: unknown authentication '{}'",
                    target,
                    cm.namespace().unwrap_or_default(),
                    cm.name_any(),
                    unknown
                );
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAuthenticationConfig {
    pub existing_secret: ObjectKey,
}

/// Template for the client certificates requested for mTLS targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtlsConfig {
    pub common_name: String,
    pub subject: X509Subject,
    pub dns_names: Vec<String>,
    pub issuer: IssuerRef,
    /// CA bundle that replaces the issued one in resolved Secrets
    pub ca_to_inject: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub static_auth: StaticAuthenticationConfig,
    pub mtls: MtlsConfig,
}

static TEMPLATES: LazyLock<[AuthConfig; 4]> =
    LazyLock::new(|| Signal::ALL.map(AuthConfig::defaults_for));

impl AuthConfig {
    /// Process-wide default template for a signal. Never mutated; derive a
    /// per-reconciliation value with [`AuthConfig::for_cluster`].
    pub fn template(signal: Signal) -> &'static AuthConfig {
        &TEMPLATES[signal.index()]
    }

    fn defaults_for(signal: Signal) -> AuthConfig {
        AuthConfig {
            static_auth: StaticAuthenticationConfig {
                existing_secret: ObjectKey::new(
                    auth::STATIC_SECRET_NAMESPACE,
                    auth::STATIC_SECRET_NAME,
                ),
            },
            mtls: MtlsConfig {
                common_name: String::new(),
                subject: X509Subject {
                    organizational_units: vec![format!("{}-ocm-addon", signal)],
                    organizations: vec![],
                },
                dns_names: vec![signal.collector_service_dns().to_string()],
                issuer: IssuerRef {
                    name: auth::CLUSTER_ISSUER_NAME.to_string(),
                    kind: Some(auth::CLUSTER_ISSUER_KIND.to_string()),
                    group: Some(auth::CERT_MANAGER_GROUP.to_string()),
                },
                ca_to_inject: None,
            },
        }
    }

    /// Copy of this template with the common name set to the managed cluster namespace
    pub fn for_cluster(&self, cluster_namespace: &str) -> AuthConfig {
        let mut config = self.clone();
        config.mtls.common_name = cluster_namespace.to_string();
        config
    }

    pub fn with_ca(mut self, ca: Option<Vec<u8>>) -> AuthConfig {
        self.mtls.ca_to_inject = ca;
        self
    }
}
