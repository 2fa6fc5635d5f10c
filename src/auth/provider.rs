// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Turns an authentication map into one Secret per target output.
//!
//! Generation is pure: it decides which Secret each target uses and, for mTLS
//! targets, which Certificate must exist. Fetching talks to the API server to
//! request those Certificates and read the resulting Secrets.

use crate::auth::config::{AuthConfig, AuthenticationMap, AuthenticationType};
use crate::constants::{data_keys, labels};
use crate::error::{AddonError, Result};
use crate::kubernetes::{apply_namespaced, cancellable, get_namespaced};
use crate::types::certificate::{Certificate, CertificateSpec};
use crate::types::{ObjectKey, Signal};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{api::ObjectMeta, Client, ResourceExt};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const AUTH_SUFFIX: &str = "-auth";
const MAX_OBJECT_NAME_LEN: usize = 253;

/// Where the Secret for a target comes from
#[derive(Debug, Clone, PartialEq)]
pub enum SecretSource {
    /// Operator-provided Secret, referenced as is
    Existing,
    /// Secret issued by cert-manager for this Certificate
    Certificate(Box<Certificate>),
}

/// Secret material that must exist for one target output
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSecretRequest {
    pub target: String,
    pub secret: ObjectKey,
    pub source: SecretSource,
    pub ca_to_inject: Option<Vec<u8>>,
}

/// Provisions authentication Secrets for one managed cluster and signal
#[derive(Debug, Clone)]
pub struct SecretsProvider {
    cluster_namespace: String,
    signal: Signal,
    config: AuthConfig,
}

impl SecretsProvider {
    /// The template is copied; the provider owns its per-cluster configuration.
    pub fn new(cluster_namespace: &str, signal: Signal, template: &AuthConfig) -> Self {
        Self {
            cluster_namespace: cluster_namespace.to_string(),
            signal,
            config: template.for_cluster(cluster_namespace),
        }
    }

    /// Produce one request per target, ordered by target name. An mTLS target
    /// whose Secret name is already taken by an earlier target is skipped.
    ///
    /// When any target uses mTLS and a CA Secret is given, its `ca.crt` is
    /// injected into those requests; a CA Secret with data but no `ca.crt`
    /// fails the whole call.
    pub fn generate_secrets(
        &self,
        cancel: &CancellationToken,
        auth_map: &AuthenticationMap,
        ca_secret: Option<&Secret>,
    ) -> Result<Vec<TargetSecretRequest>> {
        if cancel.is_cancelled() {
            return Err(AddonError::Cancelled);
        }

        let needs_ca = auth_map
            .values()
            .any(|auth_type| *auth_type == AuthenticationType::Mtls);
        let ca = if needs_ca { resolve_ca(ca_secret)? } else { None };
        let config = self.config.clone().with_ca(ca);

        let mut claimed: BTreeMap<String, &str> = BTreeMap::new();
        let mut requests = Vec::with_capacity(auth_map.len());
        for (target, auth_type) in auth_map {
            match auth_type {
                AuthenticationType::Static => requests.push(TargetSecretRequest {
                    target: target.clone(),
                    secret: config.static_auth.existing_secret.clone(),
                    source: SecretSource::Existing,
                    ca_to_inject: None,
                }),
                AuthenticationType::Mtls => {
                    let name = secret_name_for(self.signal, target);
                    if let Some(owner) = claimed.get(&name) {
                        warn!(
                            "Target '{}' maps to Secret {} already used by target '{}', skipping",
                            target, name, owner
                        );
                        continue;
                    }
                    claimed.insert(name.clone(), target);
                    requests.push(self.mtls_request(&config, target, name));
                }
            }
        }

        Ok(requests)
    }

    fn mtls_request(&self, config: &AuthConfig, target: &str, name: String) -> TargetSecretRequest {

        let mut certificate = Certificate::new(
            &name,
            CertificateSpec {
                secret_name: name.clone(),
                common_name: Some(config.mtls.common_name.clone()),
                subject: Some(config.mtls.subject.clone()),
                dns_names: config.mtls.dns_names.clone(),
                usages: vec!["client auth".to_string()],
                issuer_ref: config.mtls.issuer.clone(),
            },
        );
        certificate.metadata.namespace = Some(self.cluster_namespace.clone());
        certificate.metadata.labels = Some(BTreeMap::from([(
            labels::SIGNAL.to_string(),
            self.signal.to_string(),
        )]));

        TargetSecretRequest {
            target: target.to_string(),
            secret: ObjectKey::new(&self.cluster_namespace, &name),
            source: SecretSource::Certificate(Box::new(certificate)),
            ca_to_inject: config.mtls.ca_to_inject.clone(),
        }
    }

    /// Resolve every request to a Secret, in request order, annotated with its
    /// target output name under `annotation`.
    #[instrument(skip(self, client, cancel, requests), fields(cluster = %self.cluster_namespace))]
    pub async fn fetch_secrets(
        &self,
        client: &Client,
        cancel: &CancellationToken,
        requests: &[TargetSecretRequest],
        annotation: &str,
    ) -> Result<Vec<Secret>> {
        if cancel.is_cancelled() {
            return Err(AddonError::Cancelled);
        }

        let mut resolved = Vec::with_capacity(requests.len());
        for request in requests {
            if let SecretSource::Certificate(certificate) = &request.source {
                let key = ObjectKey::new(&request.secret.namespace, &certificate.name_any());
                cancellable(cancel, apply_namespaced(client, &key, certificate.as_ref())).await?;
                debug!("Certificate {} requested for target '{}'", key, request.target);
            }

            let secret: Secret = cancellable(cancel, get_namespaced(client, &request.secret)).await?;
            info!(
                "Secret {} resolved for target '{}'",
                request.secret, request.target
            );
            resolved.push(tag_secret(secret, request, annotation));
        }

        Ok(resolved)
    }
}

/// Read the CA bundle from the CA Secret. A Secret without data carries no CA.
pub fn resolve_ca(ca_secret: Option<&Secret>) -> Result<Option<Vec<u8>>> {
    let Some(secret) = ca_secret else {
        return Ok(None);
    };

    match secret.data.as_ref() {
        Some(data) if !data.is_empty() => match data.get(data_keys::CA_BUNDLE) {
            Some(ca) => Ok(Some(ca.0.clone())),
            None => Err(AddonError::MissingField {
                resource: format!(
                    "Secret {}/{}",
                    secret.namespace().unwrap_or_default(),
                    secret.name_any()
                ),
                key: data_keys::CA_BUNDLE.to_string(),
            }),
        },
        _ => {
            debug!(
                "CA Secret {}/{} has no data, skipping CA injection",
                secret.namespace().unwrap_or_default(),
                secret.name_any()
            );
            Ok(None)
        }
    }
}

/// Name of the generated Secret (and Certificate) for a target output. Targets
/// that differ only in characters outside `[a-z0-9-]` share a name.
pub fn secret_name_for(signal: Signal, target: &str) -> String {
    let prefix = format!("{}-", signal);
    let budget = MAX_OBJECT_NAME_LEN - prefix.len() - AUTH_SUFFIX.len();

    let target: String = target
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let target = target.trim_matches('-');
    let target = target[..target.len().min(budget)].trim_end_matches('-');

    format!("{}{}{}", prefix, target, AUTH_SUFFIX)
}

/// Keep identity and payload of a resolved Secret, tag it with its target output
fn tag_secret(secret: Secret, request: &TargetSecretRequest, annotation: &str) -> Secret {
    let mut annotations = secret.metadata.annotations.unwrap_or_default();
    annotations.insert(annotation.to_string(), request.target.clone());

    let mut data = secret.data;
    if let Some(ca) = &request.ca_to_inject {
        data.get_or_insert_with(BTreeMap::new)
            .insert(data_keys::CA_BUNDLE.to_string(), ByteString(ca.clone()));
    }

    Secret {
        metadata: ObjectMeta {
            name: secret.metadata.name,
            namespace: secret.metadata.namespace,
            labels: secret.metadata.labels,
            annotations: Some(annotations),
            ..Default::default()
        },
        data,
        string_data: None,
        type_: secret.type_,
        immutable: secret.immutable,
    }
}
