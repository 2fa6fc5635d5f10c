// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Merge exporter endpoints and TLS material into the collector configuration.
//!
//! Each overlay only touches the fields it owns on the targeted exporter, so
//! resources naming the same exporter compose in processing order.

use crate::collector::document::CollectorConfig;
use crate::constants::data_keys;
use crate::error::{AddonError, Result};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::ResourceExt;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Set `endpoint` on the exporter named by the ConfigMap's `annotation`.
/// A ConfigMap without the annotation configures nothing.
pub fn configure_exporters_endpoints(
    cfg: &mut CollectorConfig,
    cm: &ConfigMap,
    annotation: &str,
) -> Result<()> {
    let Some(exporter_name) = cm.annotations().get(annotation) else {
        return Ok(());
    };

    cfg.exporters_mut()?;

    let Some(endpoint) = cm
        .data
        .as_ref()
        .and_then(|d| d.get(data_keys::ENDPOINT))
        .filter(|url| !url.is_empty())
    else {
        return Err(AddonError::MissingField {
            resource: format!(
                "ConfigMap {}/{}",
                cm.namespace().unwrap_or_default(),
                cm.name_any()
            ),
            key: data_keys::ENDPOINT.to_string(),
        });
    };

    let exporter = cfg.exporter_mut(exporter_name)?;
    exporter.insert(Value::from("endpoint"), Value::from(endpoint.as_str()));
    debug!("Exporter '{}' endpoint set to {}", exporter_name, endpoint);

    Ok(())
}

/// Point the TLS settings of the exporter named by the Secret's `annotation`
/// at the Secret mounted under `/<secret-name>/`.
pub fn configure_exporters_secrets(
    cfg: &mut CollectorConfig,
    secret: &Secret,
    annotation: &str,
) -> Result<()> {
    let Some(exporter_name) = secret.annotations().get(annotation) else {
        return Ok(());
    };

    let exporter = cfg.exporter_mut(exporter_name)?;
    exporter.insert(Value::from("tls"), Value::Mapping(tls_settings(&secret.name_any())));
    debug!(
        "Exporter '{}' TLS configured from Secret {}",
        exporter_name,
        secret.name_any()
    );

    Ok(())
}

fn tls_settings(secret_name: &str) -> Mapping {
    let folder = format!("/{}", secret_name);

    let mut tls = Mapping::new();
    tls.insert(Value::from("insecure"), Value::Bool(false));
    tls.insert(
        Value::from("cert_file"),
        Value::from(format!("{}/{}", folder, data_keys::TLS_CERT)),
    );
    tls.insert(
        Value::from("key_file"),
        Value::from(format!("{}/{}", folder, data_keys::TLS_KEY)),
    );
    tls.insert(
        Value::from("ca_file"),
        Value::from(format!("{}/{}", folder, data_keys::CA_BUNDLE)),
    );
    tls
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    const ANNOTATION: &str = "opentelemetry.mcoa.openshift.io/target-output-name";

    fn make_cm(exporter: Option<&str>, endpoint: Option<&str>) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some("otlp-endpoint".to_string()),
                namespace: Some("open-cluster-management".to_string()),
                annotations: exporter
                    .map(|e| BTreeMap::from([(ANNOTATION.to_string(), e.to_string())])),
                ..Default::default()
            },
            data: endpoint.map(|e| BTreeMap::from([("endpoint".to_string(), e.to_string())])),
            ..Default::default()
        }
    }

    fn make_secret(name: &str, exporter: Option<&str>) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("cluster-1".to_string()),
                annotations: exporter
                    .map(|e| BTreeMap::from([(ANNOTATION.to_string(), e.to_string())])),
                ..Default::default()
            },
            data: Some(BTreeMap::from([
                ("tls.crt".to_string(), ByteString(b"data".to_vec())),
                ("ca.crt".to_string(), ByteString(b"data".to_vec())),
                ("tls.key".to_string(), ByteString(b"data".to_vec())),
            ])),
            ..Default::default()
        }
    }

    fn config(doc: &str) -> CollectorConfig {
        CollectorConfig::from_yaml(doc).unwrap()
    }

    #[test]
    fn test_endpoint_without_exporters_is_malformed() {
        let mut cfg = config("receivers:\n  otlp: {}\n");

        let err = configure_exporters_endpoints(
            &mut cfg,
            &make_cm(Some("otlphttp"), Some("https://x")),
            ANNOTATION,
        )
        .unwrap_err();

        assert!(matches!(err, AddonError::MalformedConfig(_)));
    }

    #[test]
    fn test_endpoint_sets_value_on_null_exporter() {
        let mut cfg = config("exporters:\n  otlphttp:\n");

        configure_exporters_endpoints(
            &mut cfg,
            &make_cm(Some("otlphttp"), Some("https://x")),
            ANNOTATION,
        )
        .unwrap();

        assert_eq!(
            cfg.get(&["exporters", "otlphttp", "endpoint"]),
            Some(&Value::from("https://x"))
        );
    }

    #[test]
    fn test_endpoint_empty_value_is_missing_field() {
        let mut cfg = config("exporters:\n  otlphttp:\n");

        let err = configure_exporters_endpoints(
            &mut cfg,
            &make_cm(Some("otlphttp"), Some("")),
            ANNOTATION,
        )
        .unwrap_err();

        match err {
            AddonError::MissingField { resource, key } => {
                assert_eq!(key, "endpoint");
                assert_eq!(resource, "ConfigMap open-cluster-management/otlp-endpoint");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
        assert_eq!(cfg.get(&["exporters", "otlphttp"]), Some(&Value::Null));
    }

    #[test]
    fn test_endpoint_absent_key_is_missing_field() {
        let mut cfg = config("exporters:\n  otlphttp:\n");

        let err =
            configure_exporters_endpoints(&mut cfg, &make_cm(Some("otlphttp"), None), ANNOTATION)
                .unwrap_err();

        assert!(matches!(err, AddonError::MissingField { .. }));
    }

    #[test]
    fn test_endpoint_without_annotation_is_noop() {
        let mut cfg = config("receivers: {}\n");
        let before = cfg.clone();

        configure_exporters_endpoints(&mut cfg, &make_cm(None, None), ANNOTATION).unwrap();

        assert_eq!(cfg, before);
    }

    #[test]
    fn test_endpoint_overwrites_and_is_idempotent() {
        let mut cfg = config("exporters:\n  otlphttp:\n    endpoint: https://old\n    compression: gzip\n");
        let cm = make_cm(Some("otlphttp"), Some("https://new"));

        configure_exporters_endpoints(&mut cfg, &cm, ANNOTATION).unwrap();
        let once = cfg.clone();
        configure_exporters_endpoints(&mut cfg, &cm, ANNOTATION).unwrap();

        assert_eq!(cfg, once);
        let exporter = cfg.get(&["exporters", "otlphttp"]).unwrap().as_mapping().unwrap();
        assert_eq!(exporter.len(), 2);
        assert_eq!(exporter.get("endpoint"), Some(&Value::from("https://new")));
        assert_eq!(exporter.get("compression"), Some(&Value::from("gzip")));
    }

    #[test]
    fn test_endpoint_leaves_other_exporters_alone() {
        let mut cfg = config("exporters:\n  debug:\n    verbosity: detailed\n  otlphttp:\n");

        configure_exporters_endpoints(
            &mut cfg,
            &make_cm(Some("otlphttp"), Some("https://x")),
            ANNOTATION,
        )
        .unwrap();

        assert_eq!(
            cfg.get(&["exporters", "debug", "verbosity"]),
            Some(&Value::from("detailed"))
        );
    }

    #[test]
    fn test_secret_sets_tls_paths() {
        let mut cfg = config("exporters:\n  otlphttp: {}\n");

        configure_exporters_secrets(
            &mut cfg,
            &make_secret("opentelemetry-otlphttp-auth", Some("otlphttp")),
            ANNOTATION,
        )
        .unwrap();

        let expected: Value = serde_yaml::from_str(
            r#"
insecure: false
cert_file: /opentelemetry-otlphttp-auth/tls.crt
key_file: /opentelemetry-otlphttp-auth/tls.key
ca_file: /opentelemetry-otlphttp-auth/ca.crt
"#,
        )
        .unwrap();
        assert_eq!(cfg.get(&["exporters", "otlphttp", "tls"]), Some(&expected));
    }

    #[test]
    fn test_secret_without_exporters_is_malformed() {
        let mut cfg = config("service: {}\n");

        let err = configure_exporters_secrets(
            &mut cfg,
            &make_secret("opentelemetry-otlphttp-auth", Some("otlphttp")),
            ANNOTATION,
        )
        .unwrap_err();

        assert!(matches!(err, AddonError::MalformedConfig(_)));
    }

    #[test]
    fn test_secret_without_annotation_is_noop() {
        let mut cfg = config("exporters:\n  otlphttp: {}\n");
        let before = cfg.clone();

        configure_exporters_secrets(&mut cfg, &make_secret("unrelated", None), ANNOTATION).unwrap();

        assert_eq!(cfg, before);
    }

    #[test]
    fn test_endpoint_then_secret_merge_into_one_exporter() {
        let mut cfg = config("exporters:\n  otlphttp:\n");

        configure_exporters_endpoints(
            &mut cfg,
            &make_cm(Some("otlphttp"), Some("https://x")),
            ANNOTATION,
        )
        .unwrap();
        configure_exporters_secrets(
            &mut cfg,
            &make_secret("opentelemetry-otlphttp-auth", Some("otlphttp")),
            ANNOTATION,
        )
        .unwrap();

        let exporter = cfg.get(&["exporters", "otlphttp"]).unwrap().as_mapping().unwrap();
        assert_eq!(exporter.get("endpoint"), Some(&Value::from("https://x")));
        assert!(exporter.get("tls").is_some_and(Value::is_mapping));
    }

    #[test]
    fn test_later_resource_wins_per_field() {
        let mut cfg = config("exporters:\n  otlphttp:\n");

        for (name, endpoint) in [("first", "https://first"), ("second", "https://second")] {
            let mut cm = make_cm(Some("otlphttp"), Some(endpoint));
            cm.metadata.name = Some(name.to_string());
            configure_exporters_endpoints(&mut cfg, &cm, ANNOTATION).unwrap();
        }

        assert_eq!(
            cfg.get(&["exporters", "otlphttp", "endpoint"]),
            Some(&Value::from("https://second"))
        );
    }
}
