// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Collector pipeline configuration as a YAML mapping with checked accessors.

use crate::error::{AddonError, Result};
use serde_yaml::{Mapping, Value};

const EXPORTERS: &str = "exporters";

/// Collector configuration document. The root is always a mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectorConfig {
    root: Mapping,
}

impl CollectorConfig {
    /// Parse a YAML document; an empty document yields an empty configuration
    pub fn from_yaml(doc: &str) -> Result<Self> {
        match serde_yaml::from_str::<Value>(doc)? {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            other => Err(AddonError::MalformedConfig(format!(
                "expected a mapping at the document root, found {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Look up a value by walking nested mappings
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    pub fn exporters(&self) -> Result<&Mapping> {
        match self.root.get(EXPORTERS) {
            Some(Value::Mapping(exporters)) => Ok(exporters),
            Some(other) => Err(not_a_mapping(other)),
            None => Err(no_exporters()),
        }
    }

    /// The `exporters` section. Never created here: a document without one is malformed.
    pub fn exporters_mut(&mut self) -> Result<&mut Mapping> {
        match self.root.get_mut(EXPORTERS) {
            Some(Value::Mapping(exporters)) => Ok(exporters),
            Some(other) => Err(not_a_mapping(other)),
            None => Err(no_exporters()),
        }
    }

    /// The named exporter entry. An absent or empty entry becomes an empty
    /// mapping; an entry of any other shape is malformed.
    pub fn exporter_mut(&mut self, name: &str) -> Result<&mut Mapping> {
        let exporters = self.exporters_mut()?;
        let entry = exporters.entry(Value::from(name)).or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Mapping(Mapping::new());
        }

        match entry {
            Value::Mapping(exporter) => Ok(exporter),
            other => Err(AddonError::MalformedConfig(format!(
                "exporter '{}' must be a mapping, found {}",
                name,
                kind_of(other)
            ))),
        }
    }
}

fn no_exporters() -> AddonError {
    AddonError::MalformedConfig("no exporters available as part of the configuration".to_string())
}

fn not_a_mapping(value: &Value) -> AddonError {
    AddonError::MalformedConfig(format!(
        "exporters field must be a mapping, found {}",
        kind_of(value)
    ))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
