// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Authentication inputs and secret provisioning for target outputs.

pub mod config;
pub mod provider;

pub use config::{build_authentication_map, AuthConfig, AuthenticationMap, AuthenticationType};
pub use provider::{resolve_ca, secret_name_for, SecretSource, SecretsProvider, TargetSecretRequest};
