// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes object access used by the options builder and the reconciler.

pub mod objects;

pub use objects::{apply_namespaced, cancellable, get_namespaced};
