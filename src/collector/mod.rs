// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Collector configuration document, exporter overlays and rendering.

pub mod document;
pub mod overlay;
pub mod render;

pub use document::CollectorConfig;
pub use overlay::{configure_exporters_endpoints, configure_exporters_secrets};
pub use render::{build_collector_config, configure_volumes, render_collector};
