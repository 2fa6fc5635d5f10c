// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use observability_addon::config::Config;
use observability_addon::reconcilers::AddonReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting observability addon manager");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: signal={}, requeue_secs={}, resync_secs={}, rendered_configmap={}",
        config.signal,
        config.requeue_secs,
        config.resync_secs,
        config.rendered_configmap_name()
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received interrupt, shutting down"),
            Err(e) => warn!("Failed to listen for interrupt: {}", e),
        }
        signal_token.cancel();
    });

    AddonReconciler::new(client, config, shutdown).run().await?;

    info!("Observability addon manager stopped");
    Ok(())
}
