//! Container metrics bridge agent
//!
//! Polls the configured container-stats and resource-manager endpoints on a
//! fixed interval and forwards the normalized point stream to a collectd
//! sink on stdout.

use anyhow::Result;
use bridge_lib::{
    error::{ConfigError, CycleError},
    health::{components, HealthRegistry},
    observability::BridgeMetrics,
    pipeline::{build_pipelines, Pipeline, PollConfig, PollLoop},
    sink::PutvalSink,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        // Fatal startup errors carry the exit code of their class; cycle
        // failures never reach here (the loop logs and keeps polling).
        let code = error
            .downcast_ref::<ConfigError>()
            .map(ConfigError::exit_code)
            .or_else(|| error.downcast_ref::<CycleError>().map(CycleError::exit_code))
            .unwrap_or(1);
        eprintln!("bridge-agent: {error:#}");
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    info!(version = AGENT_VERSION, "Starting bridge-agent");

    let agent_config = config::AgentConfig::load()?;
    let bridge_config = agent_config.load_bridge_config()?;
    info!(hostname = %agent_config.hostname, "Agent configured");

    // stdout carries the PUTVAL stream; logs go to stderr
    let sink = Arc::new(PutvalSink::new(
        agent_config.hostname.clone(),
        agent_config.poll_interval_secs,
        std::io::stdout(),
    ));

    let pipelines = build_pipelines(&bridge_config, &agent_config.hostname, sink)?;
    if pipelines.is_empty() {
        anyhow::bail!("no sources configured; nothing to poll");
    }

    let health_registry = HealthRegistry::new();
    for pipeline in &pipelines {
        health_registry.register(pipeline.name()).await;
    }
    if bridge_config
        .cadvisor
        .as_ref()
        .is_some_and(|c| c.docker_enabled)
    {
        health_registry
            .register(components::CONTAINER_DISCOVERY)
            .await;
    }
    health_registry.register(components::SINK).await;

    let metrics = BridgeMetrics::new();

    let app_state = Arc::new(api::AppState::new(health_registry.clone(), metrics.clone()));
    health_registry.set_ready(true).await;
    let _api_handle = tokio::spawn(api::serve(agent_config.api_port, app_state));

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    let poll_loop = PollLoop::new(
        pipelines,
        PollConfig {
            interval: Duration::from_secs(agent_config.poll_interval_secs),
        },
    )
    .with_health(health_registry.clone());
    let loop_handle = tokio::spawn(poll_loop.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    let _ = shutdown_tx.send(());
    let _ = loop_handle.await;

    Ok(())
}
