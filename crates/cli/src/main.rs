//! Operator CLI for the container metrics bridge.
//!
//! `bridgectl cycle` runs one polling cycle and prints collectd PUTVAL
//! lines to stdout, which is exactly what the collectd Exec plugin expects
//! from a spawned reader. `bridgectl check` validates a configuration file
//! without touching the network.

use anyhow::{Context, Result};
use bridge_lib::{
    config::{ActiveMetrics, BridgeConfig, MetricCategory},
    error::{ConfigError, CycleError},
    filter::FilterMode,
    pipeline::{build_pipelines, Pipeline},
    sink::PutvalSink,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Container metrics bridge CLI
#[derive(Parser)]
#[command(name = "bridgectl")]
#[command(author, version, about = "CLI for the container metrics bridge", long_about = None)]
struct Cli {
    /// Path to the bridge configuration file
    #[arg(long, env = "BRIDGE_CONFIG", default_value = "/etc/metrics-bridge/bridge.yaml")]
    config: String,

    /// Host identity used in emitted identifiers
    #[arg(long, env = "COLLECTD_HOSTNAME", default_value = "localhost")]
    hostname: String,

    /// Interval stamped on PUTVAL lines, in seconds
    #[arg(long, default_value_t = 10)]
    interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one polling cycle, emitting PUTVAL lines to stdout
    Cycle,
    /// Validate the configuration file and report what it enables
    Check,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        let code = error
            .downcast_ref::<ConfigError>()
            .map(ConfigError::exit_code)
            .or_else(|| error.downcast_ref::<CycleError>().map(CycleError::exit_code))
            .unwrap_or(1);
        eprintln!("bridgectl: {error:#}");
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Cycle => cycle(&config, &cli.hostname, cli.interval).await,
        Commands::Check => check(&config),
    }
}

fn load_config(path: &str) -> Result<BridgeConfig> {
    let config = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()
        .with_context(|| format!("reading {path}"))?;
    config
        .try_deserialize()
        .with_context(|| format!("parsing {path}"))
}

async fn cycle(config: &BridgeConfig, hostname: &str, interval: u64) -> Result<()> {
    let sink = Arc::new(PutvalSink::new(hostname, interval, std::io::stdout()));
    let pipelines = build_pipelines(config, hostname, sink)?;
    if pipelines.is_empty() {
        anyhow::bail!("no sources configured; nothing to poll");
    }

    for pipeline in pipelines {
        let report = pipeline.run_cycle().await?;
        eprintln!(
            "{}: {} services, {} containers, {} points",
            pipeline.name(),
            report.services_emitted,
            report.containers_emitted,
            report.points_emitted
        );
    }
    Ok(())
}

fn check(config: &BridgeConfig) -> Result<()> {
    if let Some(cadvisor) = &config.cadvisor {
        let mode = FilterMode::derive(
            &cadvisor.system_services.include,
            &cadvisor.system_services.exclude,
        )?;
        let active = ActiveMetrics::from_config(&cadvisor.metrics);
        let categories: Vec<&str> = MetricCategory::ALL
            .into_iter()
            .filter(|c| active.contains(*c))
            .map(|c| c.key())
            .collect();

        println!("cadvisor: host={} port={}", cadvisor.host, cadvisor.port);
        println!("  service filter mode: {mode:?}");
        println!("  active categories: {}", categories.join(", "));
        println!(
            "  container tracking: {} ({} targets)",
            if cadvisor.docker_enabled { "on" } else { "off" },
            cadvisor.docker_containers.len()
        );
    }

    for mesos in &config.mesos {
        println!(
            "mesos: profile={} host={} port={} tracking={}",
            mesos.profile.as_str(),
            mesos.host,
            mesos.port,
            mesos.tracking_name.as_deref().unwrap_or("-")
        );
    }

    if config.cadvisor.is_none() && config.mesos.is_empty() {
        anyhow::bail!("configuration enables no sources");
    }

    println!("configuration ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config_round_trip() {
        let file = write_config(
            r#"
cadvisor:
  host: "10.0.0.5"
  port: 8080
  system_enabled: true
  system_services:
    include: ["ssh"]
    exclude: ["*"]
  metrics:
    cpu: ["all"]
    memory: ["none"]
mesos:
  - host: "10.0.0.6"
    port: 5050
    profile: master
    tracking_name: "mesos-lead"
"#,
        );

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        let cadvisor = config.cadvisor.as_ref().unwrap();
        assert_eq!(cadvisor.host, "10.0.0.5");
        assert!(cadvisor.system_enabled);
        assert_eq!(config.mesos.len(), 1);
        assert_eq!(config.mesos[0].tracking_name.as_deref(), Some("mesos-lead"));

        assert!(check(&config).is_ok());
    }

    #[test]
    fn test_check_rejects_conflicting_filter() {
        let file = write_config(
            r#"
cadvisor:
  host: "10.0.0.5"
  system_services:
    include: ["*"]
    exclude: ["*"]
"#,
        );

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        let error = check(&config).unwrap_err();
        assert!(error.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_check_rejects_empty_configuration() {
        let file = write_config("{}\n");
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert!(check(&config).is_err());
    }
}
