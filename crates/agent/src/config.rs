//! Agent configuration

use anyhow::{Context, Result};
use bridge_lib::config::BridgeConfig;
use serde::Deserialize;

/// Agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Host identity stamped on emitted points
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// API server port for health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Polling interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Path to the bridge configuration file (sources, filters, targets)
    #[serde(default = "default_bridge_config")]
    pub bridge_config: String,
}

fn default_hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_poll_interval() -> u64 {
    10
}

fn default_bridge_config() -> String {
    "/etc/metrics-bridge/bridge.yaml".to_string()
}

impl AgentConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("BRIDGE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| AgentConfig {
            hostname: default_hostname(),
            api_port: default_api_port(),
            poll_interval_secs: default_poll_interval(),
            bridge_config: default_bridge_config(),
        }))
    }

    /// Load the bridge configuration file this agent points at
    pub fn load_bridge_config(&self) -> Result<BridgeConfig> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&self.bridge_config))
            .build()
            .with_context(|| format!("reading {}", self.bridge_config))?;

        config
            .try_deserialize()
            .with_context(|| format!("parsing {}", self.bridge_config))
    }
}
