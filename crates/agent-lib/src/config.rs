//! Bridge configuration model.
//!
//! Mirrors the static configuration surface: per-source connection details,
//! the service filter, container targets, namespecs, and the per-category
//! metric toggles. Loaded once per process; read-only during emission.

use crate::filter::ServiceFilterConfig;
use crate::naming::{DEFAULT_HOST_NAMESPEC, DEFAULT_PLUGIN_NAMESPEC};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub cadvisor: Option<CadvisorConfig>,
    #[serde(default)]
    pub mesos: Vec<MesosConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CadvisorConfig {
    /// IPv4 address or `docker/<name-or-id>` of the container running the
    /// stats daemon.
    #[serde(default = "default_cadvisor_host")]
    pub host: String,
    #[serde(default = "default_cadvisor_port")]
    pub port: u16,

    /// Docker Engine API endpoint used for container discovery.
    #[serde(default = "default_docker_endpoint")]
    pub docker_endpoint: String,

    #[serde(default)]
    pub system_enabled: bool,
    #[serde(default)]
    pub system_fs_metrics: bool,
    #[serde(default)]
    pub system_services: ServiceFilterConfig,

    #[serde(default = "default_true")]
    pub docker_enabled: bool,
    /// Container names, hex-id prefixes, or `*` for all containers.
    #[serde(default)]
    pub docker_containers: Vec<String>,

    #[serde(default = "default_ns_host")]
    pub ns_host: String,
    #[serde(default = "default_ns_plugin")]
    pub ns_plugin: String,

    /// Category option lists; a list containing `none` disables its
    /// category.
    #[serde(default)]
    pub metrics: BTreeMap<String, Vec<String>>,
}

impl Default for CadvisorConfig {
    fn default() -> Self {
        Self {
            host: default_cadvisor_host(),
            port: default_cadvisor_port(),
            docker_endpoint: default_docker_endpoint(),
            system_enabled: false,
            system_fs_metrics: false,
            system_services: ServiceFilterConfig::default(),
            docker_enabled: true,
            docker_containers: Vec::new(),
            ns_host: default_ns_host(),
            ns_plugin: default_ns_plugin(),
            metrics: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MesosConfig {
    pub host: String,
    pub port: u16,
    pub profile: MesosProfile,
    /// Vanity host identity for leader mirroring; masters only.
    #[serde(default)]
    pub tracking_name: Option<String>,
    /// Replaces the source's `/` separator in emitted type instances.
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub metric_types: BTreeMap<String, String>,
    #[serde(default = "default_metric_type")]
    pub default_metric_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MesosProfile {
    Master,
    Slave,
}

impl MesosProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            MesosProfile::Master => "master",
            MesosProfile::Slave => "slave",
        }
    }
}

fn default_cadvisor_host() -> String {
    "docker/cadvisor".to_string()
}

fn default_cadvisor_port() -> u16 {
    8080
}

fn default_docker_endpoint() -> String {
    "http://localhost:2375".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ns_host() -> String {
    DEFAULT_HOST_NAMESPEC.to_string()
}

fn default_ns_plugin() -> String {
    DEFAULT_PLUGIN_NAMESPEC.to_string()
}

fn default_metric_type() -> String {
    "gauge".to_string()
}

/// Emission categories of the container daemon's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetricCategory {
    Cpu,
    Memory,
    Network,
    DiskIo,
    LoadStats,
    Filesystem,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 6] = [
        MetricCategory::Cpu,
        MetricCategory::Memory,
        MetricCategory::Network,
        MetricCategory::DiskIo,
        MetricCategory::LoadStats,
        MetricCategory::Filesystem,
    ];

    /// Configuration key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            MetricCategory::Cpu => "cpu",
            MetricCategory::Memory => "memory",
            MetricCategory::Network => "network",
            MetricCategory::DiskIo => "diskio",
            MetricCategory::LoadStats => "load_stats",
            MetricCategory::Filesystem => "filesystem",
        }
    }
}

/// Categories enabled for emission, derived once at startup.
#[derive(Debug, Clone)]
pub struct ActiveMetrics {
    enabled: BTreeSet<MetricCategory>,
}

impl ActiveMetrics {
    /// A category is active when its option list is present in the
    /// configuration and does not contain the literal `none`.
    pub fn from_config(metrics: &BTreeMap<String, Vec<String>>) -> Self {
        let enabled = MetricCategory::ALL
            .into_iter()
            .filter(|category| {
                metrics
                    .get(category.key())
                    .is_some_and(|options| !options.iter().any(|o| o.eq_ignore_ascii_case("none")))
            })
            .collect();
        Self { enabled }
    }

    /// Every category enabled; used when no toggle surface is configured.
    pub fn all() -> Self {
        Self {
            enabled: MetricCategory::ALL.into_iter().collect(),
        }
    }

    pub fn contains(&self, category: MetricCategory) -> bool {
        self.enabled.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_none_disables_a_category() {
        let active = ActiveMetrics::from_config(&metrics_map(&[
            ("cpu", &["load", "per_cpu"]),
            ("memory", &["None"]),
        ]));
        assert!(active.contains(MetricCategory::Cpu));
        assert!(!active.contains(MetricCategory::Memory));
    }

    #[test]
    fn test_absent_category_is_disabled() {
        let active = ActiveMetrics::from_config(&metrics_map(&[("network", &["all"])]));
        assert!(active.contains(MetricCategory::Network));
        assert!(!active.contains(MetricCategory::DiskIo));
        assert!(!active.contains(MetricCategory::Filesystem));
    }

    #[test]
    fn test_mesos_profile_names() {
        assert_eq!(MesosProfile::Master.as_str(), "master");
        assert_eq!(MesosProfile::Slave.as_str(), "slave");
    }
}
