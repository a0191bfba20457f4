//! Core data models for the metrics bridge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One emission unit in the sink's naming schema:
/// `host "/" plugin ["-" plugin instance] "/" type ["-" type instance]`.
///
/// Immutable once constructed; created by the category decomposers and
/// consumed by the sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    pub plugin: String,
    pub plugin_instance: Option<String>,
    pub type_name: String,
    pub type_instance: Option<String>,
    pub values: Vec<f64>,
}

impl MetricPoint {
    pub fn new(
        plugin: &str,
        plugin_instance: Option<String>,
        type_name: &str,
        type_instance: Option<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            plugin: plugin.to_string(),
            plugin_instance,
            type_name: type_name.to_string(),
            type_instance,
            values,
        }
    }
}

/// Per-cgroup statistics snapshot from the container daemon, keyed by
/// cgroup/service path. Each value is a one-element array of stats.
pub type StatsSnapshot = BTreeMap<String, Vec<ContainerStats>>;

/// Flat metric-name to value snapshot from the resource manager.
pub type MetricsSnapshot = BTreeMap<String, f64>;

/// Category statistics for one cgroup entity, with per-category presence
/// flags. Fields the source omits decode to their defaults and their metric
/// groups are skipped at decomposition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerStats {
    #[serde(default)]
    pub has_cpu: bool,
    #[serde(default)]
    pub cpu: Option<CpuStats>,

    #[serde(default)]
    pub has_memory: bool,
    #[serde(default)]
    pub memory: Option<MemoryStats>,

    #[serde(default)]
    pub has_network: bool,
    #[serde(default)]
    pub network: Vec<InterfaceStats>,

    #[serde(default)]
    pub has_diskio: bool,
    #[serde(default)]
    pub diskio: Option<DiskIoStats>,

    #[serde(default)]
    pub has_load: bool,
    #[serde(default)]
    pub load_stats: BTreeMap<String, f64>,

    #[serde(default)]
    pub has_filesystem: bool,
    #[serde(default)]
    pub filesystem: Vec<FilesystemStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub load_average: Option<f64>,
    #[serde(default)]
    pub usage: Option<CpuUsage>,
}

/// Cumulative CPU time in nanoseconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CpuUsage {
    #[serde(default)]
    pub system: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub user: Option<u64>,
    #[serde(default)]
    pub per_cpu_usage: Vec<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub usage: Option<u64>,
    #[serde(default)]
    pub working_set: Option<u64>,
    #[serde(default)]
    pub hierarchical_data: BTreeMap<String, f64>,
    #[serde(default)]
    pub container_data: BTreeMap<String, f64>,
}

/// Per-interface receive/transmit counters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub rx_dropped: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub tx_errors: u64,
    #[serde(default)]
    pub tx_dropped: u64,
}

/// Block-I/O statistics. Any top-level group may be absent from a given
/// snapshot and decodes to an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiskIoStats {
    #[serde(default)]
    pub io_time: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_wait_time: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_service_time: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_service_bytes: Vec<PerDiskStats>,
    #[serde(default)]
    pub sectors: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_serviced: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_merged: Vec<PerDiskStats>,
    #[serde(default)]
    pub io_queued: Vec<PerDiskStats>,
}

/// One physical device's counters, keyed by statistic name
/// (e.g. `Read`, `Write`, `Sync`, `Async`, `Total`, or `Count`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerDiskStats {
    pub major: u64,
    pub minor: u64,
    #[serde(default)]
    pub stats: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesystemStats {
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub capacity: u64,
    #[serde(default)]
    pub usage: u64,
    #[serde(default)]
    pub read_time: u64,
    #[serde(default)]
    pub io_time: u64,
    #[serde(default)]
    pub weighted_io_time: u64,
    #[serde(default)]
    pub write_time: u64,
    #[serde(default)]
    pub writes_completed: u64,
    #[serde(default)]
    pub reads_completed: u64,
    #[serde(default)]
    pub writes_merged: u64,
    #[serde(default)]
    pub sectors_written: u64,
    #[serde(default)]
    pub reads_merged: u64,
    #[serde(default)]
    pub sectors_read: u64,
    #[serde(default)]
    pub io_in_progress: u64,
}

/// A running container as reported by the discovery collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub network_address: Option<String>,
    pub exposed_ports: Vec<u16>,
}

/// Cycle-scoped container record. `slice_id` starts unset and is assigned
/// by the identity resolver for exactly the containers matched by
/// configuration; rebuilt from scratch every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub names: Vec<String>,
    pub slice_id: Option<String>,
}

impl From<ContainerSummary> for ContainerRecord {
    fn from(summary: ContainerSummary) -> Self {
        Self {
            id: summary.id,
            names: summary.names,
            slice_id: None,
        }
    }
}
