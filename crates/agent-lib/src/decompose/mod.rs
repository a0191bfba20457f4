//! Category decomposition of the container daemon's nested statistics
//! into the flat metric-point stream the sink expects.
//!
//! Each category transform is independent and reproduces the sink's naming
//! exactly: plugin names, collectd types, instance disambiguators, and
//! emission order.

mod cpu;
mod diskio;
mod filesystem;
mod load;
mod memory;
mod network;


use crate::config::{ActiveMetrics, MetricCategory};
use crate::models::{ContainerStats, MetricPoint};

/// Decompose the enabled categories of one entity's statistics.
///
/// A category is emitted only when its presence flag is set and it is
/// active; filesystem metrics additionally require the per-call flag
/// (root cgroup with system filesystem metrics enabled).
pub fn decompose(
    stats: &ContainerStats,
    active: &ActiveMetrics,
    fs_metrics: bool,
    out: &mut Vec<MetricPoint>,
) {
    if stats.has_cpu && active.contains(MetricCategory::Cpu) {
        if let Some(cpu) = &stats.cpu {
            cpu::decompose(cpu, out);
        }
    }

    if stats.has_memory && active.contains(MetricCategory::Memory) {
        if let Some(memory) = &stats.memory {
            memory::decompose(memory, out);
        }
    }

    if stats.has_network && active.contains(MetricCategory::Network) {
        network::decompose(&stats.network, out);
    }

    if stats.has_diskio && active.contains(MetricCategory::DiskIo) {
        if let Some(diskio) = &stats.diskio {
            diskio::decompose(diskio, out);
        }
    }

    if stats.has_load && active.contains(MetricCategory::LoadStats) {
        load::decompose(&stats.load_stats, out);
    }

    if stats.has_filesystem && fs_metrics && active.contains(MetricCategory::Filesystem) {
        filesystem::decompose(&stats.filesystem, out);
    }
}
