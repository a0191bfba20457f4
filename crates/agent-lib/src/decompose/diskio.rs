//! Block-I/O decomposition.
//!
//! See: https://www.kernel.org/doc/Documentation/cgroups/blkio-controller.txt

use crate::models::{DiskIoStats, MetricPoint, PerDiskStats};

const PLUGIN: &str = "blkio";

fn device_instance(device: &PerDiskStats) -> String {
    format!("{}_{}", device.major, device.minor)
}

/// One point per device, reading only the `Count` sub-field.
fn per_count(
    devices: &[PerDiskStats],
    type_name: &str,
    type_instance: &str,
    out: &mut Vec<MetricPoint>,
) {
    for device in devices {
        if let Some(count) = device.stats.get("Count") {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(device_instance(device)),
                type_name,
                Some(type_instance.to_string()),
                vec![*count as f64],
            ));
        }
    }
}

/// One point per device per statistic, instance-named `{metric}_{stat}`.
fn per_stat(
    metric: &str,
    devices: &[PerDiskStats],
    type_name: &str,
    out: &mut Vec<MetricPoint>,
) {
    for device in devices {
        let instance = device_instance(device);
        for (stat, value) in &device.stats {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(instance.clone()),
                type_name,
                Some(format!("{metric}_{stat}")),
                vec![*value as f64],
            ));
        }
    }
}

pub(crate) fn decompose(stats: &DiskIoStats, out: &mut Vec<MetricPoint>) {
    // times
    per_count(&stats.io_time, "time_ms", "io_time", out);
    per_stat("io_wait_time", &stats.io_wait_time, "time_ns", out);
    per_stat("io_service_time", &stats.io_service_time, "time_ns", out);

    // bytes
    per_stat("io_service_bytes", &stats.io_service_bytes, "bytes", out);

    // gauges/counters
    per_count(&stats.sectors, "gauge", "sectors", out);
    per_stat("io_serviced", &stats.io_serviced, "gauge", out);
    per_stat("io_merged", &stats.io_merged, "gauge", out);
    per_stat("io_queued", &stats.io_queued, "counter", out);
}
