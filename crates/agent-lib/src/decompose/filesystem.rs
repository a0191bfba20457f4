use crate::models::{FilesystemStats, MetricPoint};

const PLUGIN: &str = "fs";
const DOCKER_MAPPER_PREFIX: &str = "/dev/mapper/docker-";

/// Shorten docker devicemapper names: strip the `/dev/mapper/` prefix,
/// truncate the final dash segment to the 12-char short container id, and
/// join with underscores. Other device names pass through unchanged.
pub(crate) fn normalize_device_name(device: &str) -> String {
    if !device
        .get(..DOCKER_MAPPER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCKER_MAPPER_PREFIX))
    {
        return device.to_string();
    }

    let trimmed = &device["/dev/mapper/".len()..];
    let mut parts: Vec<&str> = trimmed.split('-').collect();
    if let Some(last) = parts.last_mut() {
        if last.len() > 12 {
            *last = &last[..12];
        }
    }
    parts.join("_")
}

pub(crate) fn decompose(devices: &[FilesystemStats], out: &mut Vec<MetricPoint>) {
    for device in devices {
        let instance = normalize_device_name(&device.device);

        for (stat, value) in [("capacity", device.capacity), ("usage", device.usage)] {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(instance.clone()),
                "bytes",
                Some(stat.to_string()),
                vec![value as f64],
            ));
        }

        for (stat, value) in [
            ("read_time", device.read_time),
            ("io_time", device.io_time),
            ("weighted_io_time", device.weighted_io_time),
            ("write_time", device.write_time),
        ] {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(instance.clone()),
                "time_ms",
                Some(stat.to_string()),
                vec![value as f64],
            ));
        }

        for (stat, value) in [
            ("writes_completed", device.writes_completed),
            ("reads_completed", device.reads_completed),
            ("writes_merged", device.writes_merged),
            ("sectors_written", device.sectors_written),
            ("reads_merged", device.reads_merged),
            ("sectors_read", device.sectors_read),
        ] {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(instance.clone()),
                "gauge",
                Some(stat.to_string()),
                vec![value as f64],
            ));
        }

        out.push(MetricPoint::new(
            PLUGIN,
            Some(instance),
            "counter",
            Some("io_in_progress".to_string()),
            vec![device.io_in_progress as f64],
        ));
    }
}
