use crate::models::{MemoryStats, MetricPoint};

const PLUGIN: &str = "memory";

pub(crate) fn decompose(stats: &MemoryStats, out: &mut Vec<MetricPoint>) {
    for (key, value) in [("usage", stats.usage), ("working_set", stats.working_set)] {
        if let Some(bytes) = value {
            out.push(MetricPoint::new(
                PLUGIN,
                None,
                "memory",
                Some(key.to_string()),
                vec![bytes as f64],
            ));
        }
    }

    // the breakdown-map name becomes the plugin instance
    for (map_name, map) in [
        ("hierarchical_data", &stats.hierarchical_data),
        ("container_data", &stats.container_data),
    ] {
        for (key, value) in map {
            out.push(MetricPoint::new(
                PLUGIN,
                Some(map_name.to_string()),
                "gauge",
                Some(key.clone()),
                vec![*value],
            ));
        }
    }
}
