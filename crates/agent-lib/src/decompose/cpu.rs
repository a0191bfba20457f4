use crate::models::{CpuStats, MetricPoint};

const PLUGIN: &str = "cpu";

pub(crate) fn decompose(stats: &CpuStats, out: &mut Vec<MetricPoint>) {
    if let Some(load_average) = stats.load_average {
        out.push(MetricPoint::new(
            PLUGIN,
            None,
            "gauge",
            Some("avg".to_string()),
            vec![load_average],
        ));
    }

    let Some(usage) = &stats.usage else {
        return;
    };

    for (key, value) in [
        ("system", usage.system),
        ("total", usage.total),
        ("user", usage.user),
    ] {
        if let Some(nanos) = value {
            out.push(MetricPoint::new(
                PLUGIN,
                None,
                "time_ns",
                Some(key.to_string()),
                vec![nanos as f64],
            ));
        }
    }

    // core index disambiguates the per-core points
    for (core, nanos) in usage.per_cpu_usage.iter().enumerate() {
        out.push(MetricPoint::new(
            PLUGIN,
            Some(core.to_string()),
            "time_ns",
            None,
            vec![*nanos as f64],
        ));
    }
}
