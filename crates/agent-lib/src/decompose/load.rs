use crate::models::MetricPoint;
use std::collections::BTreeMap;

const PLUGIN: &str = "load_stats";

pub(crate) fn decompose(stats: &BTreeMap<String, f64>, out: &mut Vec<MetricPoint>) {
    for (key, value) in stats {
        // the type instance keeps a literal leading hyphen from the source key
        out.push(MetricPoint::new(
            PLUGIN,
            None,
            "gauge",
            Some(format!("-{key}")),
            vec![*value],
        ));
    }
}
