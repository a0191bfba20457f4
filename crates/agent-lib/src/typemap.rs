//! Metric-type lookup with a default fallback and an ignore sentinel.

use std::collections::BTreeMap;

/// Sentinel rule value disabling a metric (matched case-insensitively).
const IGNORE: &str = "ignore";

/// Read-only map from raw metric name to emission type, loaded once from
/// static configuration.
#[derive(Debug, Clone)]
pub struct MetricTypeRegistry {
    types: BTreeMap<String, String>,
    default_type: String,
}

impl MetricTypeRegistry {
    pub fn new(types: BTreeMap<String, String>, default_type: impl Into<String>) -> Self {
        Self {
            types,
            default_type: default_type.into(),
        }
    }

    /// Exact-match lookup. `None` means the metric is configured off;
    /// an unconfigured metric falls back to the default type rather than
    /// failing.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        match self.types.get(key) {
            Some(rule) if rule.eq_ignore_ascii_case(IGNORE) => None,
            Some(rule) => Some(rule),
            None => Some(&self.default_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(&str, &str)]) -> MetricTypeRegistry {
        let types = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MetricTypeRegistry::new(types, "gauge")
    }

    #[test]
    fn test_explicit_rule_wins() {
        let registry = registry(&[("master/uptime_secs", "counter")]);
        assert_eq!(registry.resolve("master/uptime_secs"), Some("counter"));
    }

    #[test]
    fn test_unconfigured_key_falls_back_to_default() {
        let registry = registry(&[]);
        assert_eq!(registry.resolve("master/cpus_total"), Some("gauge"));
    }

    #[test]
    fn test_ignore_is_case_insensitive() {
        let registry = registry(&[("master/noise", "IGNORE"), ("slave/noise", "ignore")]);
        assert_eq!(registry.resolve("master/noise"), None);
        assert_eq!(registry.resolve("slave/noise"), None);
    }

    #[test]
    fn test_lookup_is_exact_match_only() {
        let registry = registry(&[("master/noise", "ignore")]);
        // A prefix of an ignored key is a different key and gets the default.
        assert_eq!(registry.resolve("master/nois"), Some("gauge"));
    }
}
