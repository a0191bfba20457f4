//! The container-stats pipeline: filter raw service keys, decompose the
//! enabled categories, and emit tracked containers under their own names.

use super::{CycleReport, Pipeline};
use crate::config::{ActiveMetrics, CadvisorConfig};
use crate::decompose;
use crate::error::{ConfigError, CycleError};
use crate::filter::ServiceFilter;
use crate::models::{ContainerRecord, ContainerStats};
use crate::naming::NameSpec;
use crate::resolver;
use crate::sink::MetricSink;
use crate::source::{ContainerLister, StatsSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub struct CadvisorPipeline {
    source: Arc<dyn StatsSource>,
    lister: Option<Arc<dyn ContainerLister>>,
    sink: Arc<dyn MetricSink>,
    filter: ServiceFilter,
    active: ActiveMetrics,
    docker_enabled: bool,
    docker_containers: Vec<String>,
    hostname: String,
    ns_host: NameSpec,
    ns_plugin: NameSpec,
}

impl CadvisorPipeline {
    pub fn new(
        config: &CadvisorConfig,
        hostname: impl Into<String>,
        source: Arc<dyn StatsSource>,
        lister: Option<Arc<dyn ContainerLister>>,
        sink: Arc<dyn MetricSink>,
    ) -> Result<Self, ConfigError> {
        if config.docker_enabled && lister.is_none() {
            return Err(ConfigError::Invalid(
                "container tracking enabled without a discovery endpoint".to_string(),
            ));
        }
        let filter = ServiceFilter::new(
            &config.system_services,
            config.system_enabled,
            config.system_fs_metrics,
        )?;
        Ok(Self {
            source,
            lister,
            sink,
            filter,
            active: ActiveMetrics::from_config(&config.metrics),
            docker_enabled: config.docker_enabled,
            docker_containers: config.docker_containers.clone(),
            hostname: hostname.into(),
            ns_host: NameSpec::new(&config.ns_host),
            ns_plugin: NameSpec::new(&config.ns_plugin),
        })
    }

    /// Decompose one entity's stats and dispatch under its rendered names.
    fn emit(
        &self,
        name: &str,
        container_id: &str,
        stats: &ContainerStats,
        fs_metrics: bool,
    ) -> usize {
        let mut points = Vec::new();
        decompose::decompose(stats, &self.active, fs_metrics, &mut points);

        let host = self.ns_host.render(&self.hostname, name, container_id);
        let prefix = self.ns_plugin.render(&self.hostname, name, container_id);
        let emitted = points.len();

        for mut point in points {
            point.plugin = format!("{}{}", prefix, point.plugin);
            if host == self.hostname {
                self.sink.dispatch(&point);
            } else {
                self.sink.dispatch_as(&host, &point);
            }
        }
        emitted
    }
}

#[async_trait]
impl Pipeline for CadvisorPipeline {
    fn name(&self) -> &str {
        "cadvisor"
    }

    async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let snapshot = self.source.fetch().await?;
        let mut report = CycleReport::default();

        for (service, samples) in &snapshot {
            let Some(stats) = samples.first() else {
                continue;
            };
            let Some(target) = self.filter.classify(service) else {
                continue;
            };
            report.points_emitted += self.emit(&target.name, "0", stats, target.fs_metrics);
            report.services_emitted += 1;
        }

        if self.docker_enabled {
            let lister = self.lister.as_ref().ok_or_else(|| {
                CycleError::Internal("container tracking enabled without a lister".to_string())
            })?;

            // rebuilt from scratch every cycle: the container set may have changed
            let mut records: Vec<ContainerRecord> = lister
                .running_containers()
                .await?
                .into_iter()
                .map(ContainerRecord::from)
                .collect();
            resolver::assign_slice_ids(&mut records, &self.docker_containers);

            for record in &records {
                let Some(slice_id) = &record.slice_id else {
                    continue;
                };
                let Some(stats) = snapshot.get(slice_id).and_then(|s| s.first()) else {
                    warn!(
                        container_id = %record.id,
                        slice_id = %slice_id,
                        "Slice missing from snapshot, skipping container"
                    );
                    continue;
                };
                let name = display_container_name(&record.names);
                report.points_emitted +=
                    self.emit(&name, short_container_id(&record.id), stats, false);
                report.containers_emitted += 1;
            }
        }

        Ok(report)
    }
}

/// Joined container-name list with the API's leading slashes removed.
fn display_container_name(names: &[String]) -> String {
    names.concat().replace('/', "")
}

fn short_container_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_display_container_name_joins_and_strips_slashes() {
        let names = vec!["/web".to_string(), "/web-alias".to_string()];
        assert_eq!(display_container_name(&names), "webweb-alias");
    }

    #[test]
    fn test_short_container_id_truncates_to_twelve() {
        let id = "deadbeef00112233445566778899aabbccddeeff00112233445566778899aabb";
        assert_eq!(short_container_id(id), "deadbeef0011");
        assert_eq!(short_container_id("abc"), "abc");
    }
}
