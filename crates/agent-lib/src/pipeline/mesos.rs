//! The resource-manager pipeline: classify each key of the flat snapshot
//! and emit one point per key, mirroring to a tracking host when this node
//! is the elected leader.

use super::{CycleReport, Pipeline};
use crate::config::{MesosConfig, MesosProfile};
use crate::error::CycleError;
use crate::models::MetricPoint;
use crate::sink::MetricSink;
use crate::source::SnapshotSource;
use crate::typemap::MetricTypeRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Snapshot key flagging the currently-elected leader.
pub const ELECTED_MASTER_KEY: &str = "master/elected";

const PLUGIN: &str = "mesos";
const SOURCE_SEPARATOR: char = '/';

pub struct MesosPipeline {
    name: String,
    source: Arc<dyn SnapshotSource>,
    sink: Arc<dyn MetricSink>,
    registry: MetricTypeRegistry,
    profile: MesosProfile,
    tracking_name: Option<String>,
    separator: Option<String>,
}

impl MesosPipeline {
    pub fn new(
        config: &MesosConfig,
        source: Arc<dyn SnapshotSource>,
        sink: Arc<dyn MetricSink>,
    ) -> Self {
        Self {
            name: format!("mesos-{}", config.profile.as_str()),
            source,
            sink,
            registry: MetricTypeRegistry::new(
                config.metric_types.clone(),
                config.default_metric_type.clone(),
            ),
            profile: config.profile,
            tracking_name: config.tracking_name.clone(),
            separator: config.separator.clone(),
        }
    }
}

#[async_trait]
impl Pipeline for MesosPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let snapshot = self.source.fetch().await?;

        // Recomputed every cycle, never cached: the elected master may have
        // changed since the last run.
        let tracking_host = match (&self.profile, &self.tracking_name) {
            (MesosProfile::Master, Some(name))
                if snapshot.get(ELECTED_MASTER_KEY) == Some(&1.0) =>
            {
                Some(name.as_str())
            }
            _ => None,
        };

        let mut report = CycleReport::default();
        for (key, value) in &snapshot {
            let Some(metric_type) = self.registry.resolve(key) else {
                continue;
            };
            let type_instance = match &self.separator {
                Some(separator) => key.replace(SOURCE_SEPARATOR, separator),
                None => key.clone(),
            };
            let point = MetricPoint::new(
                PLUGIN,
                Some(self.profile.as_str().to_string()),
                metric_type,
                Some(type_instance),
                vec![*value],
            );
            self.sink.dispatch(&point);
            report.points_emitted += 1;

            if let Some(host) = tracking_host {
                self.sink.dispatch_as(host, &point);
                report.points_emitted += 1;
            }
        }

        Ok(report)
    }
}
