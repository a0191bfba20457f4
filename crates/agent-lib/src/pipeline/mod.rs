//! Polling-cycle orchestration.
//!
//! Each pipeline turns one fetched snapshot into a complete point stream.
//! Cycles are independent and fail-fast: an upstream error aborts the whole
//! cycle before anything is dispatched, and the next scheduled tick is the
//! only retry.

mod cadvisor;
mod mesos;
mod r#loop;


pub use cadvisor::CadvisorPipeline;
pub use mesos::MesosPipeline;
pub use r#loop::{PollConfig, PollLoop};

use crate::config::BridgeConfig;
use crate::error::{ConfigError, CycleError};
use crate::sink::MetricSink;
use crate::source::{CadvisorClient, ContainerLister, DockerApi, HostSpec, MesosClient};
use std::sync::Arc;

pub use async_trait::async_trait;

/// A pollable pipeline; one call runs one complete cycle.
#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;
    async fn run_cycle(&self) -> Result<CycleReport, CycleError>;
}

/// Counts from one completed cycle. All zeros is a successful empty cycle,
/// not an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub services_emitted: usize,
    pub containers_emitted: usize,
    pub points_emitted: usize,
}

/// Assemble the configured pipelines with live HTTP sources, all sharing
/// one sink. Configuration problems surface here, before the first poll.
pub fn build_pipelines(
    config: &BridgeConfig,
    hostname: &str,
    sink: Arc<dyn MetricSink>,
) -> Result<Vec<Arc<dyn Pipeline>>, ConfigError> {
    let mut pipelines: Vec<Arc<dyn Pipeline>> = Vec::new();

    if let Some(cadvisor) = &config.cadvisor {
        let lister: Arc<dyn ContainerLister> = Arc::new(DockerApi::new(&cadvisor.docker_endpoint)?);
        let host = HostSpec::parse(&cadvisor.host)?;
        let source = Arc::new(CadvisorClient::new(host, cadvisor.port, Some(lister.clone()))?);
        pipelines.push(Arc::new(CadvisorPipeline::new(
            cadvisor,
            hostname,
            source,
            Some(lister),
            sink.clone(),
        )?));
    }

    for mesos in &config.mesos {
        let source_id = format!("mesos-{}", mesos.profile.as_str());
        let source = Arc::new(MesosClient::new(&mesos.host, mesos.port, source_id)?);
        pipelines.push(Arc::new(MesosPipeline::new(mesos, source, sink.clone())));
    }

    Ok(pipelines)
}
