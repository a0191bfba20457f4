//! Polling loop driving the pipelines.
//!
//! One tick runs every pipeline's cycle to completion, sequentially; cycles
//! never overlap and a failed cycle only skips that pipeline until the next
//! tick.

use super::Pipeline;
use crate::health::HealthRegistry;
use crate::observability::BridgeMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

/// Configuration for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Base polling interval (default: 10 seconds)
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

pub struct PollLoop {
    pipelines: Vec<Arc<dyn Pipeline>>,
    config: PollConfig,
    metrics: BridgeMetrics,
    health: Option<HealthRegistry>,
}

impl PollLoop {
    pub fn new(pipelines: Vec<Arc<dyn Pipeline>>, config: PollConfig) -> Self {
        Self {
            pipelines,
            config,
            metrics: BridgeMetrics::new(),
            health: None,
        }
    }

    /// Report per-pipeline cycle outcomes to a health registry.
    pub fn with_health(mut self, health: HealthRegistry) -> Self {
        self.health = Some(health);
        self
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: tokio::sync::broadcast::Receiver<()>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            pipelines = self.pipelines.len(),
            "Starting polling loop"
        );

        let mut ticker = interval(self.config.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_all().await;
                }
                _ = shutdown.recv() => {
                    info!("Shutting down polling loop");
                    break;
                }
            }
        }
    }

    /// One tick: every pipeline runs one complete cycle.
    pub async fn poll_all(&self) {
        for pipeline in &self.pipelines {
            let start = Instant::now();
            match pipeline.run_cycle().await {
                Ok(report) => {
                    self.metrics
                        .observe_cycle_latency(start.elapsed().as_secs_f64());
                    self.metrics.add_points_emitted(report.points_emitted as i64);
                    self.metrics
                        .set_containers_tracked(report.containers_emitted as i64);
                    if let Some(health) = &self.health {
                        health.set_healthy(pipeline.name()).await;
                    }
                    debug!(
                        pipeline = pipeline.name(),
                        services = report.services_emitted,
                        containers = report.containers_emitted,
                        points = report.points_emitted,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Cycle complete"
                    );
                }
                Err(error) => {
                    self.metrics.inc_cycle_errors();
                    if let Some(health) = &self.health {
                        health.set_degraded(pipeline.name(), error.to_string()).await;
                    }
                    warn!(
                        pipeline = pipeline.name(),
                        error = %error,
                        "Cycle aborted; next tick is the retry"
                    );
                }
            }
        }
    }
}
