//! Bridge library for forwarding container and cluster metrics to collectd.
//!
//! This crate provides the core functionality for:
//! - Normalizing the container daemon's nested statistics into flat points
//! - Service filtering and container identity resolution
//! - Resource-manager snapshot classification and leader mirroring
//! - Health checks and observability

pub mod config;
pub mod decompose;
pub mod error;
pub mod filter;
pub mod health;
pub mod models;
pub mod naming;
pub mod observability;
pub mod pipeline;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod typemap;

pub use error::{ConfigError, CycleError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::BridgeMetrics;
pub use pipeline::{CadvisorPipeline, CycleReport, MesosPipeline, Pipeline, PollConfig, PollLoop};
