//! Upstream sources: the container stats daemon, the resource manager's
//! snapshot endpoint, and Docker container discovery.
//!
//! All fetches share a short fixed timeout; a slow or failing upstream
//! aborts the current cycle rather than stalling it. No retries happen
//! here; the polling scheduler's next tick is the retry mechanism.

use crate::error::{ConfigError, CycleError};
use crate::models::{ContainerSummary, MetricsSnapshot, StatsSnapshot};
use crate::resolver;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Fixed fetch timeout for every upstream call.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the container daemon's per-cgroup statistics snapshot.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch(&self) -> Result<StatsSnapshot, CycleError>;
}

/// Source of the resource manager's flat metrics snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<MetricsSnapshot, CycleError>;
}

/// Container discovery collaborator.
#[async_trait]
pub trait ContainerLister: Send + Sync {
    /// Running containers only; stopped containers are never emitted.
    async fn running_containers(&self) -> Result<Vec<ContainerSummary>, CycleError>;
}

fn http_client() -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| ConfigError::Invalid(format!("building http client: {e}")))
}

async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    source_id: &str,
    url: &str,
) -> Result<T, CycleError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CycleError::Unreachable {
            source_id: source_id.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CycleError::Unreachable {
            source_id: source_id.to_string(),
            reason: format!("{url} returned {status}"),
        });
    }

    response.json::<T>().await.map_err(|e| CycleError::Protocol {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })
}

/// How the stats daemon's endpoint is located.
#[derive(Debug, Clone)]
pub enum HostSpec {
    /// Static IPv4 address.
    Address(String),
    /// `docker/<name-or-id>`: resolved through the container list each
    /// cycle, since the container's address may change across restarts.
    Container(String),
}

impl HostSpec {
    pub fn parse(spec: &str) -> Result<HostSpec, ConfigError> {
        if let Some(target) = spec.strip_prefix("docker/") {
            if target.is_empty() {
                return Err(ConfigError::InvalidHostSpec {
                    source_id: "cadvisor",
                    spec: spec.to_string(),
                });
            }
            return Ok(HostSpec::Container(target.to_string()));
        }
        if spec.parse::<std::net::Ipv4Addr>().is_ok() {
            return Ok(HostSpec::Address(spec.to_string()));
        }
        Err(ConfigError::InvalidHostSpec {
            source_id: "cadvisor",
            spec: spec.to_string(),
        })
    }
}

/// HTTP client for the container stats daemon's v2 stats endpoint.
pub struct CadvisorClient {
    host: HostSpec,
    port: u16,
    lister: Option<Arc<dyn ContainerLister>>,
    client: reqwest::Client,
}

impl CadvisorClient {
    /// A `docker/…` host specifier needs a lister to resolve against.
    pub fn new(
        host: HostSpec,
        port: u16,
        lister: Option<Arc<dyn ContainerLister>>,
    ) -> Result<Self, ConfigError> {
        if matches!(host, HostSpec::Container(_)) && lister.is_none() {
            return Err(ConfigError::Invalid(
                "docker host specifier requires a container discovery endpoint".to_string(),
            ));
        }
        Ok(Self {
            host,
            port,
            lister,
            client: http_client()?,
        })
    }

    async fn endpoint(&self) -> Result<(String, u16), CycleError> {
        match &self.host {
            HostSpec::Address(ip) => Ok((ip.clone(), self.port)),
            HostSpec::Container(spec) => {
                let lister = self.lister.as_ref().ok_or_else(|| {
                    CycleError::Internal("docker host specifier without a lister".to_string())
                })?;
                let containers = lister.running_containers().await?;
                let target = containers
                    .iter()
                    .find(|c| resolver::specifier_matches(spec, &c.id, &c.names))
                    .ok_or_else(|| CycleError::Unreachable {
                        source_id: "cadvisor".to_string(),
                        reason: format!("container {spec:?} is not running"),
                    })?;
                let address = target
                    .network_address
                    .clone()
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| CycleError::Unreachable {
                        source_id: "cadvisor".to_string(),
                        reason: format!("container {spec:?} has no network address"),
                    })?;
                let port = target.exposed_ports.first().copied().unwrap_or(self.port);
                Ok((address, port))
            }
        }
    }
}

#[async_trait]
impl StatsSource for CadvisorClient {
    async fn fetch(&self) -> Result<StatsSnapshot, CycleError> {
        let (host, port) = self.endpoint().await?;
        let url = format!("http://{host}:{port}/api/v2.0/stats?recursive=true&count=1");
        fetch_json(&self.client, "cadvisor", &url).await
    }
}

/// HTTP client for a resource manager's `/metrics/snapshot` endpoint.
pub struct MesosClient {
    url: String,
    source_id: String,
    client: reqwest::Client,
}

impl MesosClient {
    pub fn new(host: &str, port: u16, source_id: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_url(
            format!("http://{host}:{port}/metrics/snapshot"),
            source_id,
        )
    }

    pub fn with_url(url: impl Into<String>, source_id: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: url.into(),
            source_id: source_id.into(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl SnapshotSource for MesosClient {
    async fn fetch(&self) -> Result<MetricsSnapshot, CycleError> {
        fetch_json(&self.client, &self.source_id, &self.url).await
    }
}

/// Docker Engine API client used for container discovery.
pub struct DockerApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiContainer {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Names", default)]
    names: Vec<String>,
    #[serde(rename = "Ports", default)]
    ports: Vec<ApiPort>,
    #[serde(rename = "NetworkSettings", default)]
    network_settings: Option<ApiNetworkSettings>,
}

#[derive(Debug, Deserialize)]
struct ApiPort {
    #[serde(rename = "PrivatePort")]
    private_port: u16,
    #[serde(rename = "Type", default)]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiNetworkSettings {
    #[serde(rename = "Networks", default)]
    networks: BTreeMap<String, ApiNetwork>,
}

#[derive(Debug, Deserialize)]
struct ApiNetwork {
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
}

impl DockerApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url.into(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl ContainerLister for DockerApi {
    async fn running_containers(&self) -> Result<Vec<ContainerSummary>, CycleError> {
        // /containers/json lists running containers unless all=true is passed
        let url = format!("{}/containers/json", self.base_url.trim_end_matches('/'));
        let raw: Vec<ApiContainer> = fetch_json(&self.client, "docker", &url).await?;

        Ok(raw
            .into_iter()
            .map(|container| ContainerSummary {
                network_address: container.network_settings.and_then(|settings| {
                    settings
                        .networks
                        .into_values()
                        .map(|n| n.ip_address)
                        .find(|ip| !ip.is_empty())
                }),
                exposed_ports: container
                    .ports
                    .iter()
                    .filter(|p| p.kind == "tcp")
                    .map(|p| p.private_port)
                    .collect(),
                id: container.id,
                names: container.names,
            })
            .collect())
    }
}
