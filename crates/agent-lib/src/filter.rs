//! Service filtering: classifies raw cgroup/service keys and decides,
//! per kind, whether they are eligible for emission.

use crate::error::ConfigError;
use serde::Deserialize;

/// Include/exclude policy for arbitrary systemd services plus per-kind
/// toggles for the well-known cgroup kinds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilterConfig {
    #[serde(default)]
    pub options: ServiceFilterOptions,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilterOptions {
    #[serde(default)]
    pub include_mounts: bool,
    #[serde(default)]
    pub include_sockets: bool,
    #[serde(default)]
    pub include_docker_scopes: bool,
    #[serde(default)]
    pub include_system_slice: bool,
    #[serde(default)]
    pub include_user_slice: bool,
    #[serde(default)]
    pub include_other_slice: bool,
}

/// Which filter mode the include/exclude sets select. Exactly one mode is
/// active; the contradictory configurations are rejected at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Both sets empty: every service passes.
    All,
    /// `*` in exclude only: a service passes iff any include entry is a
    /// substring of its key.
    IncludeOnly,
    /// `*` in include only: a service passes iff every exclude entry fails
    /// to match its key.
    ExcludeOnly,
}

impl FilterMode {
    pub fn derive(include: &[String], exclude: &[String]) -> Result<FilterMode, ConfigError> {
        let include_wildcard = include.iter().any(|e| e == "*");
        let exclude_wildcard = exclude.iter().any(|e| e == "*");

        if include.is_empty() && exclude.is_empty() {
            Ok(FilterMode::All)
        } else if exclude_wildcard && !include_wildcard {
            Ok(FilterMode::IncludeOnly)
        } else if include_wildcard && !exclude_wildcard {
            Ok(FilterMode::ExcludeOnly)
        } else if include_wildcard && exclude_wildcard {
            Err(ConfigError::ConflictingServiceFilter)
        } else {
            Err(ConfigError::AmbiguousServiceFilter)
        }
    }
}

/// Raw service-key kinds, in evaluation priority order. Docker scopes are
/// classified before the generic `.slice`/`.mount` suffix rules so a scope
/// under `/system.slice/` never falls through to another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Root,
    SystemSlice,
    UserSlice,
    DockerScope,
    OtherSlice,
    Mount,
    Socket,
    Service,
}

pub fn classify_key(key: &str) -> ServiceKind {
    if key == "/" {
        ServiceKind::Root
    } else if key == "/system.slice" {
        ServiceKind::SystemSlice
    } else if key == "/user.slice" {
        ServiceKind::UserSlice
    } else if key.starts_with("/system.slice/docker-") && key.ends_with(".scope") {
        ServiceKind::DockerScope
    } else if key.ends_with(".slice") {
        ServiceKind::OtherSlice
    } else if key.ends_with(".mount") {
        ServiceKind::Mount
    } else if key.ends_with(".sockets") {
        ServiceKind::Socket
    } else {
        ServiceKind::Service
    }
}

/// Outcome of filtering one raw service key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    /// Display name used as the plugin-name prefix.
    pub name: String,
    /// Only the root cgroup carries filesystem sub-metrics, and only when
    /// they are separately enabled.
    pub fs_metrics: bool,
}

impl ServiceTarget {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fs_metrics: false,
        }
    }
}

/// Emission decisions for raw service keys, derived once from static
/// configuration and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServiceFilter {
    options: ServiceFilterOptions,
    include: Vec<String>,
    exclude: Vec<String>,
    mode: FilterMode,
    system_enabled: bool,
    system_fs_metrics: bool,
}

impl ServiceFilter {
    pub fn new(
        config: &ServiceFilterConfig,
        system_enabled: bool,
        system_fs_metrics: bool,
    ) -> Result<Self, ConfigError> {
        let mode = FilterMode::derive(&config.include, &config.exclude)?;
        Ok(Self {
            options: config.options.clone(),
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            mode,
            system_enabled,
            system_fs_metrics,
        })
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Decide whether a raw service key is emitted, and under which display
    /// name. `None` means the key is filtered out for this configuration.
    pub fn classify(&self, key: &str) -> Option<ServiceTarget> {
        match classify_key(key) {
            ServiceKind::Root => self.system_enabled.then(|| ServiceTarget {
                name: "sys".to_string(),
                fs_metrics: self.system_fs_metrics,
            }),
            ServiceKind::SystemSlice => self
                .options
                .include_system_slice
                .then(|| ServiceTarget::named("sys.slice")),
            ServiceKind::UserSlice => self
                .options
                .include_user_slice
                .then(|| ServiceTarget::named("usr.slice")),
            ServiceKind::DockerScope => self
                .options
                .include_docker_scopes
                .then(|| ServiceTarget::named("docker")),
            ServiceKind::OtherSlice => self
                .options
                .include_other_slice
                .then(|| ServiceTarget::named("oth.slice")),
            ServiceKind::Mount => self
                .options
                .include_mounts
                .then(|| ServiceTarget::named("mount")),
            ServiceKind::Socket => self
                .options
                .include_sockets
                .then(|| ServiceTarget::named("socket")),
            ServiceKind::Service => self
                .service_passes(key)
                .then(|| ServiceTarget::named(&display_service_name(key))),
        }
    }

    fn service_passes(&self, key: &str) -> bool {
        match self.mode {
            FilterMode::All => true,
            FilterMode::IncludeOnly => self.include.iter().any(|e| key.contains(e.as_str())),
            // Every exclude entry must fail to match, not just one.
            FilterMode::ExcludeOnly => self.exclude.iter().all(|e| !key.contains(e.as_str())),
        }
    }
}

/// Strip the leading path and rename the `.service` suffix to `.svc`.
fn display_service_name(key: &str) -> String {
    key.rsplit('/')
        .next()
        .unwrap_or(key)
        .replace(".service", ".svc")
}
