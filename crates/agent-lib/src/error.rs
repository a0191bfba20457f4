//! Error taxonomy for configuration loading and polling cycles.

use thiserror::Error;

/// Process exit code for an unreachable or misbehaving upstream.
pub const EXIT_UPSTREAM: i32 = 1;
/// Process exit code for invalid or self-contradictory configuration.
pub const EXIT_CONFIG: i32 = 2;
/// Process exit code for a violated internal invariant.
pub const EXIT_INTERNAL: i32 = 10;

/// Fatal configuration errors, raised at load time before any fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("conflicting service filter: include and exclude cannot both claim the wildcard")]
    ConflictingServiceFilter,

    #[error("no service filter mode identified: add \"*\" to include or exclude, or leave both empty")]
    AmbiguousServiceFilter,

    #[error("invalid {source_id} host specifier {spec:?}: expected an IPv4 address or docker/<name-or-id>")]
    InvalidHostSpec { source_id: &'static str, spec: String },

    #[error("{0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        EXIT_CONFIG
    }
}

/// Errors aborting a single polling cycle.
///
/// A cycle either dispatches its complete point stream or dispatches nothing;
/// these variants let callers distinguish a failed cycle from an empty one.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Network timeout, connection refusal, or a non-2xx response.
    #[error("{source_id}: upstream unreachable: {reason}")]
    Unreachable { source_id: String, reason: String },

    /// Response body was not valid JSON or lacked the expected shape.
    #[error("{source_id}: malformed response: {reason}")]
    Protocol { source_id: String, reason: String },

    /// A state the configuration validation should have made impossible.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl CycleError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CycleError::Unreachable { .. } | CycleError::Protocol { .. } => EXIT_UPSTREAM,
            CycleError::Internal(_) => EXIT_INTERNAL,
        }
    }
}
