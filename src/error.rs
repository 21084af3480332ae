//! Error types for topology construction

use crate::engine::EngineError;
use crate::models::Ipv4;
use thiserror::Error;

/// Everything that can stop a topology build.
///
/// Validation variants are raised before the first registration; only
/// [`TopologyError::Registration`] can happen part way through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    /// The engine rejected a declaration or export. Passed through as is.
    #[error(transparent)]
    Registration(#[from] EngineError),

    #[error("no availability zones supplied")]
    NoZones,

    #[error("{count} availability zones supplied, the third octet holds at most {max}")]
    TooManyZones { count: usize, max: usize },

    #[error("subnet {subnet} for zone '{zone}' is outside the VPC block {vpc}")]
    SubnetOutsideVpc {
        zone: String,
        subnet: Ipv4,
        vpc: Ipv4,
    },

    /// Two zones map onto the same resource name.
    #[error("resource name '{0}' is derived from more than one zone")]
    DuplicateResourceName(String),

    #[error("environment name '{0}' must be non-empty and contain no whitespace")]
    InvalidEnvironment(String),

    #[error("unknown time zone '{0}'")]
    InvalidTimezone(String),

    #[error("invalid availability zone '{0}'")]
    InvalidZone(String),

    #[error("public key material is not an OpenSSH public key")]
    InvalidPublicKey,

    #[error("resource '{name}' did not expose output '{output}'")]
    MissingOutput { name: String, output: String },
}
