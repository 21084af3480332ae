//! Declares a multi-AZ public AWS network (VPC, gateway, subnets, routing,
//! security groups, key pair) against a declarative reconciliation engine.
//!
//! - [`config`] - inputs with file and environment overrides
//! - [`models`] - CIDR type and resource specifications
//! - [`engine`] - registration seam, in-memory engine and plan files
//! - [`processing`] - subnet layout and the topology builder
//! - [`output`] - terminal printing

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use config::{load_config, RoutePolicy, TopologyConfig};
pub use engine::{Engine, EngineError, MemoryEngine, Plan};
pub use error::TopologyError;
pub use processing::{build_topology, TopologyOutputs};

/// Build the topology against a fresh [`MemoryEngine`] and return what it recorded.
pub fn plan_topology(config: &TopologyConfig) -> Result<(TopologyOutputs, Plan), TopologyError> {
    let mut engine = MemoryEngine::new();
    let outputs = build_topology(&mut engine, config)?;
    Ok((outputs, engine.into_plan()))
}
