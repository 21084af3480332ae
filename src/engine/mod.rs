//! Declarative reconciliation engine interface.
//!
//! The engine owns resource lifecycle. This crate only hands it named
//! resource specifications and named outputs:
//! - [`Engine`] - registration seam the topology builder writes to
//! - [`memory`] - in-process engine that records a [`Plan`]
//! - [`plan_file`] - JSON persistence of a recorded plan

pub mod memory;
mod plan_file;

use crate::models::ResourceSpec;
use std::collections::BTreeMap;
use thiserror::Error;

pub use memory::{MemoryEngine, Plan, PlannedResource};
pub use plan_file::{plan_file_name, read_plan, write_plan};

/// Output attribute a VPC exposes for its default route table.
pub const MAIN_ROUTE_TABLE_ID: &str = "main_route_table_id";

/// Failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("registration of '{name}' failed: {detail}")]
    Registration { name: String, detail: String },

    #[error("export of '{name}' failed: {detail}")]
    Export { name: String, detail: String },
}

impl EngineError {
    pub fn registration(name: &str, detail: impl Into<String>) -> Self {
        Self::Registration {
            name: name.to_string(),
            detail: detail.into(),
        }
    }

    pub fn export(name: &str, detail: impl Into<String>) -> Self {
        Self::Export {
            name: name.to_string(),
            detail: detail.into(),
        }
    }
}

/// Handle returned for a registered resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// Opaque provider id.
    pub id: String,
    /// Extra output attributes, keyed by attribute name.
    pub outputs: BTreeMap<String, String>,
}

impl Registered {
    pub fn new(id: impl Into<String>) -> Self {
        Registered {
            id: id.into(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn with_output(mut self, key: &str, value: impl Into<String>) -> Self {
        self.outputs.insert(key.to_string(), value.into());
        self
    }

    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).map(String::as_str)
    }
}

/// Collects resource declarations and named exports.
pub trait Engine {
    /// Declare one resource under a unique logical name.
    fn register(&mut self, name: &str, spec: &ResourceSpec) -> Result<Registered, EngineError>;

    /// Publish a named string output for downstream stacks.
    fn export(&mut self, name: &str, value: &str) -> Result<(), EngineError>;
}
