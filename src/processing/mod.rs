//! Topology construction logic.
//!
//! This module contains the only derivation logic in the crate:
//! - [`layout`] - per-zone subnet CIDRs and resource names
//! - [`topology`] - the linear declaration pass against an engine

pub mod layout;
pub mod topology;

// Re-export public functions
pub use layout::{plan_subnets, resource_name, zone_subnet_cidr, SubnetLayout, MAX_ZONES};
pub use topology::{build_topology, TopologyOutputs};
