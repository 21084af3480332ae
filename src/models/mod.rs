//! Domain models for the AWS public network topology.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`ResourceSpec`] - argument bundles for each declared EC2 resource
//! - [`security_group`] - the fixed security group policy

mod ipv4;
mod resource;
pub mod security_group;

// Re-export public types
pub use ipv4::{broadcast_addr, cut_addr, get_cidr_mask, Ipv4, MAX_LENGTH};
pub use resource::{
    name_tags, InternetGatewayArgs, KeyPairArgs, Protocol, ResourceSpec, RouteArgs,
    RouteTableArgs, RouteTableAssociationArgs, SecurityGroupArgs, SecurityGroupRule, SubnetArgs,
    TagArgs, VpcArgs, NAME_TAG,
};
