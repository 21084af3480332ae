//! Per-zone subnet layout.
//!
//! Zone `i` (zero based, in input order) gets `{a}.{b}.{i}.0/24`, where
//! `a.b` are the first two octets of the VPC block. Nothing here talks to
//! an engine, so a bad layout is rejected before anything is declared.

use crate::error::TopologyError;
use crate::models::Ipv4;
use itertools::Itertools;
use std::net::Ipv4Addr;

/// The third octet holds the zone index.
pub const MAX_ZONES: usize = 256;
pub const SUBNET_MASK: u8 = 24;

pub const SUBNET_NAME_PREFIX: &str = "public-subnet-";
pub const ASSOCIATION_NAME_PREFIX: &str = "public-subnet-rt-assoc-";
pub const ROUTE_NAME_PREFIX: &str = "internet-route-";

/// Resource name for a per-zone resource: `prefix` followed by the zone.
///
/// Plain concatenation, no truncation. Distinct zones always give
/// distinct names; the same zone listed twice collides and
/// [`plan_subnets`] rejects it.
pub fn resource_name(prefix: &str, zone: &str) -> String {
    format!("{prefix}{zone}")
}

/// One zone's derived subnet and resource names.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetLayout {
    pub index: u8,
    pub zone: String,
    pub cidr: Ipv4,
    pub subnet_name: String,
    pub association_name: String,
    pub route_name: String,
}

/// Subnet block for zone `index` inside `vpc`.
pub fn zone_subnet_cidr(vpc: Ipv4, index: usize) -> Result<Ipv4, TopologyError> {
    let third = u8::try_from(index).map_err(|_| TopologyError::TooManyZones {
        count: index + 1,
        max: MAX_ZONES,
    })?;
    let [a, b, _, _] = vpc.addr.octets();
    Ok(Ipv4 {
        addr: Ipv4Addr::new(a, b, third, 0),
        mask: SUBNET_MASK,
    })
}

/// Derive the subnet layout for `zones` in order.
pub fn plan_subnets(vpc: Ipv4, zones: &[String]) -> Result<Vec<SubnetLayout>, TopologyError> {
    if zones.is_empty() {
        return Err(TopologyError::NoZones);
    }
    if zones.len() > MAX_ZONES {
        return Err(TopologyError::TooManyZones {
            count: zones.len(),
            max: MAX_ZONES,
        });
    }
    if let Some(name) = zones
        .iter()
        .map(|z| resource_name(SUBNET_NAME_PREFIX, z))
        .duplicates()
        .next()
    {
        return Err(TopologyError::DuplicateResourceName(name));
    }

    zones
        .iter()
        .enumerate()
        .map(|(i, zone)| {
            let cidr = zone_subnet_cidr(vpc, i)?;
            if !vpc.contains(&cidr) {
                return Err(TopologyError::SubnetOutsideVpc {
                    zone: zone.clone(),
                    subnet: cidr,
                    vpc,
                });
            }
            log::trace!("zone #{i} {zone} => {cidr}");
            Ok(SubnetLayout {
                index: cidr.addr.octets()[2],
                zone: zone.clone(),
                cidr,
                subnet_name: resource_name(SUBNET_NAME_PREFIX, zone),
                association_name: resource_name(ASSOCIATION_NAME_PREFIX, zone),
                route_name: resource_name(ROUTE_NAME_PREFIX, zone),
            })
        })
        .collect()
}
