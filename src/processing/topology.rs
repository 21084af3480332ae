//! Network topology builder.
//!
//! Declares the public network in one linear pass: key pair, VPC, VPC
//! tag, internet gateway, per-zone subnet wiring, the three security
//! groups, then the exports. The first engine error ends the pass.

use super::layout::{plan_subnets, SubnetLayout};
use crate::config::{RoutePolicy, TopologyConfig};
use crate::engine::{Engine, Registered, MAIN_ROUTE_TABLE_ID};
use crate::error::TopologyError;
use crate::models::security_group::{http_group, k0s_group, ssh_group};
use crate::models::{
    name_tags, InternetGatewayArgs, Ipv4, KeyPairArgs, ResourceSpec, RouteArgs, RouteTableArgs,
    RouteTableAssociationArgs, SecurityGroupArgs, SubnetArgs, TagArgs, VpcArgs, NAME_TAG,
};
use colored::Colorize;

pub const KEY_PAIR_NAME: &str = "adminaws";
pub const VPC_TAG_NAME: &str = "vpc-tag";
pub const GATEWAY_NAME: &str = "igw";
pub const SHARED_ROUTE_NAME: &str = "internet-route";
pub const DEDICATED_ROUTE_TABLE_NAME: &str = "public-routes";

pub const EXPORT_VPC_ID: &str = "vpcID";
pub const EXPORT_KEY_PAIR: &str = "keyPair";
pub const EXPORT_SSH_GROUP: &str = "sshGroup";
pub const EXPORT_K0S_GROUP: &str = "k0sGroup";
pub const EXPORT_HTTP_GROUP: &str = "httpGroup";
pub const EXPORT_GATEWAY_ID: &str = "igwID";

/// Ids of everything the builder declared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyOutputs {
    pub vpc_id: String,
    pub key_pair_id: String,
    pub gateway_id: String,
    /// Table the subnets were associated with.
    pub route_table_id: String,
    pub subnet_ids: Vec<String>,
    pub ssh_group_id: String,
    pub k0s_group_id: String,
    pub http_group_id: String,
}

impl TopologyOutputs {
    /// The published name -> id bindings, in export order.
    pub fn exports(&self) -> Vec<(&'static str, &str)> {
        vec![
            (EXPORT_VPC_ID, self.vpc_id.as_str()),
            (EXPORT_KEY_PAIR, self.key_pair_id.as_str()),
            (EXPORT_SSH_GROUP, self.ssh_group_id.as_str()),
            (EXPORT_K0S_GROUP, self.k0s_group_id.as_str()),
            (EXPORT_HTTP_GROUP, self.http_group_id.as_str()),
            (EXPORT_GATEWAY_ID, self.gateway_id.as_str()),
        ]
    }
}

fn default_route(route_table_id: &str, gateway_id: &str) -> ResourceSpec {
    ResourceSpec::Route(RouteArgs {
        route_table_id: route_table_id.to_string(),
        destination_cidr_block: Ipv4::ANY,
        gateway_id: gateway_id.to_string(),
    })
}

fn output_of(registered: &Registered, name: &str, output: &str) -> Result<String, TopologyError> {
    registered
        .output(output)
        .map(str::to_string)
        .ok_or_else(|| TopologyError::MissingOutput {
            name: name.to_string(),
            output: output.to_string(),
        })
}

/// Declare one zone's subnet and wire it to `route_table_id`.
fn declare_zone<E: Engine>(
    engine: &mut E,
    zone: &SubnetLayout,
    vpc_id: &str,
    route_table_id: &str,
    map_public_ip_on_launch: bool,
) -> Result<String, TopologyError> {
    let subnet = engine.register(
        &zone.subnet_name,
        &ResourceSpec::Subnet(SubnetArgs {
            vpc_id: vpc_id.to_string(),
            cidr_block: zone.cidr,
            availability_zone: zone.zone.clone(),
            map_public_ip_on_launch,
            tags: name_tags(&zone.subnet_name),
        }),
    )?;

    engine.register(
        &zone.association_name,
        &ResourceSpec::RouteTableAssociation(RouteTableAssociationArgs {
            subnet_id: subnet.id.clone(),
            route_table_id: route_table_id.to_string(),
        }),
    )?;

    Ok(subnet.id)
}

fn declare_group<E: Engine>(
    engine: &mut E,
    group: SecurityGroupArgs,
) -> Result<Registered, TopologyError> {
    let name = group.name.clone();
    Ok(engine.register(&name, &ResourceSpec::SecurityGroup(group))?)
}

/// Declare the whole public network into `engine`.
///
/// Inputs are validated first, so an invalid config never reaches the
/// engine. After that every declaration is issued in order and the first
/// engine error is returned as [`TopologyError::Registration`] without
/// any further calls.
pub fn build_topology<E: Engine>(
    engine: &mut E,
    config: &TopologyConfig,
) -> Result<TopologyOutputs, TopologyError> {
    config.validate()?;
    let layout = plan_subnets(config.vpc_cidr, &config.availability_zones)?;
    let vpc_name = config.vpc_name();
    log::info!(
        "#Start build_topology() {vpc} {cidr} zones={zones} routes={policy:?}",
        vpc = vpc_name.on_blue(),
        cidr = config.vpc_cidr,
        zones = layout.len(),
        policy = config.route_policy
    );

    let key_pair = engine.register(
        KEY_PAIR_NAME,
        &ResourceSpec::KeyPair(KeyPairArgs {
            public_key: config.public_key.trim().to_string(),
        }),
    )?;

    let vpc = engine.register(
        &vpc_name,
        &ResourceSpec::Vpc(VpcArgs {
            cidr_block: config.vpc_cidr,
        }),
    )?;
    let main_route_table_id = output_of(&vpc, &vpc_name, MAIN_ROUTE_TABLE_ID)?;

    engine.register(
        VPC_TAG_NAME,
        &ResourceSpec::Tag(TagArgs {
            resource_id: vpc.id.clone(),
            key: NAME_TAG.to_string(),
            value: vpc_name.clone(),
        }),
    )?;

    let gateway = engine.register(
        GATEWAY_NAME,
        &ResourceSpec::InternetGateway(InternetGatewayArgs {
            vpc_id: vpc.id.clone(),
        }),
    )?;

    let route_table_id = match config.route_policy {
        RoutePolicy::PerZone | RoutePolicy::Single => main_route_table_id,
        RoutePolicy::Dedicated => {
            let table = engine.register(
                DEDICATED_ROUTE_TABLE_NAME,
                &ResourceSpec::RouteTable(RouteTableArgs {
                    vpc_id: vpc.id.clone(),
                    tags: name_tags(DEDICATED_ROUTE_TABLE_NAME),
                }),
            )?;
            engine.register(SHARED_ROUTE_NAME, &default_route(&table.id, &gateway.id))?;
            table.id
        }
    };

    let mut subnet_ids = Vec::with_capacity(layout.len());
    for zone in &layout {
        let subnet_id = declare_zone(
            engine,
            zone,
            &vpc.id,
            &route_table_id,
            config.map_public_ip_on_launch,
        )?;
        // Every zone re-declares the same default route into the shared
        // main table; the engine keeps them as separate resources.
        if config.route_policy == RoutePolicy::PerZone {
            engine.register(&zone.route_name, &default_route(&route_table_id, &gateway.id))?;
        }
        log::debug!("zone {} => {} {}", zone.zone, zone.cidr, subnet_id);
        subnet_ids.push(subnet_id);
    }
    if config.route_policy == RoutePolicy::Single {
        engine.register(SHARED_ROUTE_NAME, &default_route(&route_table_id, &gateway.id))?;
    }

    let ssh = declare_group(engine, ssh_group(&vpc.id))?;
    let k0s = declare_group(engine, k0s_group(&vpc.id))?;
    let http = declare_group(engine, http_group(&vpc.id))?;

    let outputs = TopologyOutputs {
        vpc_id: vpc.id,
        key_pair_id: key_pair.id,
        gateway_id: gateway.id,
        route_table_id,
        subnet_ids,
        ssh_group_id: ssh.id,
        k0s_group_id: k0s.id,
        http_group_id: http.id,
    };

    for (name, value) in outputs.exports() {
        engine.export(name, value)?;
    }

    log::info!(
        "#End build_topology() {} subnets, {} exports",
        outputs.subnet_ids.len(),
        outputs.exports().len()
    );
    Ok(outputs)
}
