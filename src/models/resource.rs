//! Declarative AWS EC2 resource specifications.
//!
//! Each variant of [`ResourceSpec`] is the argument bundle handed to the
//! reconciliation engine for one named resource.

use super::Ipv4;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag key AWS uses for the console display name.
pub const NAME_TAG: &str = "Name";

/// Build a tag map holding only the `Name` tag.
pub fn name_tags(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(NAME_TAG.to_string(), name.to_string())])
}

/// Imported SSH public key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KeyPairArgs {
    pub public_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VpcArgs {
    pub cidr_block: Ipv4,
}

/// Stand-alone tag attached to an existing resource id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TagArgs {
    pub resource_id: String,
    pub key: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternetGatewayArgs {
    pub vpc_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubnetArgs {
    pub vpc_id: String,
    pub cidr_block: Ipv4,
    pub availability_zone: String,
    pub map_public_ip_on_launch: bool,
    pub tags: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteTableArgs {
    pub vpc_id: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteTableAssociationArgs {
    pub subnet_id: String,
    pub route_table_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteArgs {
    pub route_table_id: String,
    pub destination_cidr_block: Ipv4,
    pub gateway_id: String,
}

/// Rule protocol. AWS spells "every protocol" as `-1`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[serde(rename = "tcp")]
    Tcp,
    #[serde(rename = "udp")]
    Udp,
    #[serde(rename = "-1")]
    All,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::All => write!(f, "-1"),
        }
    }
}

/// One ingress or egress entry of a security group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SecurityGroupRule {
    pub protocol: Protocol,
    pub from_port: u16,
    pub to_port: u16,
    pub cidr_blocks: Vec<Ipv4>,
}

impl fmt::Display for SecurityGroupRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cidrs: Vec<String> = self.cidr_blocks.iter().map(|c| c.to_string()).collect();
        if self.from_port == self.to_port {
            write!(f, "{}/{} [{}]", self.protocol, self.from_port, cidrs.join(", "))
        } else {
            write!(
                f,
                "{}/{}-{} [{}]",
                self.protocol,
                self.from_port,
                self.to_port,
                cidrs.join(", ")
            )
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SecurityGroupArgs {
    pub vpc_id: String,
    pub name: String,
    pub ingress: Vec<SecurityGroupRule>,
    pub egress: Vec<SecurityGroupRule>,
    pub tags: BTreeMap<String, String>,
}

/// Every resource kind the topology declares.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    KeyPair(KeyPairArgs),
    Vpc(VpcArgs),
    Tag(TagArgs),
    InternetGateway(InternetGatewayArgs),
    Subnet(SubnetArgs),
    RouteTable(RouteTableArgs),
    RouteTableAssociation(RouteTableAssociationArgs),
    Route(RouteArgs),
    SecurityGroup(SecurityGroupArgs),
}

impl ResourceSpec {
    /// Provider type token, as it appears in engine state.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceSpec::KeyPair(_) => "aws:ec2/keyPair:KeyPair",
            ResourceSpec::Vpc(_) => "aws:ec2/vpc:Vpc",
            ResourceSpec::Tag(_) => "aws:ec2/tag:Tag",
            ResourceSpec::InternetGateway(_) => "aws:ec2/internetGateway:InternetGateway",
            ResourceSpec::Subnet(_) => "aws:ec2/subnet:Subnet",
            ResourceSpec::RouteTable(_) => "aws:ec2/routeTable:RouteTable",
            ResourceSpec::RouteTableAssociation(_) => {
                "aws:ec2/routeTableAssociation:RouteTableAssociation"
            }
            ResourceSpec::Route(_) => "aws:ec2/route:Route",
            ResourceSpec::SecurityGroup(_) => "aws:ec2/securityGroup:SecurityGroup",
        }
    }

    /// Prefix AWS puts in front of ids of this kind (`vpc-0abc...`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ResourceSpec::KeyPair(_) => "key",
            ResourceSpec::Vpc(_) => "vpc",
            ResourceSpec::Tag(_) => "tag",
            ResourceSpec::InternetGateway(_) => "igw",
            ResourceSpec::Subnet(_) => "subnet",
            ResourceSpec::RouteTable(_) => "rtb",
            ResourceSpec::RouteTableAssociation(_) => "rtbassoc",
            ResourceSpec::Route(_) => "r",
            ResourceSpec::SecurityGroup(_) => "sg",
        }
    }

    /// Short label for terminal output.
    pub fn short_kind(&self) -> &'static str {
        match self {
            ResourceSpec::KeyPair(_) => "KeyPair",
            ResourceSpec::Vpc(_) => "Vpc",
            ResourceSpec::Tag(_) => "Tag",
            ResourceSpec::InternetGateway(_) => "InternetGateway",
            ResourceSpec::Subnet(_) => "Subnet",
            ResourceSpec::RouteTable(_) => "RouteTable",
            ResourceSpec::RouteTableAssociation(_) => "RouteTableAssociation",
            ResourceSpec::Route(_) => "Route",
            ResourceSpec::SecurityGroup(_) => "SecurityGroup",
        }
    }
}
