//! Fixed security group policy.
//!
//! The three groups are policy, not derived data: they open a handful of
//! tcp ports to the whole internet and allow every outbound packet.

use super::resource::{name_tags, Protocol, SecurityGroupArgs, SecurityGroupRule};
use super::Ipv4;

pub const SSH_GROUP_NAME: &str = "ALL_ssh";
pub const K0S_GROUP_NAME: &str = "ALL_k0s";
pub const HTTP_GROUP_NAME: &str = "ALL_http";

pub const SSH_PORTS: [u16; 1] = [22];
/// k0s API server, konnectivity and controller join ports.
pub const K0S_PORTS: [u16; 3] = [6443, 8132, 9443];
pub const HTTP_PORTS: [u16; 2] = [80, 443];

/// Single-port tcp ingress from anywhere.
pub fn tcp_from_anywhere(port: u16) -> SecurityGroupRule {
    SecurityGroupRule {
        protocol: Protocol::Tcp,
        from_port: port,
        to_port: port,
        cidr_blocks: vec![Ipv4::ANY],
    }
}

/// All protocols, all ports, to anywhere.
pub fn allow_all_egress() -> SecurityGroupRule {
    SecurityGroupRule {
        protocol: Protocol::All,
        from_port: 0,
        to_port: 0,
        cidr_blocks: vec![Ipv4::ANY],
    }
}

fn open_group(vpc_id: &str, name: &str, ports: &[u16]) -> SecurityGroupArgs {
    SecurityGroupArgs {
        vpc_id: vpc_id.to_string(),
        name: name.to_string(),
        ingress: ports.iter().map(|p| tcp_from_anywhere(*p)).collect(),
        egress: vec![allow_all_egress()],
        tags: name_tags(name),
    }
}

pub fn ssh_group(vpc_id: &str) -> SecurityGroupArgs {
    open_group(vpc_id, SSH_GROUP_NAME, &SSH_PORTS)
}

pub fn k0s_group(vpc_id: &str) -> SecurityGroupArgs {
    open_group(vpc_id, K0S_GROUP_NAME, &K0S_PORTS)
}

pub fn http_group(vpc_id: &str) -> SecurityGroupArgs {
    open_group(vpc_id, HTTP_GROUP_NAME, &HTTP_PORTS)
}
