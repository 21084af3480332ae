//! Integration tests for aws-public-topology
//!
//! These tests drive the full declaration pass through the in-memory engine.

use aws_public_topology::models::{Ipv4, Protocol, ResourceSpec, SecurityGroupArgs};
use aws_public_topology::{
    build_topology, plan_topology, EngineError, MemoryEngine, Plan, RoutePolicy, TopologyConfig,
    TopologyError,
};

fn config_with_zones(zones: &[&str]) -> TopologyConfig {
    TopologyConfig {
        availability_zones: zones.iter().map(|z| z.to_string()).collect(),
        ..Default::default()
    }
}

fn group<'a>(plan: &'a Plan, name: &str) -> &'a SecurityGroupArgs {
    match &plan.find(name).expect("group declared").spec {
        ResourceSpec::SecurityGroup(g) => g,
        other => panic!("{name} is not a security group: {other:?}"),
    }
}

fn ingress(plan: &Plan, name: &str) -> Vec<(Protocol, u16, u16, Vec<Ipv4>)> {
    group(plan, name)
        .ingress
        .iter()
        .map(|r| (r.protocol, r.from_port, r.to_port, r.cidr_blocks.clone()))
        .collect()
}

#[test]
fn test_end_to_end_three_zones() {
    let config = config_with_zones(&["us-east-1a", "us-east-1b", "us-east-1c"]);
    let (outputs, plan) = plan_topology(&config).expect("topology should build");

    let cidrs: Vec<String> = plan
        .of_kind("Subnet")
        .map(|r| match &r.spec {
            ResourceSpec::Subnet(s) => s.cidr_block.to_string(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(cidrs, vec!["10.90.0.0/24", "10.90.1.0/24", "10.90.2.0/24"]);
    assert_eq!(outputs.subnet_ids.len(), 3);
    assert_eq!(plan.count("RouteTableAssociation"), 3);

    // one default route per zone, all in the VPC main table
    let main_table = &outputs.route_table_id;
    let routes: Vec<_> = plan.of_kind("Route").collect();
    assert_eq!(routes.len(), 3);
    for route in routes {
        match &route.spec {
            ResourceSpec::Route(r) => {
                assert_eq!(&r.route_table_id, main_table);
                assert_eq!(r.destination_cidr_block.to_string(), "0.0.0.0/0");
                assert_eq!(r.gateway_id, outputs.gateway_id);
            }
            _ => unreachable!(),
        }
    }
    assert!(main_table.starts_with("rtb-"));
    assert_eq!(plan.count("RouteTable"), 0);
}

#[test]
fn test_exports() {
    let (outputs, plan) = plan_topology(&TopologyConfig::default()).unwrap();
    let names: Vec<&str> = plan.outputs.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["httpGroup", "igwID", "k0sGroup", "keyPair", "sshGroup", "vpcID"]
    );
    assert_eq!(plan.outputs["vpcID"], outputs.vpc_id);
    assert_eq!(plan.outputs["keyPair"], plan.find("adminaws").unwrap().id);
    assert_eq!(plan.outputs["sshGroup"], plan.find("ALL_ssh").unwrap().id);
    assert_eq!(plan.outputs["k0sGroup"], plan.find("ALL_k0s").unwrap().id);
    assert_eq!(plan.outputs["httpGroup"], plan.find("ALL_http").unwrap().id);
    assert_eq!(plan.outputs["igwID"], plan.find("igw").unwrap().id);
}

#[test]
fn test_subnet_count_and_octets() {
    for n in [1usize, 4, 32, 255, 256] {
        let zones: Vec<String> = (0..n).map(|i| format!("us-east-{}a", i + 1)).collect();
        let config = TopologyConfig {
            availability_zones: zones.clone(),
            ..Default::default()
        };
        let (outputs, plan) = plan_topology(&config).unwrap();
        assert_eq!(outputs.subnet_ids.len(), n);

        for (i, r) in plan.of_kind("Subnet").enumerate() {
            match &r.spec {
                ResourceSpec::Subnet(s) => {
                    assert_eq!(s.cidr_block.addr.octets(), [10, 90, i as u8, 0]);
                    assert_eq!(s.availability_zone, zones[i]);
                    assert_eq!(r.name, format!("public-subnet-{}", zones[i]));
                }
                _ => unreachable!(),
            }
        }
    }
}

#[test]
fn test_security_group_policy() {
    let (_, plan) = plan_topology(&TopologyConfig::default()).unwrap();
    let any = vec![Ipv4::ANY];

    assert_eq!(
        ingress(&plan, "ALL_ssh"),
        vec![(Protocol::Tcp, 22, 22, any.clone())]
    );
    assert_eq!(
        ingress(&plan, "ALL_k0s"),
        vec![
            (Protocol::Tcp, 6443, 6443, any.clone()),
            (Protocol::Tcp, 8132, 8132, any.clone()),
            (Protocol::Tcp, 9443, 9443, any.clone()),
        ]
    );
    assert_eq!(
        ingress(&plan, "ALL_http"),
        vec![
            (Protocol::Tcp, 80, 80, any.clone()),
            (Protocol::Tcp, 443, 443, any.clone()),
        ]
    );

    for name in ["ALL_ssh", "ALL_k0s", "ALL_http"] {
        let g = group(&plan, name);
        assert_eq!(g.egress.len(), 1);
        assert_eq!(g.egress[0].protocol, Protocol::All);
        assert_eq!((g.egress[0].from_port, g.egress[0].to_port), (0, 0));
        assert_eq!(g.egress[0].cidr_blocks, any);
        assert_eq!(g.vpc_id, plan.outputs["vpcID"]);
    }
}

#[test]
fn test_fault_at_every_step_stops_the_pass() {
    for policy in [RoutePolicy::PerZone, RoutePolicy::Single, RoutePolicy::Dedicated] {
        let config = TopologyConfig {
            route_policy: policy,
            ..Default::default()
        };
        let (_, full) = plan_topology(&config).unwrap();
        let names: Vec<String> = full.resources.iter().map(|r| r.name.clone()).collect();

        for (i, name) in names.iter().enumerate() {
            let mut engine = MemoryEngine::new().fail_on(name, "injected");
            let err = build_topology(&mut engine, &config).unwrap_err();

            assert_eq!(
                err,
                TopologyError::Registration(EngineError::registration(name, "injected")),
                "{policy:?}"
            );
            assert_eq!(engine.attempts(), &names[..=i], "{policy:?} calls after {name}");
            assert_eq!(engine.plan().resources.len(), i, "{policy:?}");
            assert!(engine.plan().outputs.is_empty(), "{policy:?}");
        }
    }
}

#[test]
fn test_local_zone_builds() {
    let config = config_with_zones(&["us-west-2a", "us-west-2-lax-1a"]);
    let (outputs, plan) = plan_topology(&config).expect("local zone should build");
    assert_eq!(outputs.subnet_ids.len(), 2);
    let subnet = plan.find("public-subnet-us-west-2-lax-1a").unwrap();
    match &subnet.spec {
        ResourceSpec::Subnet(s) => {
            assert_eq!(s.availability_zone, "us-west-2-lax-1a");
            assert_eq!(s.cidr_block.to_string(), "10.90.1.0/24");
        }
        other => panic!("not a subnet: {other:?}"),
    }
}

#[test]
fn test_route_policies_register_expected_routes() {
    let zones = ["us-west-2a", "us-west-2b", "us-west-2c", "us-west-2d"];
    for (policy, routes, tables) in [
        (RoutePolicy::PerZone, 4, 0),
        (RoutePolicy::Single, 1, 0),
        (RoutePolicy::Dedicated, 1, 1),
    ] {
        let config = TopologyConfig {
            route_policy: policy,
            ..config_with_zones(&zones)
        };
        let (_, plan) = plan_topology(&config).unwrap();
        assert_eq!(plan.count("Route"), routes, "{policy:?}");
        assert_eq!(plan.count("RouteTable"), tables, "{policy:?}");
        assert_eq!(plan.count("RouteTableAssociation"), 4, "{policy:?}");
    }
}

#[test]
fn test_vpc_exposes_main_route_table() {
    let (outputs, plan) = plan_topology(&TopologyConfig::default()).unwrap();
    let vpc = plan.find("vpc-dev").unwrap();
    assert_eq!(vpc.id, outputs.vpc_id);
    assert!(outputs.route_table_id.starts_with("rtb-"));
    assert_ne!(outputs.route_table_id, outputs.vpc_id);
    assert_eq!(plan.resources[0].name, "adminaws");
}

#[test]
fn test_rejects_layouts_before_declaring() {
    let too_many: Vec<String> = (0..257).map(|i| format!("us-east-{}a", i + 1)).collect();
    let config = TopologyConfig {
        availability_zones: too_many,
        ..Default::default()
    };
    let mut engine = MemoryEngine::new();
    assert_eq!(
        build_topology(&mut engine, &config),
        Err(TopologyError::TooManyZones {
            count: 257,
            max: 256
        })
    );
    assert!(engine.attempts().is_empty());

    let config = TopologyConfig {
        vpc_cidr: Ipv4::new("10.90.0.0/24").unwrap(),
        ..Default::default()
    };
    let mut engine = MemoryEngine::new();
    assert!(matches!(
        build_topology(&mut engine, &config),
        Err(TopologyError::SubnetOutsideVpc { .. })
    ));
    assert!(engine.attempts().is_empty());
}
