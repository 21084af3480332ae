//! Terminal output utilities.
//!
//! Prints a recorded plan as an aligned table with coloured kinds.

use crate::engine::Plan;
use crate::models::ResourceSpec;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One-line description of what a resource declares.
pub fn describe(spec: &ResourceSpec) -> String {
    match spec {
        ResourceSpec::KeyPair(k) => {
            let algo = k.public_key.split_whitespace().next().unwrap_or("?");
            format!("key={algo}")
        }
        ResourceSpec::Vpc(v) => format!(
            "cidr={} ({} - {})",
            v.cidr_block,
            v.cidr_block.lo(),
            v.cidr_block.hi()
        ),
        ResourceSpec::Tag(t) => format!("{}={} on {}", t.key, t.value, t.resource_id),
        ResourceSpec::InternetGateway(g) => format!("vpc={}", g.vpc_id),
        ResourceSpec::Subnet(s) => format!(
            "cidr={} az={} public_ip={}",
            s.cidr_block, s.availability_zone, s.map_public_ip_on_launch
        ),
        ResourceSpec::RouteTable(t) => format!("vpc={}", t.vpc_id),
        ResourceSpec::RouteTableAssociation(a) => {
            format!("{} -> {}", a.subnet_id, a.route_table_id)
        }
        ResourceSpec::Route(r) => format!(
            "{} via {} in {}",
            r.destination_cidr_block, r.gateway_id, r.route_table_id
        ),
        ResourceSpec::SecurityGroup(g) => {
            let ingress: Vec<String> = g.ingress.iter().map(|r| r.to_string()).collect();
            let egress: Vec<String> = g.egress.iter().map(|r| r.to_string()).collect();
            format!("in: {} out: {}", ingress.join(" "), egress.join(" "))
        }
    }
}

fn colour_kind(spec: &ResourceSpec) -> colored::ColoredString {
    let kind = spec.short_kind();
    match spec {
        ResourceSpec::Vpc(_) | ResourceSpec::Subnet(_) => kind.green(),
        ResourceSpec::SecurityGroup(_) => kind.yellow(),
        ResourceSpec::Route(_)
        | ResourceSpec::RouteTable(_)
        | ResourceSpec::RouteTableAssociation(_) => kind.cyan(),
        _ => kind.normal(),
    }
}

/// Print every planned resource, then the exports.
pub fn print_plan(plan: &Plan) {
    log::info!(
        "#Start print_plan() resources={} outputs={}",
        plan.resources.len(),
        plan.outputs.len()
    );

    println!(
        r#" "cnt",                   "kind",                              "name",                 "id", "detail""#
    );
    for (i, r) in plan.resources.iter().enumerate() {
        println!(
            "{cnt},{kind:>24},{name:>36},{id:>22}, {detail}",
            cnt = format_field(i, 6),
            kind = colour_kind(&r.spec),
            name = format_field(&r.name, 36),
            id = format_field(&r.id, 22),
            detail = describe(&r.spec)
        );
    }

    println!("#{}# {} outputs", "OUTPUTS".on_blue(), plan.outputs.len());
    for (name, value) in &plan.outputs {
        println!("{},{}", format_field(name, 12), format_field(value, 22));
    }
}
