//! Topology inputs.
//!
//! Built-in defaults describe the dev stack. A JSON file and `TOPOLOGY_*`
//! environment variables (also read from `.env`) override them, in that
//! order.

use crate::error::TopologyError;
use crate::models::Ipv4;
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_ZONES: [&str; 3] = ["us-east-1a", "us-east-1b", "us-east-1c"];
pub const DEFAULT_PUBLIC_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAINWO9EKfPEQCbFV9VGl/GCp1cRfEugz/Yr36ch6yKd4p admin";
pub const DEFAULT_TIMEZONE: &str = "UTC";

pub const ENV_ENVIRONMENT: &str = "TOPOLOGY_ENVIRONMENT";
pub const ENV_VPC_CIDR: &str = "TOPOLOGY_VPC_CIDR";
pub const ENV_ZONES: &str = "TOPOLOGY_ZONES";
pub const ENV_PUBLIC_KEY: &str = "TOPOLOGY_PUBLIC_KEY";
pub const ENV_ROUTE_POLICY: &str = "TOPOLOGY_ROUTE_POLICY";
pub const ENV_MAP_PUBLIC_IP: &str = "TOPOLOGY_MAP_PUBLIC_IP";
pub const ENV_TIMEZONE: &str = "TOPOLOGY_TZ";

static ZONE_REGEX: OnceLock<Regex> = OnceLock::new();
static PUBLIC_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

fn zone_regex() -> &'static Regex {
    ZONE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid Regex")
    })
}

fn public_key_regex() -> &'static Regex {
    PUBLIC_KEY_REGEX.get_or_init(|| {
        Regex::new(
            r"^(ssh-ed25519|ssh-rsa|ecdsa-sha2-nistp(256|384|521)) [A-Za-z0-9+/]+={0,3}( \S.*)?$",
        )
        .expect("Invalid Regex")
    })
}

/// How the default internet route is wired into routing tables.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutePolicy {
    /// One `internet-route-<zone>` per zone, all into the VPC main table.
    #[default]
    PerZone,
    /// A single `internet-route` into the VPC main table.
    Single,
    /// A dedicated `public-routes` table that every subnet joins.
    Dedicated,
}

impl FromStr for RoutePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_zone" => Ok(RoutePolicy::PerZone),
            "single" => Ok(RoutePolicy::Single),
            "dedicated" => Ok(RoutePolicy::Dedicated),
            other => Err(format!("Unknown route policy '{other}'")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TopologyConfig {
    /// Suffix of the VPC name, `vpc-<environment>`.
    pub environment: String,
    pub vpc_cidr: Ipv4,
    /// Ordered; position is the subnet's third octet.
    pub availability_zones: Vec<String>,
    pub public_key: String,
    pub route_policy: RoutePolicy,
    pub map_public_ip_on_launch: bool,
    /// Time zone used to date the plan file.
    pub timezone: String,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        TopologyConfig {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            vpc_cidr: Ipv4 {
                addr: Ipv4Addr::new(10, 90, 0, 0),
                mask: 16,
            },
            availability_zones: DEFAULT_ZONES.iter().map(|z| z.to_string()).collect(),
            public_key: DEFAULT_PUBLIC_KEY.to_string(),
            route_policy: RoutePolicy::default(),
            map_public_ip_on_launch: false,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl TopologyConfig {
    pub fn vpc_name(&self) -> String {
        format!("vpc-{}", self.environment)
    }

    /// Check inputs that can be checked without an engine.
    ///
    /// Zone names are opaque to the builder; only their character set is
    /// checked, so Local and Wavelength Zones pass.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let environment = self.environment.trim();
        if environment.is_empty() || environment.contains(char::is_whitespace) {
            return Err(TopologyError::InvalidEnvironment(self.environment.clone()));
        }
        if self.timezone.parse::<Tz>().is_err() {
            return Err(TopologyError::InvalidTimezone(self.timezone.clone()));
        }
        if self.availability_zones.is_empty() {
            return Err(TopologyError::NoZones);
        }
        if let Some(zone) = self
            .availability_zones
            .iter()
            .find(|z| !zone_regex().is_match(z))
        {
            return Err(TopologyError::InvalidZone(zone.clone()));
        }
        if !public_key_regex().is_match(self.public_key.trim()) {
            return Err(TopologyError::InvalidPublicKey);
        }
        Ok(())
    }

    /// Apply `TOPOLOGY_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.environment = env.trim().to_string();
        }
        if let Some(cidr) = lookup(ENV_VPC_CIDR) {
            self.vpc_cidr =
                Ipv4::new(&cidr).map_err(|e| format!("{ENV_VPC_CIDR}='{cidr}': {e}"))?;
        }
        if let Some(zones) = lookup(ENV_ZONES) {
            self.availability_zones = zones
                .split(',')
                .map(|z| z.trim())
                .filter(|z| !z.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(key) = lookup(ENV_PUBLIC_KEY) {
            self.public_key = key.trim().to_string();
        }
        if let Some(policy) = lookup(ENV_ROUTE_POLICY) {
            self.route_policy = policy.parse()?;
        }
        if let Some(flag) = lookup(ENV_MAP_PUBLIC_IP) {
            self.map_public_ip_on_launch = flag
                .trim()
                .parse()
                .map_err(|_| format!("{ENV_MAP_PUBLIC_IP}='{flag}' is not true/false"))?;
        }
        if let Some(tz) = lookup(ENV_TIMEZONE) {
            self.timezone = tz.trim().to_string();
        }
        Ok(())
    }
}

/// Parse a JSON config file, reporting the failing field path.
pub fn read_config_file(config_file: &str) -> Result<TopologyConfig, Box<dyn Error>> {
    if !Path::new(config_file).exists() {
        return Err(format!("Config file does not exist: {config_file}").into());
    }
    log::info!("Using config file: {config_file}");
    let json = std::fs::read_to_string(config_file)?;
    parse_config(&json).map_err(|e| format!("{config_file}: {e}").into())
}

pub fn parse_config(json: &str) -> Result<TopologyConfig, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let config: TopologyConfig = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing config: path={} error={e}", e.path()))?;
    Ok(config)
}

/// Defaults, then the optional file, then the process environment.
pub fn load_config(config_file: Option<&str>) -> Result<TopologyConfig, Box<dyn Error>> {
    let mut config = match config_file {
        Some(file) => read_config_file(file)?,
        None => TopologyConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    log::debug!("config={:?}", config);
    Ok(config)
}
