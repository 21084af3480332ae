//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing VPC and subnet blocks,
//! along with the mask arithmetic used to derive and check subnets.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use aws_public_topology::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let bits = u32::from(addr) as u64;
        let new_bits = (bits >> right_len) << right_len;

        Ok(Ipv4Addr::from(new_bits as u32))
    }
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let mask = get_cidr_mask(len)?;
        let addr_bits = u32::from(addr);
        let network_bits = addr_bits & mask;
        let broadcast_bits = network_bits | (!mask);
        Ok(Ipv4Addr::from(broadcast_bits))
    }
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.mask);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR '{s}': {e}")))
    }
}

impl FromStr for Ipv4 {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4::new(s)
    }
}

impl Ipv4 {
    /// Everything, `0.0.0.0/0`. Used for default routes and open rules.
    pub const ANY: Ipv4 = Ipv4 {
        addr: Ipv4Addr::UNSPECIFIED,
        mask: 0,
    };

    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err("Invalid address/mask".into());
        }
        let addr: Ipv4Addr = parts[0]
            .parse()
            .map_err(|_| format!("Invalid address {}", parts[0]))?;
        let mask: u8 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid subnet mask {}", parts[1]))?;
        if mask > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask)
            .unwrap_or_else(|e| panic!("Error calculating broadcast address: {}", e))
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        cut_addr(self.addr, self.mask)
            .unwrap_or_else(|e| panic!("Error calculating minimum address for {}: {}", self, e))
    }

    /// True when `other` lies completely inside this block.
    pub fn contains(&self, other: &Ipv4) -> bool {
        if other.mask < self.mask {
            return false;
        }
        match (
            cut_addr(self.addr, self.mask),
            cut_addr(other.addr, self.mask),
        ) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_cut_addr() {
        let ip = Ipv4Addr::new(10, 90, 1, 42);
        assert_eq!(cut_addr(ip, 24).unwrap(), Ipv4Addr::new(10, 90, 1, 0));
        assert_eq!(cut_addr(ip, 16).unwrap(), Ipv4Addr::new(10, 90, 0, 0));
        assert_eq!(cut_addr(ip, 32).unwrap(), Ipv4Addr::new(10, 90, 1, 42));
        assert!(cut_addr(ip, 33).is_err());
    }

    #[test]
    fn test_broadcast_addr() {
        let ip = Ipv4Addr::new(10, 90, 0, 0);
        assert_eq!(
            broadcast_addr(ip, 16).unwrap(),
            Ipv4Addr::new(10, 90, 255, 255)
        );
        assert_eq!(
            broadcast_addr(ip, 24).unwrap(),
            Ipv4Addr::new(10, 90, 0, 255)
        );
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(Ipv4::new("10.90.0.0").is_err());
        assert!(Ipv4::new("10.90.0/16").is_err());
        assert!(Ipv4::new("10.90.0.0/33").is_err());
        assert!(Ipv4::new("10.90.0.0/x").is_err());
        assert_eq!(
            Ipv4::new(" 10.90.0.0/16 ").unwrap(),
            Ipv4 {
                addr: Ipv4Addr::new(10, 90, 0, 0),
                mask: 16
            }
        );
    }

    #[test]
    fn test_contains() {
        let vpc = Ipv4::new("10.90.0.0/16").unwrap();
        assert!(vpc.contains(&Ipv4::new("10.90.0.0/24").unwrap()));
        assert!(vpc.contains(&Ipv4::new("10.90.255.0/24").unwrap()));
        assert!(!vpc.contains(&Ipv4::new("10.91.0.0/24").unwrap()));
        assert!(!vpc.contains(&Ipv4::new("10.0.0.0/8").unwrap()));

        let small = Ipv4::new("10.90.0.0/20").unwrap();
        assert!(small.contains(&Ipv4::new("10.90.15.0/24").unwrap()));
        assert!(!small.contains(&Ipv4::new("10.90.16.0/24").unwrap()));

        assert!(Ipv4::ANY.contains(&vpc));
    }

    #[test]
    fn test_serde_as_string() {
        let ip = Ipv4::new("10.90.2.0/24").unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"10.90.2.0/24\"");
        let back: Ipv4 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Ipv4>("\"10.90.2.0/40\"").is_err());
    }

    #[test]
    fn test_lo_hi() {
        let ip = Ipv4::new("10.90.1.17/24").unwrap();
        assert_eq!(ip.lo(), Ipv4Addr::new(10, 90, 1, 0));
        assert_eq!(ip.hi(), Ipv4Addr::new(10, 90, 1, 255));
        assert_eq!(Ipv4::ANY.to_string(), "0.0.0.0/0");
    }
}
