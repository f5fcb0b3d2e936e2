//! IPv4 addressing from `ip -o -4 addr show <iface>`.
//!
//! One line per address, e.g.
//! `2: eno1    inet 10.0.0.12/24 brd 10.0.0.255 scope global eno1\ ...`.
//! Only the first address of an interface becomes facts.

use crate::facts::Fact;
use std::net::Ipv4Addr;

/// Prefix length of a dotted netmask, `None` unless the set bits are
/// contiguous from the top.
pub fn netmask_to_cidr(netmask: &str) -> Option<u32> {
    let bits = u32::from(netmask.trim().parse::<Ipv4Addr>().ok()?);
    let prefix = bits.leading_ones();
    (bits.checked_shl(prefix).unwrap_or(0) == 0).then_some(prefix)
}

pub fn cidr_to_netmask(prefix: u32) -> Option<Ipv4Addr> {
    if prefix > 32 {
        return None;
    }
    Some(Ipv4Addr::from(u32::MAX.checked_shl(32 - prefix).unwrap_or(0)))
}

/// Address and prefix of the first `inet A.B.C.D/N` token pair.
pub fn first_inet(lines: &[String]) -> Option<(Ipv4Addr, u32)> {
    lines.iter().find_map(|line| {
        let mut tokens = line.split_whitespace().skip_while(|t| *t != "inet");
        let (addr, prefix) = tokens.nth(1)?.split_once('/')?;
        let prefix = prefix.parse::<u32>().ok().filter(|p| *p <= 32)?;
        Some((addr.parse().ok()?, prefix))
    })
}

/// `ipv4`, `ipv4-netmask`, `ipv4-cidr` and `ipv4-network` facts for one
/// interface. Nothing when no line carries a usable address.
pub fn parse_ip_addr(iface: &str, lines: &[String]) -> Vec<Fact> {
    let Some((addr, prefix)) = first_inet(lines) else {
        return Vec::new();
    };
    let Some(netmask) = cidr_to_netmask(prefix) else {
        return Vec::new();
    };
    let network = Ipv4Addr::from(u32::from(addr) & u32::from(netmask));

    vec![
        Fact::new("network", iface, "ipv4", addr.to_string()),
        Fact::new("network", iface, "ipv4-netmask", netmask.to_string()),
        Fact::new("network", iface, "ipv4-cidr", prefix.to_string()),
        Fact::new("network", iface, "ipv4-network", network.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn test_netmask_to_cidr() {
        assert_eq!(netmask_to_cidr("255.255.0.0"), Some(16));
        assert_eq!(netmask_to_cidr("255.255.255.192"), Some(26));
        assert_eq!(netmask_to_cidr("255.255.255.255"), Some(32));
        assert_eq!(netmask_to_cidr("0.0.0.0"), Some(0));
        // Holes in the mask
        assert_eq!(netmask_to_cidr("255.0.255.0"), None);
        assert_eq!(netmask_to_cidr("0.255.255.255"), None);
        assert_eq!(netmask_to_cidr("255.255"), None);
    }

    #[test]
    fn test_cidr_to_netmask() {
        assert_eq!(cidr_to_netmask(16), Some(Ipv4Addr::new(255, 255, 0, 0)));
        assert_eq!(cidr_to_netmask(0), Some(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(cidr_to_netmask(32), Some(Ipv4Addr::new(255, 255, 255, 255)));
        assert_eq!(cidr_to_netmask(33), None);
    }

    #[test]
    fn test_parse_ip_addr() {
        let out = lines(
            "2: eno1    inet 10.66.6.42/23 brd 10.66.7.255 scope global eno1\\       valid_lft forever preferred_lft forever\n\
             2: eno1    inet 192.168.1.5/24 scope global secondary eno1\\       valid_lft forever preferred_lft forever",
        );
        let facts = parse_ip_addr("eno1", &out);
        let tuples: Vec<_> = facts.iter().map(Fact::as_tuple).collect();
        assert_eq!(
            tuples,
            vec![
                ("network", "eno1", "ipv4", "10.66.6.42"),
                ("network", "eno1", "ipv4-netmask", "255.255.254.0"),
                ("network", "eno1", "ipv4-cidr", "23"),
                ("network", "eno1", "ipv4-network", "10.66.6.0"),
            ]
        );
    }

    #[test]
    fn test_malformed_addresses_skipped() {
        let out = lines("3: eth1    inet 10.0.0.1/40 scope global eth1\n3: eth1    inet bogus/8");
        assert!(parse_ip_addr("eth1", &out).is_empty());
        assert!(parse_ip_addr("eth1", &lines("3: eth1    inet6 fe80::1/64 scope link")).is_empty());
    }
}
