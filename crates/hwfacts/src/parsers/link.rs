//! Link-layer status parsers: `ethtool -a` pause parameters and
//! `lldptool -t -n -i <iface>` neighbor TLVs.

use super::atoms::{attribute_name, split_key_value};
use crate::facts::Fact;

/// `Autonegotiate: on` -> `("network", iface, "ethtool/autonegotiate", "on")`.
/// The `Pause parameters for eth0:` banner has no value and is skipped.
pub fn parse_ethtool<S: AsRef<str>>(interface: &str, lines: &[S]) -> Vec<Fact> {
    lines
        .iter()
        .filter_map(|line| split_key_value("ethtool", line.as_ref()).ok())
        .map(|(key, value)| {
            Fact::new(
                "network",
                interface,
                format!("ethtool/{}", attribute_name(key)),
                value,
            )
        })
        .collect()
}

/// LLDP neighbor TLVs.
///
/// lldptool prints a TLV name flush left and its values indented below:
///
/// ```text
/// Chassis ID TLV
///         MAC: 00:01:30:f9:ad:a0
/// Port ID TLV
///         Ifname: 1/1
/// ```
///
/// Each indented line becomes one `("lldp", iface, tlv, value)` fact.
/// Values before the first TLV header have nothing to hang on and are dropped.
pub fn parse_lldp<S: AsRef<str>>(interface: &str, lines: &[S]) -> Vec<Fact> {
    let mut facts = Vec::new();
    let mut tlv: Option<&str> = None;

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(name) = tlv {
                facts.push(Fact::new("lldp", interface, name, line.trim()));
            }
        } else {
            tlv = Some(line.trim());
        }
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ethtool_pause() {
        let lines = [
            "Pause parameters for eth0:",
            "Autonegotiate:\ton",
            "RX:\t\ton",
            "TX:\t\toff",
            "RX negotiated: on",
        ];
        let facts = parse_ethtool("eth0", &lines);
        let tuples: Vec<_> = facts.iter().map(Fact::as_tuple).collect();
        assert_eq!(
            tuples,
            vec![
                ("network", "eth0", "ethtool/autonegotiate", "on"),
                ("network", "eth0", "ethtool/rx", "on"),
                ("network", "eth0", "ethtool/tx", "off"),
                ("network", "eth0", "ethtool/rx_negotiated", "on"),
            ]
        );
    }

    #[test]
    fn test_parse_lldp_tlvs() {
        let lines = [
            "Chassis ID TLV",
            "\tMAC: 00:01:30:f9:ad:a0",
            "Port ID TLV",
            "\tIfname: 1/1",
            "Time to Live TLV",
            "\t120",
            "System Capabilities TLV",
            "\tSystem capabilities:  Bridge",
            "\tEnabled capabilities: Bridge",
            "",
            "End of LLDPDU TLV",
        ];
        let facts = parse_lldp("eth0", &lines);
        assert_eq!(facts.len(), 5);
        assert_eq!(
            facts[0].as_tuple(),
            ("lldp", "eth0", "Chassis ID TLV", "MAC: 00:01:30:f9:ad:a0")
        );
        assert_eq!(facts[2].as_tuple(), ("lldp", "eth0", "Time to Live TLV", "120"));
        assert_eq!(facts[4].value, "Enabled capabilities: Bridge");
    }

    #[test]
    fn test_parse_lldp_orphan_values() {
        assert!(parse_lldp("eth1", &["   stray value"]).is_empty());
    }
}
