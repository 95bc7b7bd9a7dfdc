//! # Address Factory
//!
//! Turns a range, a subnet or a network adapter into the ordered list of
//! IPv4 addresses a scan will probe.
//!
//! Everything here is pure arithmetic, apart from reading adapter metadata
//! in [`from_interface`] and [`from_all_interfaces`].

use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

use crate::error::ScanError;
use crate::utils::interface::NetworkInterfaceExtension;

/// Highest fourth octet walked for the intermediate third octets of a range.
const LAST_HOST_OCTET: u8 = 254;

/// Inclusive walk over the fourth octet within one third-octet block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OctetSpan {
    prefix: [u8; 3],
    first: u8,
    last: u8,
}

impl OctetSpan {
    fn addresses(self) -> impl Iterator<Item = Ipv4Addr> {
        let [a, b, c] = self.prefix;
        (self.first..=self.last).map(move |d| Ipv4Addr::new(a, b, c, d))
    }
}

/// Enumerates `begin..=end`.
///
/// Both ends must share their first two octets. When the third octets match
/// the fourth octet is walked from `begin` to `end`. Otherwise every third
/// octet in between is walked over `0..=254`, with the boundary blocks
/// starting at `begin` and ending at `end`.
pub fn from_range(begin: Ipv4Addr, end: Ipv4Addr) -> Result<Vec<Ipv4Addr>, ScanError> {
    let [b1, b2, b3, b4] = begin.octets();
    let [e1, e2, e3, e4] = end.octets();
    let invalid = || ScanError::InvalidIpRange { begin, end };

    if b1 != e1 || b2 != e2 || b3 > e3 {
        return Err(invalid());
    }

    if b3 == e3 {
        if b4 > e4 {
            return Err(invalid());
        }
        let span = OctetSpan { prefix: [b1, b2, b3], first: b4, last: e4 };
        return Ok(span.addresses().collect());
    }

    let spans = (b3..=e3).map(|third| {
        let (first, last) = match third {
            t if t == b3 => (b4, LAST_HOST_OCTET.max(b4)),
            t if t == e3 => (0, e4),
            _ => (0, LAST_HOST_OCTET),
        };
        OctetSpan { prefix: [b1, b2, third], first, last }
    });

    Ok(spans.flat_map(OctetSpan::addresses).collect())
}

/// Enumerates every host of the subnet `ip`/`mask`, skipping the network and
/// broadcast addresses.
///
/// Only masks of /16 or narrower with at least two host bits are accepted.
pub fn from_subnet(ip: Ipv4Addr, mask: Ipv4Addr) -> Result<Vec<Ipv4Addr>, ScanError> {
    let invalid = || ScanError::InvalidSubnet { ip, mask };

    if ip.is_unspecified() || ip.is_loopback() || ip.is_broadcast() {
        return Err(invalid());
    }
    let [m1, m2, ..] = mask.octets();
    if m1 != u8::MAX || m2 != u8::MAX {
        return Err(invalid());
    }

    let host_bits = 32 - mask_bit_count(mask);
    if host_bits < 2 {
        return Err(invalid());
    }

    let network = u32::from(ip) & u32::from(mask);
    let host_count = (1u32 << host_bits) - 2;
    debug!(%ip, %mask, host_count, "expanding subnet");

    Ok((1..=host_count)
        .map(|offset| Ipv4Addr::from(network + offset))
        .collect())
}

/// Enumerates the subnet of the adapter's first IPv4 address.
pub fn from_interface(interface: &NetworkInterface) -> Result<Vec<Ipv4Addr>, ScanError> {
    if !interface.is_up() {
        return Err(ScanError::InvalidNetworkAdapter(interface.name.clone()));
    }
    let net = interface
        .first_ipv4_net()
        .ok_or_else(|| ScanError::InvalidNetworkAdapter(interface.name.clone()))?;

    from_subnet(net.ip(), net.mask())
}

/// An IPv4 address bound to a local adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub name: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

/// Lists the IPv4 addresses of every adapter that is up, loopback and
/// tunnels included. Meant for picking an adapter, not for scanning.
pub fn from_all_interfaces() -> Vec<InterfaceAddress> {
    interface_addresses(&datalink::interfaces())
}

fn interface_addresses(interfaces: &[NetworkInterface]) -> Vec<InterfaceAddress> {
    interfaces
        .iter()
        .filter(|interface| interface.is_up())
        .flat_map(|interface| {
            interface.ips.iter().filter_map(move |net| match net {
                IpNetwork::V4(v4) => Some(InterfaceAddress {
                    name: interface.name.clone(),
                    address: v4.ip(),
                    netmask: v4.mask(),
                }),
                IpNetwork::V6(_) => None,
            })
        })
        .collect()
}

/// Number of set bits in `mask`.
pub fn mask_bit_count(mask: Ipv4Addr) -> u32 {
    u32::from(mask).count_ones()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::ipnetwork::{Ipv4Network, Ipv6Network};

    const IFF_UP: u32 = 1;
    const IFF_LOOPBACK: u32 = 1 << 3;

    fn create_mock_interface(name: &str, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac: None,
            ips,
            flags,
        }
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> IpNetwork {
        IpNetwork::V4(Ipv4Network::new(Ipv4Addr::new(a, b, c, d), prefix).unwrap())
    }

    #[test]
    fn range_within_one_block() {
        let begin = Ipv4Addr::new(192, 168, 1, 10);
        let end = Ipv4Addr::new(192, 168, 1, 20);
        let ips = from_range(begin, end).unwrap();

        assert_eq!(ips.first(), Some(&begin));
        assert_eq!(ips.last(), Some(&end));
        assert_eq!(ips.len(), 11);
    }

    #[test]
    fn range_count_matches_fourth_octet_span() {
        for (first, last) in [(0u8, 0u8), (1, 5), (0, 255), (100, 101)] {
            let begin = Ipv4Addr::new(10, 0, 0, first);
            let end = Ipv4Addr::new(10, 0, 0, last);
            let ips = from_range(begin, end).unwrap();
            assert_eq!(ips.len(), usize::from(last - first) + 1);
            assert_eq!(ips[0], begin);
            assert_eq!(*ips.last().unwrap(), end);
        }
    }

    #[test]
    fn range_across_third_octets() {
        let begin = Ipv4Addr::new(10, 1, 1, 250);
        let end = Ipv4Addr::new(10, 1, 3, 2);
        let ips = from_range(begin, end).unwrap();

        // 250..=254, 0..=254, 0..=2
        assert_eq!(ips.len(), 5 + 255 + 3);
        assert_eq!(ips[0], begin);
        assert_eq!(ips[4], Ipv4Addr::new(10, 1, 1, 254));
        assert_eq!(ips[5], Ipv4Addr::new(10, 1, 2, 0));
        assert_eq!(*ips.last().unwrap(), end);
        assert!(!ips.contains(&Ipv4Addr::new(10, 1, 2, 255)));
    }

    #[test]
    fn range_rejects_mismatched_first_octets() {
        let pairs = [
            (Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(11, 0, 0, 1)),
            (Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 1, 0, 1)),
            (Ipv4Addr::new(192, 168, 0, 1), Ipv4Addr::new(172, 16, 0, 1)),
        ];
        for (begin, end) in pairs {
            assert_eq!(
                from_range(begin, end),
                Err(ScanError::InvalidIpRange { begin, end })
            );
        }
    }

    #[test]
    fn range_rejects_inverted_ends() {
        let begin = Ipv4Addr::new(10, 0, 2, 1);
        let end = Ipv4Addr::new(10, 0, 1, 1);
        assert!(from_range(begin, end).is_err());

        let begin = Ipv4Addr::new(10, 0, 0, 9);
        let end = Ipv4Addr::new(10, 0, 0, 1);
        assert!(from_range(begin, end).is_err());
    }

    #[test]
    fn subnet_slash_24() {
        let ips = from_subnet(Ipv4Addr::new(192, 168, 1, 10), Ipv4Addr::new(255, 255, 255, 0)).unwrap();
        assert_eq!(ips.len(), 254);
        assert_eq!(ips[0], Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(*ips.last().unwrap(), Ipv4Addr::new(192, 168, 1, 254));
    }

    #[test]
    fn subnet_carries_into_third_octet() {
        let ips = from_subnet(Ipv4Addr::new(10, 0, 5, 7), Ipv4Addr::new(255, 255, 254, 0)).unwrap();
        assert_eq!(ips.len(), 510);
        assert_eq!(ips[0], Ipv4Addr::new(10, 0, 4, 1));
        assert_eq!(ips[255], Ipv4Addr::new(10, 0, 5, 0));
        assert_eq!(*ips.last().unwrap(), Ipv4Addr::new(10, 0, 5, 254));
    }

    #[test]
    fn subnet_slash_16() {
        let ips = from_subnet(Ipv4Addr::new(172, 16, 4, 4), Ipv4Addr::new(255, 255, 0, 0)).unwrap();
        assert_eq!(ips.len(), 65_534);
        assert_eq!(ips[0], Ipv4Addr::new(172, 16, 0, 1));
        assert_eq!(*ips.last().unwrap(), Ipv4Addr::new(172, 16, 255, 254));
    }

    #[test]
    fn subnet_rejects_special_addresses() {
        let mask = Ipv4Addr::new(255, 255, 255, 0);
        for ip in [Ipv4Addr::UNSPECIFIED, Ipv4Addr::LOCALHOST, Ipv4Addr::BROADCAST] {
            assert_eq!(from_subnet(ip, mask), Err(ScanError::InvalidSubnet { ip, mask }));
        }
    }

    #[test]
    fn subnet_rejects_wide_and_tiny_masks() {
        let ip = Ipv4Addr::new(10, 0, 0, 1);
        for mask in [
            Ipv4Addr::new(255, 0, 0, 0),
            Ipv4Addr::new(255, 254, 0, 0),
            Ipv4Addr::new(0, 255, 255, 0),
            Ipv4Addr::new(255, 255, 255, 254),
            Ipv4Addr::new(255, 255, 255, 255),
        ] {
            assert!(from_subnet(ip, mask).is_err(), "mask {mask} should be rejected");
        }
    }

    #[test]
    fn mask_bits() {
        assert_eq!(mask_bit_count(Ipv4Addr::new(255, 255, 255, 0)), 24);
        assert_eq!(mask_bit_count(Ipv4Addr::new(255, 255, 0, 0)), 16);
        assert_eq!(mask_bit_count(Ipv4Addr::new(255, 255, 255, 252)), 30);
        assert_eq!(mask_bit_count(Ipv4Addr::UNSPECIFIED), 0);
    }

    #[test]
    fn interface_must_be_up() {
        let iface = create_mock_interface("eth0", vec![v4(192, 168, 1, 5, 24)], 0);
        assert_eq!(
            from_interface(&iface),
            Err(ScanError::InvalidNetworkAdapter("eth0".into()))
        );
    }

    #[test]
    fn interface_without_ipv4_is_rejected() {
        let v6 = IpNetwork::V6(Ipv6Network::new("fe80::1".parse().unwrap(), 64).unwrap());
        let iface = create_mock_interface("eth0", vec![v6], IFF_UP);
        assert!(from_interface(&iface).is_err());
    }

    #[test]
    fn interface_uses_first_ipv4_subnet() {
        let iface = create_mock_interface(
            "eth0",
            vec![v4(192, 168, 7, 20, 24), v4(10, 0, 0, 1, 16)],
            IFF_UP,
        );
        let ips = from_interface(&iface).unwrap();
        assert_eq!(ips.len(), 254);
        assert_eq!(ips[0], Ipv4Addr::new(192, 168, 7, 1));
    }

    #[test]
    fn interface_listing_includes_loopback_but_skips_down() {
        let interfaces = vec![
            create_mock_interface("lo", vec![v4(127, 0, 0, 1, 8)], IFF_UP | IFF_LOOPBACK),
            create_mock_interface("eth0", vec![v4(192, 168, 1, 5, 24)], IFF_UP),
            create_mock_interface("eth1", vec![v4(10, 9, 9, 9, 24)], 0),
        ];
        let listed = interface_addresses(&interfaces);

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "lo");
        assert_eq!(listed[1].address, Ipv4Addr::new(192, 168, 1, 5));
        assert_eq!(listed[1].netmask, Ipv4Addr::new(255, 255, 255, 0));
    }
}
