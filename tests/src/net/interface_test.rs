use std::net::Ipv4Addr;

use netsweep_common::ScanError;
use netsweep_common::network::interface::{ViabilityError, is_viable_lan_interface};
use netsweep_common::network::range;
use pnet::datalink::{MacAddr, NetworkInterface};

use super::fixtures::{ni, v4, v6};

/*************************************************************
                    Tests for LAN viability
**************************************************************/

#[test]
fn lan_adapters_are_viable() {
    for interface in [enp9s0(), wlan0(), eth1(), docker0(), br0()] {
        assert_eq!(is_viable_lan_interface(&interface), Ok(()), "{}", interface.name);
    }
}

#[test]
fn non_lan_adapters_are_rejected() {
    assert_eq!(is_viable_lan_interface(&lo()), Err(ViabilityError::IsLoopback));
    assert_eq!(is_viable_lan_interface(&tun0()), Err(ViabilityError::NoMacAddress));
    assert_eq!(is_viable_lan_interface(&veth1234()), Err(ViabilityError::NoValidLanIp));
    assert_eq!(
        is_viable_lan_interface(&ipv6leakintrf0()),
        Err(ViabilityError::NoValidLanIp)
    );
}

#[test]
fn viable_adapters_among_a_mixed_host() {
    let viable: Vec<String> = iface_all()
        .into_iter()
        .filter(|interface| is_viable_lan_interface(interface).is_ok())
        .map(|interface| interface.name)
        .collect();
    assert_eq!(viable, vec!["enp9s0", "wlan0", "eth1", "docker0", "br0"]);
}

/*************************************************************
                 Tests for adapter enumeration
**************************************************************/

#[test]
fn adapter_subnet_is_enumerated() {
    let addresses = range::from_interface(&enp9s0()).unwrap();
    assert_eq!(addresses.len(), 254);
    assert_eq!(addresses.first(), Some(&Ipv4Addr::new(192, 168, 0, 1)));
    assert_eq!(addresses.last(), Some(&Ipv4Addr::new(192, 168, 0, 254)));
}

#[test]
fn sixteen_bit_adapter_subnet_spans_every_third_octet() {
    let addresses = range::from_interface(&docker0()).unwrap();
    assert_eq!(addresses.len(), 65_534);
    assert_eq!(addresses[0], Ipv4Addr::new(172, 17, 0, 1));
    assert_eq!(addresses[255], Ipv4Addr::new(172, 17, 1, 0));
    assert_eq!(addresses.last(), Some(&Ipv4Addr::new(172, 17, 255, 254)));
}

#[test]
fn adapter_without_ipv4_is_rejected() {
    assert_eq!(
        range::from_interface(&veth1234()),
        Err(ScanError::InvalidNetworkAdapter("veth1234".into()))
    );
}

#[test]
fn loopback_adapter_is_not_a_subnet() {
    assert!(matches!(
        range::from_interface(&lo()),
        Err(ScanError::InvalidSubnet { .. })
    ));
}

#[test]
fn down_adapter_is_rejected() {
    let mut down = eth1();
    down.flags &= !1;
    assert_eq!(
        range::from_interface(&down),
        Err(ScanError::InvalidNetworkAdapter("eth1".into()))
    );
}

/*************************************************************
                  Mock interfaces for testing
**************************************************************/

fn iface_all() -> Vec<NetworkInterface> {
    vec![lo(),
         enp9s0(),
         tun0(),
         ipv6leakintrf0(),
         wlan0(),
         eth1(),
         docker0(),
         veth1234(),
         br0()
    ]
}

fn lo() -> NetworkInterface {
    ni(
        "lo",
        1,
        Some(MacAddr::new(0, 0, 0, 0, 0, 0)),
        &[v4(127, 0, 0, 1, 8), v6("::1", 128)],
        65609,
    )
}

fn enp9s0() -> NetworkInterface {
    ni(
        "enp9s0",
        2,
        Some(MacAddr::new(0xa8, 0xa1, 0x59, 0x13, 0x41, 0x46)),
        &[
            v4(192, 168, 0, 32, 24),
            v6("2a02:908:8c1:b880::b054", 128),
            v6("2a02:908:8c1:b880:97f7:c408:8dff:b5bf", 64),
            v6("fe80::b3dd:5c39:7c29:48b6", 64),
        ],
        69699,
    )
}

fn tun0() -> NetworkInterface {
    ni(
        "tun0",
        5,
        None,
        &[v4(10, 96, 0, 57, 16), v6("fe80::c137:8964:5a63:efde", 64)],
        69841,
    )
}

fn ipv6leakintrf0() -> NetworkInterface {
    ni(
        "ipv6leakintrf0",
        6,
        Some(MacAddr::new(0xd2, 0x25, 0xd4, 0x9f, 0x18, 0xfd)),
        &[v6("fdeb:446c:912d:8da::", 64), v6("fe80::7f87:ff4a:9ad8:d2f0", 64)],
        65731,
    )
}

fn wlan0() -> NetworkInterface {
    ni(
        "wlan0",
        3,
        Some(MacAddr::new(0x34, 0xcf, 0xf6, 0x9a, 0x11, 0x22)),
        &[
            v4(192, 168, 1, 42, 24),
            v6("fe80::36cf:f6ff:fe9a:1122", 64),
        ],
        69699,
    )
}

fn eth1() -> NetworkInterface {
    ni(
        "eth1",
        4,
        Some(MacAddr::new(0x52, 0x54, 0x00, 0x12, 0x34, 0x56)),
        &[v4(10, 0, 0, 15, 24)],
        69699,
    )
}

fn docker0() -> NetworkInterface {
    ni(
        "docker0",
        7,
        Some(MacAddr::new(0x02, 0x42, 0xac, 0x11, 0x00, 0x01)),
        &[v4(172, 17, 0, 1, 16)],
        69699,
    )
}

fn veth1234() -> NetworkInterface {
    ni(
        "veth1234",
        8,
        Some(MacAddr::new(0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f)),
        &[v6("fe80::1a2b:3cff:fe4d:5e6f", 64)],
        69699,
    )
}

fn br0() -> NetworkInterface {
    ni(
        "br0",
        9,
        Some(MacAddr::new(0xde, 0xad, 0xbe, 0xef, 0x00, 0x01)),
        &[
            v4(192, 168, 100, 1, 24),
            v6("fd00:dead:beef::1", 64),
        ],
        69699,
    )
}