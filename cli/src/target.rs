//! # Scan Target Model
//!
//! Parses the command line target into an address source for the builder:
//! * A single IPv4 address (`192.168.1.5`).
//! * A range (`192.168.1.1-100`, `192.168.1.1-192.168.2.20`).
//! * A subnet in prefix or mask form (`192.168.1.0/24`, `192.168.1.0/255.255.255.0`).
//! * A comma separated address list (`10.0.0.1,10.0.0.7`).
//! * The local LAN (`lan`), taken from the selected or default adapter.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use netsweep_common::ScanError;
use netsweep_core::builder::{AddressStage, OptionsStage};
use netsweep_core::ScanBuilder;
use pnet::datalink::NetworkInterface;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// The subnet of the scanning adapter.
    Lan,
    Host(Ipv4Addr),
    Range { begin: Ipv4Addr, end: Ipv4Addr },
    Subnet { ip: Ipv4Addr, mask: Ipv4Addr },
    List(Vec<Ipv4Addr>),
}

impl Target {
    /// Hands the target to the builder's matching address selector.
    pub fn select(
        self,
        builder: ScanBuilder<AddressStage>,
        interface: Option<&NetworkInterface>,
    ) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        match self {
            Target::Lan => builder.with_interface(interface),
            Target::Host(address) => builder.with_address(address),
            Target::Range { begin, end } => builder.with_range(begin, end),
            Target::Subnet { ip, mask } => builder.with_subnet(ip, mask),
            Target::List(addresses) => builder.with_addresses(addresses),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Lan => write!(f, "lan"),
            Target::Host(address) => write!(f, "{address}"),
            Target::Range { begin, end } => write!(f, "{begin}-{end}"),
            Target::Subnet { ip, mask } => write!(f, "{ip}/{mask}"),
            Target::List(addresses) => {
                let joined: Vec<String> = addresses.iter().map(Ipv4Addr::to_string).collect();
                write!(f, "{}", joined.join(","))
            }
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("lan") {
            return Ok(Target::Lan);
        }

        if s.contains(',') {
            return parse_list(s);
        }

        if let Ok(address) = s.parse::<Ipv4Addr>() {
            return Ok(Target::Host(address));
        }

        if let Some(target) = parse_ip_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_subnet(s)? {
            return Ok(target);
        }

        Err(format!("invalid target: {s}"))
    }
}

fn parse_list(s: &str) -> Result<Target, String> {
    let addresses = s
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<Ipv4Addr>()
                .map_err(|e| format!("Invalid address '{part}' in list: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if addresses.is_empty() {
        return Err(format!("Address list is empty: {s}"));
    }
    Ok(Target::List(addresses))
}

/// Parses "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<Target>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let begin = start_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid start IP in range '{start_str}': {e}"))?;

    let end = parse_range_end_addr(end_str.trim(), &begin, s)?;

    Ok(Some(Target::Range { begin, end }))
}

/// Completes an abbreviated range end from the start address, so
/// "192.168.1.1-50" ends at 192.168.1.50.
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
    original_s: &str,
) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(format!("End range cannot be empty: {original_s}"));
    }

    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("Invalid end range '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("End range has too many octets: {end_str}"));
    }

    let mut end_octets = start_addr.octets();
    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses "192.168.1.0/24" or "192.168.1.0/255.255.255.0".
fn parse_subnet(s: &str) -> Result<Option<Target>, String> {
    let Some((ip_str, mask_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ip = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| format!("Invalid IP in subnet '{ip_str}': {e}"))?;

    let mask = match mask_str.parse::<Ipv4Addr>() {
        Ok(mask) => mask,
        Err(_) => {
            let prefix = mask_str
                .parse::<u8>()
                .map_err(|e| format!("Invalid prefix in subnet '{mask_str}': {e}"))?;
            prefix_to_mask(prefix)?
        }
    };

    Ok(Some(Target::Subnet { ip, mask }))
}

fn prefix_to_mask(prefix: u8) -> Result<Ipv4Addr, String> {
    match prefix {
        0 => Ok(Ipv4Addr::UNSPECIFIED),
        1..=32 => Ok(Ipv4Addr::from(u32::MAX << (32 - u32::from(prefix)))),
        _ => Err(format!("Prefix must be at most 32: /{prefix}")),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
