//! MAC resolution through the operating system's ARP cache.
//!
//! Two interchangeable strategies sit behind [`MacResolver`]: reading the
//! kernel table at `/proc/net/arp` directly, and shelling out to the `arp`
//! utility and scraping its output. [`platform_mac_resolver`] picks one for
//! the running OS.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use async_trait::async_trait;
use netsweep_common::MacAddress;
use regex::Regex;
use tokio::process::Command;
use tracing::trace;

use super::MacResolver;

const PROC_ARP_TABLE: &str = "/proc/net/arp";

// ATF_COM: the entry is complete.
const ARP_FLAG_COMPLETE: u32 = 0x2;

/// Returns the MAC strategy for the running OS.
pub fn platform_mac_resolver() -> Arc<dyn MacResolver> {
    if cfg!(target_os = "linux") {
        Arc::new(ArpTable::default())
    } else {
        Arc::new(ArpCommand::default())
    }
}

/// Reads the kernel ARP cache.
#[derive(Debug, Clone)]
pub struct ArpTable {
    path: PathBuf,
}

impl Default for ArpTable {
    fn default() -> Self {
        Self::at(PROC_ARP_TABLE)
    }
}

impl ArpTable {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MacResolver for ArpTable {
    async fn resolve(&self, address: Ipv4Addr) -> anyhow::Result<Option<MacAddress>> {
        let table = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(parse_arp_table(&table, address))
    }
}

/// Finds `address` in the `/proc/net/arp` text format.
///
/// ```text
/// IP address       HW type     Flags       HW address            Mask     Device
/// 192.168.1.1      0x1         0x2         a0:b1:c2:d3:e4:f5     *        eth0
/// ```
///
/// Incomplete entries and all-zero hardware addresses count as unresolved.
fn parse_arp_table(table: &str, address: Ipv4Addr) -> Option<MacAddress> {
    table.lines().skip(1).find_map(|line| {
        let mut fields = line.split_whitespace();
        let ip: Ipv4Addr = fields.next()?.parse().ok()?;
        if ip != address {
            return None;
        }

        let _hw_type = fields.next()?;
        let flags = u32::from_str_radix(fields.next()?.trim_start_matches("0x"), 16).ok()?;
        if flags & ARP_FLAG_COMPLETE == 0 {
            trace!(%address, "incomplete ARP entry");
            return None;
        }

        let mac = MacAddress::parse_lenient(fields.next()?).ok()?;
        (!mac.is_empty()).then_some(mac)
    })
}

/// Runs the system `arp` utility and scrapes the MAC from its output.
#[derive(Debug, Clone)]
pub struct ArpCommand {
    program: String,
}

impl Default for ArpCommand {
    fn default() -> Self {
        Self {
            program: String::from("arp"),
        }
    }
}

impl ArpCommand {
    fn args(address: Ipv4Addr) -> Vec<String> {
        let flag = if cfg!(target_os = "windows") { "-a" } else { "-n" };
        vec![flag.to_string(), address.to_string()]
    }
}

#[async_trait]
impl MacResolver for ArpCommand {
    async fn resolve(&self, address: Ipv4Addr) -> anyhow::Result<Option<MacAddress>> {
        let output = Command::new(&self.program)
            .args(Self::args(address))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("running `{}`", self.program))?;

        // `arp` exits non-zero for unknown hosts on some systems.
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_arp_output(&stdout, address))
    }
}

fn mac_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b([0-9a-f]{1,2}(?:[:-][0-9a-f]{1,2}){5})\b")
            .expect("MAC pattern is valid")
    })
}

/// Picks the MAC from the line of `arp` output that mentions `address`.
///
/// Handles the BSD/macOS form `? (10.0.0.1) at 0:1c:42:0:0:18 on en0`, the
/// Linux net-tools table and the Windows `10.0.0.1   00-1c-42-00-00-18` form.
fn parse_arp_output(output: &str, address: Ipv4Addr) -> Option<MacAddress> {
    let needle = address.to_string();
    output
        .lines()
        .filter(|line| mentions_address(line, &needle))
        .find_map(|line| {
            let found = mac_pattern().captures(line)?.get(1)?;
            let mac = MacAddress::parse_lenient(found.as_str()).ok()?;
            (!mac.is_empty()).then_some(mac)
        })
}

fn mentions_address(line: &str, needle: &str) -> bool {
    line.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .any(|token| token == needle)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
