use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::network::mac::MacAddress;

/// The outcome of probing one address.
///
/// Nodes are produced once by the query orchestrator and never change
/// afterwards; every optional field stays `None` unless its probe succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkNode {
    ip: Ipv4Addr,
    mac: Option<MacAddress>,
    hostname: Option<String>,
    web_server: Option<String>,
    latency: Option<Duration>,
    query_time: Duration,
    alive: bool,
}

impl NetworkNode {
    /// A host that did not answer the ping. Nothing else was queried.
    pub fn unreachable(ip: Ipv4Addr, query_time: Duration) -> Self {
        Self {
            ip,
            mac: None,
            hostname: None,
            web_server: None,
            latency: None,
            query_time,
            alive: false,
        }
    }

    pub fn reachable(ip: Ipv4Addr, latency: Duration) -> NodeDetails {
        NodeDetails {
            ip,
            latency,
            mac: None,
            hostname: None,
            web_server: None,
        }
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn mac(&self) -> Option<MacAddress> {
        self.mac
    }

    /// The MAC address, or [`MacAddress::EMPTY`] when it was not resolved.
    pub fn mac_or_empty(&self) -> MacAddress {
        self.mac.unwrap_or(MacAddress::EMPTY)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn web_server(&self) -> Option<&str> {
        self.web_server.as_deref()
    }

    /// Ping round-trip time. Only present for alive nodes.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// Wall time spent on every probe for this address.
    pub fn query_time(&self) -> Duration {
        self.query_time
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Collects what the follow-up probes found for an alive host.
#[derive(Debug, Clone)]
pub struct NodeDetails {
    ip: Ipv4Addr,
    latency: Duration,
    mac: Option<MacAddress>,
    hostname: Option<String>,
    web_server: Option<String>,
}

impl NodeDetails {
    pub fn with_mac(mut self, mac: Option<MacAddress>) -> Self {
        self.mac = mac.filter(|mac| !mac.is_empty());
        self
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname.filter(|name| !name.is_empty());
        self
    }

    pub fn with_web_server(mut self, web_server: Option<String>) -> Self {
        self.web_server = web_server.filter(|banner| !banner.is_empty());
        self
    }

    pub fn finish(self, query_time: Duration) -> NetworkNode {
        NetworkNode {
            ip: self.ip,
            mac: self.mac,
            hostname: self.hostname,
            web_server: self.web_server,
            latency: Some(self.latency),
            query_time,
            alive: true,
        }
    }
}

impl fmt::Display for NetworkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip)?;
        if !self.alive {
            return write!(f, " (down)");
        }
        if let Some(hostname) = &self.hostname {
            write!(f, " {hostname}")?;
        }
        if let Some(mac) = self.mac {
            write!(f, " [{mac}]")?;
        }
        if let Some(latency) = self.latency {
            write!(f, " {}ms", latency.as_millis())?;
        }
        Ok(())
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
