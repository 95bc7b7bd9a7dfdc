//! Aggregate scan output and the live status events engines emit while
//! producing it.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::network::node::NetworkNode;

/// Everything one completed scan produced.
///
/// `addresses_scanned` is taken from the configured address set, so it
/// always equals `nodes().len()` for a scan that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResults {
    nodes: Vec<NetworkNode>,
    elapsed: Duration,
    addresses_scanned: usize,
    alive_nodes: usize,
    start_address: Option<Ipv4Addr>,
    end_address: Option<Ipv4Addr>,
}

impl ScanResults {
    /// Builds the report for `addresses`. Start and end are the first and
    /// last configured addresses regardless of the order nodes completed in.
    pub fn new(nodes: Vec<NetworkNode>, elapsed: Duration, addresses: &[Ipv4Addr]) -> Self {
        let alive_nodes = nodes.iter().filter(|node| node.is_alive()).count();
        Self {
            nodes,
            elapsed,
            addresses_scanned: addresses.len(),
            alive_nodes,
            start_address: addresses.first().copied(),
            end_address: addresses.last().copied(),
        }
    }

    /// The report returned when an engine could not run at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<NetworkNode> {
        self.nodes
    }

    pub fn alive_nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.nodes.iter().filter(|node| node.is_alive())
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn addresses_scanned(&self) -> usize {
        self.addresses_scanned
    }

    pub fn number_of_alive_nodes(&self) -> usize {
        self.alive_nodes
    }

    pub fn start_address(&self) -> Option<Ipv4Addr> {
        self.start_address
    }

    pub fn end_address(&self) -> Option<Ipv4Addr> {
        self.end_address
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Orders nodes by address.
    pub fn sort_by_address(&mut self) {
        self.nodes.sort_by_key(NetworkNode::ip);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveStatus {
    Started,
    Completed,
}

/// Fired around every probed address.
#[derive(Debug, Clone, Copy)]
pub enum NodeStatus<'a> {
    Started(Ipv4Addr),
    Completed(&'a NetworkNode),
}

impl NodeStatus<'_> {
    pub fn status(&self) -> LiveStatus {
        match self {
            NodeStatus::Started(_) => LiveStatus::Started,
            NodeStatus::Completed(_) => LiveStatus::Completed,
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        match self {
            NodeStatus::Started(ip) => *ip,
            NodeStatus::Completed(node) => node.ip(),
        }
    }
}

/// Fired once when a scan begins and once when it ends.
#[derive(Debug, Clone, Copy)]
pub enum ScanStatus<'a> {
    Started { addresses: &'a [Ipv4Addr] },
    Completed(&'a ScanResults),
}

impl ScanStatus<'_> {
    pub fn status(&self) -> LiveStatus {
        match self {
            ScanStatus::Started { .. } => LiveStatus::Started,
            ScanStatus::Completed(_) => LiveStatus::Completed,
        }
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
