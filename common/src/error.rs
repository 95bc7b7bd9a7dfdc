use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

/// Configuration failures raised while assembling a scan plan.
///
/// Every variant is raised synchronously by the builder, before a single
/// packet leaves the machine, and carries the value that was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid IP range {begin} - {end}: endpoints must share the first two octets and be ascending")]
    InvalidIpRange { begin: Ipv4Addr, end: Ipv4Addr },

    #[error("invalid subnet {ip}/{mask}: address must be a unicast host and the mask at least /16 with two host bits")]
    InvalidSubnet { ip: Ipv4Addr, mask: Ipv4Addr },

    #[error("invalid address {0}: unspecified and broadcast addresses cannot be probed")]
    InvalidAddress(Ipv4Addr),

    #[error("invalid network adapter '{0}': adapter must be up and carry an IPv4 address")]
    InvalidNetworkAdapter(String),

    #[error("invalid timeout {0:?}: must be greater than zero and at most 20s")]
    InvalidTimeout(Duration),

    #[error("invalid hop limit {0}: must be between 1 and 255")]
    InvalidHops(u8),

    #[error("invalid batch size {0}: must be greater than zero")]
    InvalidBatchSize(usize),

    #[error("no addresses were supplied")]
    NoAddresses,

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// The scan was aborted through its cancellation token.
///
/// This is the only error a running scan hands back to its caller. Nodes
/// resolved before cancellation are discarded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("scan was cancelled")]
pub struct Cancelled;

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
