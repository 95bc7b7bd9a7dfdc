//! Shared models and address arithmetic for netsweep.
//!
//! * [`network::range`]: the address factory (range, subnet, adapter).
//! * [`network::interface`]: adapter selection.
//! * [`network::node`], [`network::mac`], [`results`]: scan output.
//! * [`config`]: per-probe options and their limits.

pub mod config;
pub mod error;
pub mod network;
pub mod results;
pub mod utils;

pub use config::QueryOptions;
pub use error::{Cancelled, ScanError};
pub use network::mac::MacAddress;
pub use network::node::NetworkNode;
pub use results::{LiveStatus, NodeStatus, ScanResults, ScanStatus};
