//! Host discovery engine.
//!
//! A scan is configured with the staged [`ScanBuilder`], which validates the
//! address source and probe options and returns a [`NetworkScanner`]. The
//! scanner runs a [`NodeQuery`] against every address: an ICMP echo first,
//! then, for hosts that answered, the MAC from the ARP cache, the reverse
//! DNS name and optionally the HTTP `Server` banner.

pub mod builder;
pub mod logging;
pub mod probe;
pub mod query;
pub mod scanner;

pub use builder::ScanBuilder;
pub use query::NodeQuery;
pub use scanner::{NetworkScanner, NodeStatusHandler, ScanStatusHandler, ScanStrategy};
