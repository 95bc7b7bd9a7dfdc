//! The four leaf probes run against every address.
//!
//! Each probe sits behind its own trait so the query orchestrator can be
//! driven by real network probes or by in-memory doubles. A probe answers
//! `Ok(None)` when the host simply has nothing to report and `Err` when the
//! probe itself broke; the orchestrator treats both as "unresolved".

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::MacAddress;

pub mod dns;
pub mod http;
pub mod mac;
pub mod ping;

pub use dns::ReverseDns;
pub use http::{DefaultHttpClientFactory, HttpBanner, HttpClientFactory};
pub use mac::{ArpCommand, ArpTable, platform_mac_resolver};
pub use ping::IcmpPing;

/// How a probe manages its OS resources (ICMP sockets, HTTP clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// One session created on first use and reused for every address.
    Shared,
    /// A fresh session per probe, released as soon as the probe returns.
    PerProbe,
}

#[async_trait]
pub trait PingProbe: Send + Sync {
    /// Returns the round-trip time, or `None` when no echo reply arrived.
    async fn ping(&self, address: Ipv4Addr) -> anyhow::Result<Option<Duration>>;
}

#[async_trait]
pub trait MacResolver: Send + Sync {
    async fn resolve(&self, address: Ipv4Addr) -> anyhow::Result<Option<MacAddress>>;
}

#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn lookup(&self, address: Ipv4Addr) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait BannerProbe: Send + Sync {
    /// Returns the web server's self-reported name (the `Server` header).
    async fn banner(&self, address: Ipv4Addr) -> anyhow::Result<Option<String>>;
}
