//! Per-address orchestration of the four probes.

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use netsweep_common::{Cancelled, NetworkNode, QueryOptions};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::probe::{BannerProbe, HostnameResolver, MacResolver, PingProbe};

/// Composes ping, MAC, hostname and banner probes into one [`NetworkNode`].
///
/// A host that does not answer the ping is reported dead straight away and
/// none of the other probes run against it. The ping is cut off at the plan
/// timeout, so a silent address never takes longer than that. For live hosts
/// every follow-up probe is bounded too and its failures are contained: the
/// field stays unresolved and the node is still reported alive.
#[derive(Clone)]
pub struct NodeQuery {
    options: QueryOptions,
    ping: Arc<dyn PingProbe>,
    mac: Arc<dyn MacResolver>,
    hostname: Arc<dyn HostnameResolver>,
    banner: Option<Arc<dyn BannerProbe>>,
}

impl NodeQuery {
    pub fn new(
        options: QueryOptions,
        ping: Arc<dyn PingProbe>,
        mac: Arc<dyn MacResolver>,
        hostname: Arc<dyn HostnameResolver>,
    ) -> Self {
        Self {
            options,
            ping,
            mac,
            hostname,
            banner: None,
        }
    }

    pub fn with_banner(mut self, banner: Option<Arc<dyn BannerProbe>>) -> Self {
        self.banner = banner;
        self
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn probes_http(&self) -> bool {
        self.banner.is_some()
    }

    pub async fn query(
        &self,
        address: Ipv4Addr,
        token: &CancellationToken,
    ) -> Result<NetworkNode, Cancelled> {
        let started = Instant::now();

        let echo = self.ping.ping(address);
        let Some(latency) = self.contained("ping", address, token, self.options.timeout(), echo).await? else {
            trace!(%address, "no echo reply");
            return Ok(NetworkNode::unreachable(address, started.elapsed()));
        };

        let limit = self.follow_up_limit();
        let mac = self
            .contained("mac", address, token, limit, self.mac.resolve(address))
            .await?;
        let hostname = self
            .contained("hostname", address, token, limit, self.hostname.lookup(address))
            .await?;
        let web_server = match &self.banner {
            Some(banner) => {
                self.contained("http", address, token, limit, banner.banner(address))
                    .await?
            }
            None => None,
        };

        let node = NetworkNode::reachable(address, latency)
            .with_mac(mac)
            .with_hostname(hostname)
            .with_web_server(web_server)
            .finish(started.elapsed());

        debug!(%address, ?latency, "host is up");
        Ok(node)
    }

    /// Runs one probe under `limit`. Only cancellation escapes; a timeout or
    /// probe error becomes `None`.
    async fn contained<T>(
        &self,
        probe: &'static str,
        address: Ipv4Addr,
        token: &CancellationToken,
        limit: Duration,
        work: impl Future<Output = anyhow::Result<Option<T>>>,
    ) -> Result<Option<T>, Cancelled> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Cancelled),
            outcome = tokio::time::timeout(limit, work) => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => {
                    debug!(%address, probe, error = %err, "probe failed");
                    Ok(None)
                }
                Err(_) => {
                    trace!(%address, probe, ?limit, "probe timed out");
                    Ok(None)
                }
            },
        }
    }

    // Leaves MAC, DNS and HTTP probes their own timeout to report first.
    fn follow_up_limit(&self) -> Duration {
        self.options.timeout() + self.options.timeout() / 2
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
