use std::net::{IpAddr, Ipv4Addr};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use tracing::{debug, warn};

use super::HostnameResolver;

/// PTR lookups through the system's configured name servers.
pub struct ReverseDns {
    timeout: Duration,
    resolver: OnceLock<TokioAsyncResolver>,
}

impl ReverseDns {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            resolver: OnceLock::new(),
        }
    }

    fn resolver(&self) -> &TokioAsyncResolver {
        self.resolver.get_or_init(|| {
            let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
                Ok(system) => system,
                Err(err) => {
                    warn!(?err, "could not read system resolver config, using defaults");
                    (ResolverConfig::default(), ResolverOpts::default())
                }
            };
            opts.timeout = self.timeout;
            opts.attempts = 1;
            TokioAsyncResolver::tokio(config, opts)
        })
    }
}

#[async_trait]
impl HostnameResolver for ReverseDns {
    async fn lookup(&self, address: Ipv4Addr) -> anyhow::Result<Option<String>> {
        match self.resolver().reverse_lookup(IpAddr::V4(address)).await {
            Ok(response) => Ok(response.iter().next().and_then(|name| ptr_to_hostname(&name.to_string()))),
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(%address, "no PTR record");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn ptr_to_hostname(name: &str) -> Option<String> {
    let hostname = name.trim_end_matches('.');
    (!hostname.is_empty()).then(|| hostname.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
