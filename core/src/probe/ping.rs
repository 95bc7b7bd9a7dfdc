use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::QueryOptions;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::{PingProbe, SessionMode};

const PAYLOAD: [u8; 56] = [0; 56];

/// ICMP echo probe.
///
/// In [`SessionMode::Shared`] one ICMP socket is opened on first use and kept
/// until the probe is dropped. In [`SessionMode::PerProbe`] every call opens
/// and closes its own socket, so concurrent callers never share one.
pub struct IcmpPing {
    options: QueryOptions,
    mode: SessionMode,
    session: OnceCell<Client>,
    sequence: AtomicU16,
}

impl IcmpPing {
    pub fn new(options: QueryOptions, mode: SessionMode) -> Self {
        Self {
            options,
            mode,
            session: OnceCell::new(),
            sequence: AtomicU16::new(0),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    async fn shared_session(&self) -> std::io::Result<&Client> {
        self.session
            .get_or_try_init(|| async { open_session(self.options.ttl()) })
            .await
    }

    async fn echo(&self, client: &Client, address: Ipv4Addr) -> anyhow::Result<Option<Duration>> {
        let identifier = PingIdentifier(rand::random());
        let sequence = PingSequence(self.sequence.fetch_add(1, Ordering::Relaxed));

        let mut pinger = client.pinger(IpAddr::V4(address), identifier).await;
        pinger.timeout(self.options.timeout());

        match pinger.ping(sequence, &PAYLOAD).await {
            Ok((_reply, rtt)) => {
                trace!(%address, ?rtt, "echo reply");
                Ok(Some(rtt))
            }
            Err(SurgeError::Timeout { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn open_session(ttl: u8) -> std::io::Result<Client> {
    let config = Config::builder().kind(ICMP::V4).ttl(u32::from(ttl)).build();
    let client = Client::new(&config)?;
    debug!(ttl, "opened ICMP session");
    Ok(client)
}

#[async_trait]
impl PingProbe for IcmpPing {
    async fn ping(&self, address: Ipv4Addr) -> anyhow::Result<Option<Duration>> {
        match self.mode {
            SessionMode::Shared => {
                let client = self.shared_session().await?;
                self.echo(client, address).await
            }
            SessionMode::PerProbe => {
                let client = open_session(self.options.ttl())?;
                self.echo(&client, address).await
            }
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
