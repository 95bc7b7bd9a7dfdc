//! The scanner contract and the engines that implement it.
//!
//! Every engine owns an immutable address set and a [`NodeQuery`], and
//! differs only in how it schedules the per-address queries:
//!
//! * [`SequentialScanner`]: one address after the other, in input order.
//! * [`BatchedScanner`]: fixed-size batches run concurrently, each batch
//!   sequential inside.
//! * [`SingleScanner`]: a plan with exactly one address.
//!
//! Cancellation is the only failure an engine reports. Everything a probe
//! can get wrong is already contained by the query.

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use netsweep_common::{Cancelled, NetworkNode, NodeStatus, ScanResults, ScanStatus};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, info};

use crate::query::NodeQuery;

mod batched;
mod sequential;
mod single;

pub use batched::{BatchedScanner, partition};
pub use sequential::SequentialScanner;
pub use single::SingleScanner;

pub type NodeStatusHandler = Arc<dyn Fn(NodeStatus<'_>) + Send + Sync>;
pub type ScanStatusHandler = Arc<dyn Fn(ScanStatus<'_>) + Send + Sync>;

/// How a built plan schedules its queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStrategy {
    Sequential,
    Batched { batch_size: usize },
    Single,
}

#[async_trait]
pub trait NetworkScanner: Send + Sync {
    /// Probes every configured address.
    ///
    /// Engines never return partial results: a cancelled scan yields
    /// `Err(Cancelled)` and everything resolved so far is dropped.
    async fn query_network(&self, token: &CancellationToken) -> Result<ScanResults, Cancelled>;

    /// Probes one address with the plan's options, in or outside its set.
    async fn check_network_node(
        &self,
        address: Ipv4Addr,
        token: &CancellationToken,
    ) -> Result<NetworkNode, Cancelled>;

    /// Registers the observer for per-address progress. Replaces any
    /// previous one.
    fn on_node_status(&mut self, handler: NodeStatusHandler);

    /// Registers the observer for scan start and completion.
    fn on_scan_status(&mut self, handler: ScanStatusHandler);

    fn strategy(&self) -> ScanStrategy;

    fn addresses(&self) -> &[Ipv4Addr];
}

/// Observers registered on an engine. Purely informational.
#[derive(Clone, Default)]
pub(crate) struct StatusHooks {
    node: Option<NodeStatusHandler>,
    scan: Option<ScanStatusHandler>,
}

impl StatusHooks {
    fn node(&self, status: NodeStatus<'_>) {
        if let Some(handler) = &self.node {
            handler(status);
        }
    }

    fn scan(&self, status: ScanStatus<'_>) {
        if let Some(handler) = &self.scan {
            handler(status);
        }
    }
}

/// State every engine shares: what to scan, how to probe, who to tell and
/// where to log.
#[derive(Clone)]
pub(crate) struct ScanPlan {
    addresses: Arc<[Ipv4Addr]>,
    query: NodeQuery,
    hooks: StatusHooks,
    dispatch: Dispatch,
}

impl ScanPlan {
    fn new(addresses: Vec<Ipv4Addr>, query: NodeQuery) -> Self {
        Self {
            addresses: addresses.into(),
            query,
            hooks: StatusHooks::default(),
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    fn set_node_handler(&mut self, handler: NodeStatusHandler) {
        self.hooks.node = Some(handler);
    }

    fn set_scan_handler(&mut self, handler: ScanStatusHandler) {
        self.hooks.scan = Some(handler);
    }

    async fn check_node(
        &self,
        address: Ipv4Addr,
        token: &CancellationToken,
    ) -> Result<NetworkNode, Cancelled> {
        check_node(&self.query, &self.hooks, address, token)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    /// Wraps an engine's scheduling in start/completion reporting and runs
    /// it under the plan's log sink.
    async fn run<F>(&self, strategy: ScanStrategy, nodes: F) -> Result<ScanResults, Cancelled>
    where
        F: Future<Output = Result<Vec<NetworkNode>, Cancelled>> + Send,
    {
        let scan = async {
            info!(addresses = self.addresses.len(), ?strategy, "scan started");
            self.hooks.scan(ScanStatus::Started {
                addresses: &self.addresses,
            });

            let started = Instant::now();
            let nodes = match nodes.await {
                Ok(nodes) => nodes,
                Err(Cancelled) => {
                    info!("scan cancelled");
                    return Err(Cancelled);
                }
            };
            let results = ScanResults::new(nodes, started.elapsed(), &self.addresses);

            info!(
                alive = results.number_of_alive_nodes(),
                scanned = results.addresses_scanned(),
                elapsed = ?results.elapsed(),
                "scan completed"
            );
            self.hooks.scan(ScanStatus::Completed(&results));
            Ok(results)
        };

        scan.with_subscriber(self.dispatch.clone()).await
    }
}

async fn check_node(
    query: &NodeQuery,
    hooks: &StatusHooks,
    address: Ipv4Addr,
    token: &CancellationToken,
) -> Result<NetworkNode, Cancelled> {
    hooks.node(NodeStatus::Started(address));
    let node = query.query(address, token).await?;
    hooks.node(NodeStatus::Completed(&node));
    Ok(node)
}

/// Resolves `addresses` one at a time, in order. Stops before the next
/// address once `token` is cancelled.
async fn scan_sequentially(
    addresses: &[Ipv4Addr],
    query: &NodeQuery,
    hooks: &StatusHooks,
    token: &CancellationToken,
) -> Result<Vec<NetworkNode>, Cancelled> {
    let mut nodes = Vec::with_capacity(addresses.len());
    for &address in addresses {
        if token.is_cancelled() {
            return Err(Cancelled);
        }
        nodes.push(check_node(query, hooks, address, token).await?);
    }
    Ok(nodes)
}
