use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use netsweep_common::config::{MAX_CONCURRENT_BATCHES, validate_batch_size};
use netsweep_common::{Cancelled, NetworkNode, ScanError, ScanResults};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, error};

use super::{
    NetworkScanner, NodeStatusHandler, ScanPlan, ScanStatusHandler, ScanStrategy,
    scan_sequentially,
};
use crate::query::NodeQuery;

/// Splits `addresses` into consecutive batches of `batch_size`. The last
/// batch holds the remainder.
pub fn partition(addresses: &[Ipv4Addr], batch_size: usize) -> Result<Vec<Vec<Ipv4Addr>>, ScanError> {
    let batch_size = validate_batch_size(batch_size)?;
    if addresses.is_empty() {
        return Err(ScanError::NoAddresses);
    }
    Ok(addresses.chunks(batch_size).map(<[Ipv4Addr]>::to_vec).collect())
}

/// Runs fixed-size batches concurrently.
///
/// Each batch is one task that resolves its addresses in order, so at most
/// one probe per batch is in flight. The number of batches running at once
/// is capped by [`MAX_CONCURRENT_BATCHES`]. Batch results are merged in
/// submission order, which makes the output order equal the input order.
///
/// Probes built for this engine should use
/// [`SessionMode::PerProbe`](crate::probe::SessionMode::PerProbe).
#[derive(Clone)]
pub struct BatchedScanner {
    plan: ScanPlan,
    batch_size: usize,
}

impl BatchedScanner {
    pub fn new(addresses: Vec<Ipv4Addr>, batch_size: usize, query: NodeQuery) -> Self {
        Self {
            plan: ScanPlan::new(addresses, query),
            batch_size,
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.plan.set_dispatch(dispatch);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    async fn run_batches(
        &self,
        batches: Vec<Vec<Ipv4Addr>>,
        token: &CancellationToken,
    ) -> Result<Vec<NetworkNode>, Cancelled> {
        let plan = &self.plan;
        let admission = Arc::new(Semaphore::new(MAX_CONCURRENT_BATCHES));
        let mut tasks = Vec::with_capacity(batches.len());

        for (index, batch) in batches.into_iter().enumerate() {
            // Batches not yet admitted are dropped on cancellation; the
            // spawned ones see the token at their next probe.
            let permit = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Cancelled),
                permit = Arc::clone(&admission).acquire_owned() => permit.map_err(|_| Cancelled)?,
            };

            let query = plan.query.clone();
            let hooks = plan.hooks.clone();
            let token = token.clone();
            let task = async move {
                let _permit = permit;
                debug!(batch = index, size = batch.len(), "batch started");
                scan_sequentially(&batch, &query, &hooks, &token).await
            };

            tasks.push(AbortOnDropHandle::new(tokio::spawn(
                task.with_subscriber(plan.dispatch.clone()),
            )));
        }

        // Awaiting in submission order keeps the merge single-threaded.
        let mut nodes = Vec::with_capacity(plan.addresses.len());
        for task in tasks {
            match task.await {
                Ok(batch) => nodes.extend(batch?),
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => return Err(Cancelled),
            }
        }
        Ok(nodes)
    }
}

#[async_trait]
impl NetworkScanner for BatchedScanner {
    async fn query_network(&self, token: &CancellationToken) -> Result<ScanResults, Cancelled> {
        let batches = match partition(&self.plan.addresses, self.batch_size) {
            Ok(batches) => batches,
            Err(err) => {
                tracing::dispatcher::with_default(&self.plan.dispatch, || {
                    error!(%err, "cannot partition the address set, returning empty results");
                });
                return Ok(ScanResults::empty());
            }
        };

        self.plan
            .run(self.strategy(), self.run_batches(batches, token))
            .await
    }

    async fn check_network_node(
        &self,
        address: Ipv4Addr,
        token: &CancellationToken,
    ) -> Result<NetworkNode, Cancelled> {
        self.plan.check_node(address, token).await
    }

    fn on_node_status(&mut self, handler: NodeStatusHandler) {
        self.plan.set_node_handler(handler);
    }

    fn on_scan_status(&mut self, handler: ScanStatusHandler) {
        self.plan.set_scan_handler(handler);
    }

    fn strategy(&self) -> ScanStrategy {
        ScanStrategy::Batched {
            batch_size: self.batch_size,
        }
    }

    fn addresses(&self) -> &[Ipv4Addr] {
        &self.plan.addresses
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
