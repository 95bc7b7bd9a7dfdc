use std::net::Ipv4Addr;

use async_trait::async_trait;
use netsweep_common::{Cancelled, NetworkNode, ScanResults};
use tokio_util::sync::CancellationToken;
use tracing::Dispatch;

use super::{
    NetworkScanner, NodeStatusHandler, ScanPlan, ScanStatusHandler, ScanStrategy,
    scan_sequentially,
};
use crate::query::NodeQuery;

/// Resolves one address at a time, so results come back in input order.
#[derive(Clone)]
pub struct SequentialScanner {
    plan: ScanPlan,
}

impl SequentialScanner {
    pub fn new(addresses: Vec<Ipv4Addr>, query: NodeQuery) -> Self {
        Self {
            plan: ScanPlan::new(addresses, query),
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.plan.set_dispatch(dispatch);
        self
    }
}

#[async_trait]
impl NetworkScanner for SequentialScanner {
    async fn query_network(&self, token: &CancellationToken) -> Result<ScanResults, Cancelled> {
        let plan = &self.plan;
        let nodes = scan_sequentially(&plan.addresses, &plan.query, &plan.hooks, token);
        plan.run(self.strategy(), nodes).await
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
        ScanStrategy::Sequential
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
