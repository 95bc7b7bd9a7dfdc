use std::net::Ipv4Addr;

use async_trait::async_trait;
use netsweep_common::{Cancelled, NetworkNode, ScanResults};
use tokio_util::sync::CancellationToken;
use tracing::Dispatch;

use super::{
    NetworkScanner, NodeStatusHandler, ScanPlan, ScanStatusHandler, ScanStrategy, check_node,
};
use crate::query::NodeQuery;

/// A plan with exactly one address.
#[derive(Clone)]
pub struct SingleScanner {
    address: Ipv4Addr,
    plan: ScanPlan,
}

impl SingleScanner {
    pub fn new(address: Ipv4Addr, query: NodeQuery) -> Self {
        Self {
            address,
            plan: ScanPlan::new(vec![address], query),
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.plan.set_dispatch(dispatch);
        self
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }
}

#[async_trait]
impl NetworkScanner for SingleScanner {
    async fn query_network(&self, token: &CancellationToken) -> Result<ScanResults, Cancelled> {
        let plan = &self.plan;
        let node = async {
            let node = check_node(&plan.query, &plan.hooks, self.address, token).await?;
            Ok(vec![node])
        };
        plan.run(self.strategy(), node).await
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
        ScanStrategy::Single
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
