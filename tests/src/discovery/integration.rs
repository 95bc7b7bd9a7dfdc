use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::{
    Cancelled, LiveStatus, MacAddress, NetworkNode, NodeStatus, QueryOptions, ScanStatus,
};
use netsweep_core::logging::silent_dispatch;
use netsweep_core::probe::{BannerProbe, HostnameResolver, MacResolver, PingProbe};
use netsweep_core::scanner::{BatchedScanner, SequentialScanner, SingleScanner, partition};
use netsweep_core::{NetworkScanner, NodeQuery, ScanBuilder, ScanStrategy};
use tokio_util::sync::CancellationToken;

/*************************************************************
                       Probe doubles
**************************************************************/

/// Answers for a fixed set of hosts and records how many probes overlap.
struct LanPing {
    up: HashSet<Ipv4Addr>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    probes: AtomicUsize,
}

impl LanPing {
    fn new(up: impl IntoIterator<Item = Ipv4Addr>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            up: up.into_iter().collect(),
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        })
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PingProbe for LanPing {
    async fn ping(&self, address: Ipv4Addr) -> anyhow::Result<Option<Duration>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.probes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.up.contains(&address).then_some(Duration::from_millis(2)))
    }
}

struct StaticArp;

#[async_trait]
impl MacResolver for StaticArp {
    async fn resolve(&self, address: Ipv4Addr) -> anyhow::Result<Option<MacAddress>> {
        let [.., last] = address.octets();
        Ok(Some(MacAddress::new([0x02, 0, 0, 0, 0, last])))
    }
}

struct HostsFile;

#[async_trait]
impl HostnameResolver for HostsFile {
    async fn lookup(&self, address: Ipv4Addr) -> anyhow::Result<Option<String>> {
        if address.is_loopback() {
            return Ok(Some("localhost".into()));
        }
        anyhow::bail!("SERVFAIL")
    }
}

struct Apache;

#[async_trait]
impl BannerProbe for Apache {
    async fn banner(&self, _: Ipv4Addr) -> anyhow::Result<Option<String>> {
        Ok(Some("Apache/2.4.58".into()))
    }
}

fn options() -> QueryOptions {
    QueryOptions::new(64, Duration::from_millis(200)).unwrap()
}

fn query(ping: Arc<LanPing>) -> NodeQuery {
    NodeQuery::new(options(), ping, Arc::new(StaticArp), Arc::new(HostsFile))
}

fn subnet(count: u8) -> Vec<Ipv4Addr> {
    (1..=count).map(|last| Ipv4Addr::new(192, 168, 7, last)).collect()
}

fn ips(nodes: &[NetworkNode]) -> Vec<Ipv4Addr> {
    nodes.iter().map(NetworkNode::ip).collect()
}

/*************************************************************
                      Engine behaviour
**************************************************************/

#[tokio::test]
async fn one_reachable_host_among_many() {
    let mut addresses = vec![Ipv4Addr::LOCALHOST];
    addresses.extend(subnet(9));
    let ping = LanPing::new([Ipv4Addr::LOCALHOST], Duration::ZERO);
    let scanner = SequentialScanner::new(addresses.clone(), query(ping)).with_dispatch(silent_dispatch());

    let results = scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(results.nodes().len(), 10);
    assert_eq!(results.addresses_scanned(), 10);
    assert_eq!(results.number_of_alive_nodes(), 1);
    assert_eq!(ips(results.nodes()), addresses);

    let localhost = &results.nodes()[0];
    assert_eq!(localhost.hostname(), Some("localhost"));
    assert_eq!(localhost.mac(), Some(MacAddress::new([0x02, 0, 0, 0, 0, 1])));
    assert_eq!(localhost.latency(), Some(Duration::from_millis(2)));
    assert!(results.nodes()[1..].iter().all(|node| node.mac().is_none()));
}

#[tokio::test]
async fn dns_failure_leaves_hostname_unresolved() {
    let address = Ipv4Addr::new(192, 168, 7, 1);
    let ping = LanPing::new([address], Duration::ZERO);
    let scanner = SingleScanner::new(address, query(ping).with_banner(Some(Arc::new(Apache))))
        .with_dispatch(silent_dispatch());

    let results = scanner.query_network(&CancellationToken::new()).await.unwrap();
    let node = &results.nodes()[0];

    assert!(node.is_alive());
    assert_eq!(node.hostname(), None);
    assert_eq!(node.web_server(), Some("Apache/2.4.58"));
}

#[tokio::test]
async fn sequential_engine_never_overlaps_probes() {
    let ping = LanPing::new(subnet(12), Duration::from_millis(2));
    let scanner = SequentialScanner::new(subnet(12), query(ping.clone())).with_dispatch(silent_dispatch());

    scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(ping.peak(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn batched_engine_bounds_overlap_by_batch_count() {
    let addresses = subnet(20);
    let ping = LanPing::new(addresses.iter().copied().filter(|a| a.octets()[3] % 4 == 0), Duration::from_millis(5));
    let scanner = BatchedScanner::new(addresses.clone(), 5, query(ping.clone())).with_dispatch(silent_dispatch());

    let results = scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(partition(&addresses, 5).unwrap().len(), 4);
    assert!(ping.peak() <= 4, "peak overlap was {}", ping.peak());
    assert_eq!(ips(results.nodes()), addresses);
    assert_eq!(results.number_of_alive_nodes(), 5);
    assert_eq!(ping.probes.load(Ordering::SeqCst), 20);
}

#[test]
fn twenty_five_addresses_make_three_batches() {
    let addresses: Vec<Ipv4Addr> = (1..=25).map(|i| Ipv4Addr::new(10, 1, 1, i)).collect();
    let sizes: Vec<usize> = partition(&addresses, 10).unwrap().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![10, 10, 5]);
}

#[tokio::test]
async fn status_events_for_a_batched_scan() {
    let nodes_done = Arc::new(AtomicUsize::new(0));
    let scans = Arc::new(Mutex::new(Vec::new()));
    let ping = LanPing::new(subnet(7), Duration::ZERO);
    let mut scanner = BatchedScanner::new(subnet(7), 3, query(ping)).with_dispatch(silent_dispatch());

    let counter = Arc::clone(&nodes_done);
    scanner.on_node_status(Arc::new(move |status: NodeStatus<'_>| {
        if status.status() == LiveStatus::Completed {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));
    let sink = Arc::clone(&scans);
    scanner.on_scan_status(Arc::new(move |status: ScanStatus<'_>| {
        sink.lock().unwrap().push(status.status());
    }));

    scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(nodes_done.load(Ordering::SeqCst), 7);
    assert_eq!(*scans.lock().unwrap(), vec![LiveStatus::Started, LiveStatus::Completed]);
}

#[tokio::test]
async fn cancelling_a_batched_scan_discards_results() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    let ping = LanPing::new(subnet(50), Duration::from_millis(1));
    let mut scanner = BatchedScanner::new(subnet(50), 5, query(ping.clone())).with_dispatch(silent_dispatch());
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    scanner.on_node_status(Arc::new(move |status: NodeStatus<'_>| {
        if status.status() == LiveStatus::Completed && counter.fetch_add(1, Ordering::SeqCst) == 3 {
            trigger.cancel();
        }
    }));

    assert_eq!(scanner.query_network(&token).await, Err(Cancelled));
    assert!(ping.probes.load(Ordering::SeqCst) < 50);
}

#[tokio::test]
async fn single_host_check_outside_the_plan() {
    let target = Ipv4Addr::new(192, 168, 9, 9);
    let ping = LanPing::new([target], Duration::ZERO);
    let scanner = BatchedScanner::new(subnet(4), 2, query(ping)).with_dispatch(silent_dispatch());

    let node = scanner
        .check_network_node(target, &CancellationToken::new())
        .await
        .unwrap();

    assert!(node.is_alive());
    assert_eq!(node.mac_or_empty(), MacAddress::new([0x02, 0, 0, 0, 0, 9]));
}

/*************************************************************
                   Builder-produced engines
**************************************************************/

#[tokio::test]
async fn built_batched_scan_covers_the_range() {
    let scanner = ScanBuilder::new()
        .with_range(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 5))
        .unwrap()
        .with_max_timeout(Duration::from_millis(200))
        .unwrap()
        .with_parallelism(2)
        .unwrap()
        .with_logging(silent_dispatch())
        .build();

    assert_eq!(scanner.strategy(), ScanStrategy::Batched { batch_size: 2 });

    let results = scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(results.nodes().len(), 5);
    assert_eq!(results.addresses_scanned(), 5);
    assert_eq!(results.start_address(), Some(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(results.end_address(), Some(Ipv4Addr::new(10, 0, 0, 5)));
}

#[tokio::test]
#[ignore = "needs permission to send ICMP"]
async fn loopback_is_alive_on_a_real_scan() {
    let scanner = ScanBuilder::new()
        .with_addresses([Ipv4Addr::LOCALHOST, Ipv4Addr::new(127, 0, 0, 2)])
        .unwrap()
        .with_max_timeout(Duration::from_millis(500))
        .unwrap()
        .with_logging(silent_dispatch())
        .build();

    let results = scanner.query_network(&CancellationToken::new()).await.unwrap();

    assert_eq!(results.nodes().len(), 2);
    assert!(results.nodes()[0].is_alive());
    assert!(results.nodes()[0].latency().is_some());
}
