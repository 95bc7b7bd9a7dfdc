//! Staged construction of a scan plan.
//!
//! Configuration runs through four stages, each a distinct type, so an
//! out-of-order call does not compile:
//!
//! ```text
//! ScanBuilder<AddressStage>
//!   └─ with_range / with_subnet / with_interface / with_addresses / with_address
//!        ScanBuilder<OptionsStage>     with_http_scan, with_max_timeout, with_max_hops
//!          ├─ with_parallelism ──► ScanBuilder<LoggingStage>
//!          └─ with_logging ──────► ScanBuilder<ReadyStage>
//! ```
//!
//! `build` is available from the options stage onwards. Every selector
//! validates immediately, so a bad input fails before any packet is sent.
//!
//! ```no_run
//! # use std::net::Ipv4Addr;
//! # use std::time::Duration;
//! # use netsweep_core::ScanBuilder;
//! # fn main() -> Result<(), netsweep_common::ScanError> {
//! let scanner = ScanBuilder::new()
//!     .with_range(Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 254))?
//!     .with_max_timeout(Duration::from_millis(500))?
//!     .with_parallelism(16)?
//!     .build();
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use netsweep_common::config::{validate_batch_size, validate_timeout, validate_ttl};
use netsweep_common::network::{interface, range};
use netsweep_common::{QueryOptions, ScanError};
use pnet::datalink::NetworkInterface;
use tracing::Dispatch;

use crate::logging::console_dispatch;
use crate::probe::{
    BannerProbe, DefaultHttpClientFactory, HttpBanner, HttpClientFactory, IcmpPing, ReverseDns,
    SessionMode, platform_mac_resolver,
};
use crate::query::NodeQuery;
use crate::scanner::{BatchedScanner, NetworkScanner, SequentialScanner, SingleScanner};

/// Nothing chosen yet; an address source comes first.
pub struct AddressStage;
/// Addresses chosen; probe options may follow.
pub struct OptionsStage;
/// Concurrency chosen; only logging remains.
pub struct LoggingStage;
/// Fully configured.
pub struct ReadyStage;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::AddressStage {}
    impl Sealed for super::OptionsStage {}
    impl Sealed for super::LoggingStage {}
    impl Sealed for super::ReadyStage {}
}

/// Stages that accept (or re-select) an address source.
pub trait SelectsAddresses: sealed::Sealed {}
impl SelectsAddresses for AddressStage {}
impl SelectsAddresses for OptionsStage {}

/// Stages with enough configuration to build.
pub trait Buildable: sealed::Sealed {}
impl Buildable for OptionsStage {}
impl Buildable for LoggingStage {}
impl Buildable for ReadyStage {}

/// Stages that still accept a log sink.
pub trait AcceptsLogging: sealed::Sealed {}
impl AcceptsLogging for OptionsStage {}
impl AcceptsLogging for LoggingStage {}

struct Draft {
    addresses: Vec<Ipv4Addr>,
    options: QueryOptions,
    http: Option<Arc<dyn HttpClientFactory>>,
    batch_size: Option<usize>,
    dispatch: Option<Dispatch>,
}

pub struct ScanBuilder<S> {
    draft: Draft,
    _stage: PhantomData<S>,
}

impl Default for ScanBuilder<AddressStage> {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanBuilder<AddressStage> {
    pub fn new() -> Self {
        Self {
            draft: Draft {
                addresses: Vec::new(),
                options: QueryOptions::default(),
                http: None,
                batch_size: None,
                dispatch: None,
            },
            _stage: PhantomData,
        }
    }
}

impl<S> ScanBuilder<S> {
    fn into_stage<T>(self) -> ScanBuilder<T> {
        ScanBuilder {
            draft: self.draft,
            _stage: PhantomData,
        }
    }

    pub fn addresses(&self) -> &[Ipv4Addr] {
        &self.draft.addresses
    }

    pub fn options(&self) -> QueryOptions {
        self.draft.options
    }
}

impl<S: SelectsAddresses> ScanBuilder<S> {
    fn select(mut self, addresses: Vec<Ipv4Addr>) -> ScanBuilder<OptionsStage> {
        self.draft.addresses = addresses;
        self.into_stage()
    }

    /// Scans `begin..=end`. Both ends must share their first two octets.
    pub fn with_range(
        self,
        begin: Ipv4Addr,
        end: Ipv4Addr,
    ) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        let addresses = range::from_range(begin, end)?;
        Ok(self.select(addresses))
    }

    /// Scans every host of the subnet `ip`/`mask` (at least /16).
    pub fn with_subnet(
        self,
        ip: Ipv4Addr,
        mask: Ipv4Addr,
    ) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        let addresses = range::from_subnet(ip, mask)?;
        Ok(self.select(addresses))
    }

    /// Scans the subnet of `interface`, or of the best LAN adapter when
    /// `None`.
    pub fn with_interface(
        self,
        interface: Option<&NetworkInterface>,
    ) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        let addresses = match interface {
            Some(interface) => range::from_interface(interface)?,
            None => range::from_interface(&interface::default_interface()?)?,
        };
        Ok(self.select(addresses))
    }

    /// Scans exactly the given addresses, in the given order.
    pub fn with_addresses(
        self,
        addresses: impl IntoIterator<Item = Ipv4Addr>,
    ) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        let addresses: Vec<Ipv4Addr> = addresses.into_iter().collect();
        if addresses.is_empty() {
            return Err(ScanError::NoAddresses);
        }
        if let Some(&bad) = addresses.iter().find(|address| !is_probeable(address)) {
            return Err(ScanError::InvalidAddress(bad));
        }
        Ok(self.select(addresses))
    }

    pub fn with_address(self, address: Ipv4Addr) -> Result<ScanBuilder<OptionsStage>, ScanError> {
        self.with_addresses([address])
    }
}

fn is_probeable(address: &Ipv4Addr) -> bool {
    !address.is_unspecified() && !address.is_broadcast()
}

impl ScanBuilder<OptionsStage> {
    /// Also reads the HTTP `Server` banner of live hosts.
    pub fn with_http_scan(self) -> Self {
        self.with_http_scan_using(DefaultHttpClientFactory)
    }

    /// Like [`with_http_scan`](Self::with_http_scan), with caller-built clients.
    pub fn with_http_scan_using(mut self, factory: impl HttpClientFactory + 'static) -> Self {
        self.draft.http = Some(Arc::new(factory));
        self
    }

    /// Per-probe timeout; must be in `(0, 20s]`.
    pub fn with_max_timeout(mut self, timeout: Duration) -> Result<Self, ScanError> {
        let timeout = validate_timeout(timeout)?;
        self.draft.options = QueryOptions::new(self.draft.options.ttl(), timeout)?;
        Ok(self)
    }

    /// TTL of outgoing echo requests; must be at least 1.
    pub fn with_max_hops(mut self, ttl: u8) -> Result<Self, ScanError> {
        let ttl = validate_ttl(ttl)?;
        self.draft.options = QueryOptions::new(ttl, self.draft.options.timeout())?;
        Ok(self)
    }

    /// Switches the plan to the batched engine with `batch_size` addresses
    /// per batch.
    pub fn with_parallelism(
        mut self,
        batch_size: usize,
    ) -> Result<ScanBuilder<LoggingStage>, ScanError> {
        self.draft.batch_size = Some(validate_batch_size(batch_size)?);
        Ok(self.into_stage())
    }
}

impl<S: AcceptsLogging> ScanBuilder<S> {
    /// Sends the plan's logs to `sink`: any `tracing` subscriber or an
    /// existing [`Dispatch`].
    pub fn with_logging(mut self, sink: impl Into<Dispatch>) -> ScanBuilder<ReadyStage> {
        self.draft.dispatch = Some(sink.into());
        self.into_stage()
    }

    pub fn with_logging_from(self, factory: impl FnOnce() -> Dispatch) -> ScanBuilder<ReadyStage> {
        self.with_logging(factory())
    }
}

impl<S: Buildable> ScanBuilder<S> {
    /// Assembles the probes and returns the engine matching the plan: the
    /// single engine for one address, the batched engine when parallelism
    /// was requested, otherwise the sequential engine.
    pub fn build(self) -> Box<dyn NetworkScanner> {
        let Draft {
            addresses,
            options,
            http,
            batch_size,
            dispatch,
        } = self.draft;

        let mode = match batch_size {
            Some(_) if addresses.len() > 1 => SessionMode::PerProbe,
            _ => SessionMode::Shared,
        };
        let banner = http.map(|factory| {
            Arc::new(HttpBanner::new(factory, options.timeout(), mode)) as Arc<dyn BannerProbe>
        });
        let query = NodeQuery::new(
            options,
            Arc::new(IcmpPing::new(options, mode)),
            platform_mac_resolver(),
            Arc::new(ReverseDns::new(options.timeout())),
        )
        .with_banner(banner);
        let dispatch = dispatch.unwrap_or_else(console_dispatch);

        let single = match addresses.as_slice() {
            &[address] => Some(address),
            _ => None,
        };

        match (single, batch_size) {
            (Some(address), _) => Box::new(SingleScanner::new(address, query).with_dispatch(dispatch)),
            (None, Some(batch_size)) => Box::new(
                BatchedScanner::new(addresses, batch_size, query).with_dispatch(dispatch),
            ),
            (None, None) => Box::new(SequentialScanner::new(addresses, query).with_dispatch(dispatch)),
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
