use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Context;
use colored::*;
use netsweep_common::network::interface;
use netsweep_common::{Cancelled, NodeStatus, ScanResults};
use netsweep_core::ScanBuilder;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::{Dispatch, info, warn};

use crate::commands::CommandLine;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

pub async fn discover(args: &CommandLine, dispatch: Dispatch) -> anyhow::Result<()> {
    let adapter = args
        .interface
        .as_deref()
        .map(interface::find_by_name)
        .transpose()?;

    let builder = args
        .target
        .clone()
        .select(ScanBuilder::new(), adapter.as_ref())
        .with_context(|| format!("cannot scan target '{}'", args.target))?
        .with_max_timeout(Duration::from_millis(args.timeout))?
        .with_max_hops(args.ttl)?;
    let builder = if args.http { builder.with_http_scan() } else { builder };

    let mut scanner = match args.parallel {
        Some(batch_size) => builder.with_parallelism(batch_size)?.with_logging(dispatch).build(),
        None => builder.with_logging(dispatch).build(),
    };

    let total = scanner.addresses().len();
    info!("Probing {total} addresses");

    let done = Arc::new(AtomicUsize::new(0));
    let alive = Arc::new(AtomicUsize::new(0));
    scanner.on_node_status(Arc::new(move |status: NodeStatus<'_>| {
        if let NodeStatus::Completed(node) = status {
            let alive = if node.is_alive() {
                alive.fetch_add(1, Ordering::Relaxed) + 1
            } else {
                alive.load(Ordering::Relaxed)
            };
            let done = done.fetch_add(1, Ordering::Relaxed) + 1;
            spinner::report_progress(done, total, alive);
        }
    }));

    let token = CancellationToken::new();
    let _ctrl_c = AbortOnDropHandle::new(tokio::spawn(cancel_on_ctrl_c(token.clone())));

    spinner::start(total);
    let outcome = scanner.query_network(&token).await;
    spinner::finish();

    match outcome {
        Ok(mut results) => {
            results.sort_by_address();
            discovery_ends(&results, args.all);
        }
        Err(Cancelled) => warn!("Scan cancelled, no results to show"),
    }
    Ok(())
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        token.cancel();
    }
}

fn discovery_ends(results: &ScanResults, show_dead: bool) {
    if results.number_of_alive_nodes() == 0 && !show_dead {
        print::header("zero hosts detected");
        print::no_results();
        print_summary(results);
        return;
    }

    print::header("network discovery");
    let nodes: Vec<_> = results
        .nodes()
        .iter()
        .filter(|node| show_dead || node.is_alive())
        .collect();

    for (idx, node) in nodes.iter().enumerate() {
        print::tree_head(idx, &format::node_title(node));
        print::as_tree_one_level(&format::node_details(node));
        if idx + 1 != nodes.len() {
            mprint!();
        }
    }
    print_summary(results);
}

fn print_summary(results: &ScanResults) {
    let alive = results.number_of_alive_nodes();
    let scanned = results.addresses_scanned();
    let elapsed = format!("{:.2}s", results.elapsed().as_secs_f64());
    let plain = format!("Discovery Complete: {alive} of {scanned} hosts up in {elapsed}");

    let output = format!(
        "Discovery Complete: {} of {} hosts up in {}",
        alive.to_string().bold().green(),
        scanned,
        elapsed.bold().yellow()
    )
    .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string(), plain.chars().count());
}
