use std::time::Duration;

use colored::*;
use netsweep_common::NetworkNode;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Tree heading for a node: its hostname, or its address when it has none.
pub fn node_title(node: &NetworkNode) -> ColoredString {
    match (node.is_alive(), node.hostname()) {
        (false, _) => format!("{} (down)", node.ip()).color(colors::DOWN),
        (true, Some(hostname)) => hostname.color(colors::PRIMARY),
        (true, None) => "No hostname".color(colors::PRIMARY),
    }
}

pub fn node_details(node: &NetworkNode) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("IPv4"),
        node.ip().to_string().color(colors::IPV4_ADDR),
    )];

    if let Some(mac) = node.mac() {
        details.push((String::from("MAC"), mac.to_string().color(colors::MAC_ADDR)));
    }

    if let Some(server) = node.web_server() {
        details.push((String::from("HTTP"), server.normal()));
    }

    match node.latency() {
        Some(latency) => details.push((String::from("RTT"), duration(latency).normal())),
        None => details.push((String::from("Query"), duration(node.query_time()).dimmed())),
    }

    details
}

pub fn duration(value: Duration) -> String {
    let millis = value.as_secs_f64() * 1000.0;
    if millis < 1000.0 {
        format!("{millis:.2}ms")
    } else {
        format!("{:.2}s", value.as_secs_f64())
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
