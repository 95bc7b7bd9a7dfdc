use colored::*;
use netsweep_common::network::interface;
use netsweep_common::network::range::{self, InterfaceAddress};

use crate::terminal::{colors, print};

/// Prints every IPv4 address of every adapter that is up, and which adapter
/// a `lan` scan would pick.
pub fn list_interfaces() {
    print::header("network interfaces");

    let addresses: Vec<InterfaceAddress> = range::from_all_interfaces();
    if addresses.is_empty() {
        print::print(&"No adapter with an IPv4 address is up.".red().to_string());
        return;
    }

    let key_width = addresses.iter().map(|a| a.name.chars().count()).max().unwrap_or(0);
    for entry in &addresses {
        let value = format!(
            "{} {}",
            entry.address.to_string().color(colors::IPV4_ADDR),
            format!("mask {}", entry.netmask).dimmed()
        );
        print::aligned_line(&entry.name, key_width, value.normal());
    }

    match interface::default_interface() {
        Ok(adapter) => print::aligned_line("default", key_width, adapter.name.bold()),
        Err(err) => print::aligned_line("default", key_width, err.to_string().yellow()),
    }
}
