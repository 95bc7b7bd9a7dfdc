pub mod discover;
pub mod interfaces;

use clap::Parser;
use netsweep_common::config::DEFAULT_TTL;

use crate::target::Target;

#[derive(Parser, Debug)]
#[command(name = "netsweep", version)]
#[command(about = "Discover live hosts on an IPv4 network.")]
pub struct CommandLine {
    /// Address, range (10.0.0.1-50), subnet (10.0.0.0/24), comma separated list, or `lan`
    #[arg(default_value = "lan")]
    pub target: Target,

    /// Adapter whose subnet a `lan` target scans
    #[arg(short, long, value_name = "NAME")]
    pub interface: Option<String>,

    /// Per-probe timeout in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = 1000)]
    pub timeout: u64,

    /// TTL of the echo requests
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TTL)]
    pub ttl: u8,

    /// Scan in concurrent batches of N addresses (default 10)
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "10"
    )]
    pub parallel: Option<usize>,

    /// Read the HTTP server banner of live hosts
    #[arg(long)]
    pub http: bool,

    /// Also list addresses that did not answer
    #[arg(short, long)]
    pub all: bool,

    /// Show the IPv4 addresses of every adapter and exit
    #[arg(short = 'l', long)]
    pub list_interfaces: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
