mod commands;
mod target;
mod terminal;

use commands::{CommandLine, discover, interfaces};
use terminal::logging;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();
    let dispatch = logging::init_logging()?;

    if args.list_interfaces {
        interfaces::list_interfaces();
        return Ok(());
    }

    if !is_root::is_root() {
        warn!("Not running as root, ICMP echo may be refused and every host reported down");
    }

    discover::discover(&args, dispatch).await
}
