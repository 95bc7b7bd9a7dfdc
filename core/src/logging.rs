use tracing::{Dispatch, Level};

/// The sink a plan logs to when the caller supplies none: human readable
/// lines on stderr at `INFO` and above.
pub fn console_dispatch() -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    Dispatch::new(subscriber)
}

/// A sink that drops everything.
pub fn silent_dispatch() -> Dispatch {
    Dispatch::none()
}
