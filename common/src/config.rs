use std::time::Duration;

use crate::error::ScanError;

/// Timeout applied to every probe when the plan does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_000);
/// Upper bound accepted for the per-probe timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_millis(20_000);
pub const DEFAULT_TTL: u8 = 64;
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// How many batches the batched engine lets run at the same time.
pub const MAX_CONCURRENT_BATCHES: usize = 256;

/// Per-probe settings, frozen once the plan is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    ttl: u8,
    timeout: Duration,
}

impl QueryOptions {
    pub fn new(ttl: u8, timeout: Duration) -> Result<Self, ScanError> {
        Ok(Self {
            ttl: validate_ttl(ttl)?,
            timeout: validate_timeout(timeout)?,
        })
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Accepts timeouts in `(0, 20s]`.
pub fn validate_timeout(timeout: Duration) -> Result<Duration, ScanError> {
    if timeout.is_zero() || timeout > MAX_TIMEOUT {
        return Err(ScanError::InvalidTimeout(timeout));
    }
    Ok(timeout)
}

pub fn validate_ttl(ttl: u8) -> Result<u8, ScanError> {
    if ttl == 0 {
        return Err(ScanError::InvalidHops(ttl));
    }
    Ok(ttl)
}

pub fn validate_batch_size(batch_size: usize) -> Result<usize, ScanError> {
    if batch_size == 0 {
        return Err(ScanError::InvalidBatchSize(batch_size));
    }
    Ok(batch_size)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
