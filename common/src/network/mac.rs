use std::fmt;
use std::str::FromStr;

use pnet::util::MacAddr;
use thiserror::Error;

const MAC_STR_LEN: usize = 17;

/// A 6-byte hardware address.
///
/// Formats as upper-case hex pairs joined by `:`. [`MacAddress::EMPTY`] is
/// the all-zero sentinel used by consumers that cannot deal with an absent
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress([u8; 6]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MacParseError {
    #[error("MAC address '{0}' must be 17 characters long")]
    InvalidLength(String),
    #[error("MAC address '{0}' must be six colon separated hex pairs")]
    InvalidFormat(String),
    #[error("MAC address requires exactly 6 bytes, got {0}")]
    InvalidByteCount(usize),
}

impl MacAddress {
    pub const EMPTY: MacAddress = MacAddress([0; 6]);

    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Lenient parser for tool output such as `0:1c:42:a:0:18` or
    /// `00-1C-42-0A-00-18`: each segment is one or two hex digits.
    pub fn parse_lenient(s: &str) -> Result<Self, MacParseError> {
        let invalid = || MacParseError::InvalidFormat(s.to_string());
        let segments: Vec<&str> = s.trim().split([':', '-']).collect();
        if segments.len() != 6 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 6];
        for (byte, segment) in bytes.iter_mut().zip(segments) {
            if segment.is_empty() || segment.len() > 2 || !is_hex(segment) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(segment, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Parses the canonical `AA:BB:CC:DD:EE:FF` form (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != MAC_STR_LEN {
            return Err(MacParseError::InvalidLength(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (idx, pair) in s.split(':').enumerate() {
            if idx >= 6 || pair.len() != 2 || !is_hex(pair) {
                return Err(MacParseError::InvalidFormat(s.to_string()));
            }
            bytes[idx] = u8::from_str_radix(pair, 16)
                .map_err(|_| MacParseError::InvalidFormat(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for MacAddress {
    type Error = MacParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 6] = bytes
            .try_into()
            .map_err(|_| MacParseError::InvalidByteCount(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl From<MacAddr> for MacAddress {
    fn from(mac: MacAddr) -> Self {
        Self([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
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
