//! Snowflake ID - Discord-compatible 64-bit identifier
//!
//! Message identifiers are snowflakes, so their numeric order is their
//! creation order. The client relies on that to keep a per-channel
//! watermark of the newest message already delivered.

use std::fmt;

/// Discord-compatible Snowflake ID (64-bit, unsigned on the wire)
///
/// The zero value doubles as "none seen" for channel watermarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(u64);

impl Snowflake {
    /// The "nothing seen yet" value
    pub const NONE: Self = Self(0);

    /// Create a new Snowflake from a raw value
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    #[inline]
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Check if the Snowflake is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<u64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }

    /// Parse an optional wire value, treating absence and garbage alike
    pub fn parse_opt(s: Option<&str>) -> Option<Self> {
        s.and_then(|s| Self::parse(s).ok())
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
