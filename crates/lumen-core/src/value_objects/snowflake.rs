//! Snowflake ID - 64-bit time-ordered unique identifier
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 64-bit time-ordered identifier for accounts, chats, messages, and content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2023-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_672_531_200_000;

    /// Create a new Snowflake from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if the Snowflake is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    /// Convert the embedded timestamp to `DateTime<Utc>`
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        use chrono::{DateTime, TimeZone, Utc};
        Utc.timestamp_millis_opt(self.timestamp())
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Parse from string representation
    ///
    /// A malformed id is a caller error (maps to the BadRequest class).
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
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

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnowflakeVisitor;

        impl serde::de::Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a snowflake id as string or integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Snowflake::parse(v).map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Snowflake::new(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Snowflake::new(v as i64))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Thread-safe Snowflake generator
///
/// Packs the last-issued timestamp and sequence into a single atomic so
/// concurrent sends never hand out duplicate ids.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    worker_id: i64,
    // Upper bits: last timestamp offset; lower 12 bits: sequence
    state: AtomicI64,
}

impl SnowflakeGenerator {
    const WORKER_BITS: u8 = 10;
    const SEQUENCE_BITS: u8 = 12;
    const MAX_WORKER_ID: u16 = (1 << Self::WORKER_BITS) - 1;
    const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Create a generator for the given worker (0-1023, wrapped if larger)
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: i64::from(worker_id & Self::MAX_WORKER_ID),
            state: AtomicI64::new(0),
        }
    }

    /// Generate the next unique id
    pub fn generate(&self) -> Snowflake {
        loop {
            let now = Self::now_offset();
            let state = self.state.load(Ordering::Acquire);
            let (last_ts, seq) = (state >> Self::SEQUENCE_BITS, state & Self::SEQUENCE_MASK);

            let (ts, next_seq) = if now > last_ts {
                (now, 0)
            } else if seq < Self::SEQUENCE_MASK {
                (last_ts, seq + 1)
            } else {
                // Sequence exhausted within this millisecond; spin to the next
                std::hint::spin_loop();
                continue;
            };

            let next_state = (ts << Self::SEQUENCE_BITS) | next_seq;
            if self
                .state
                .compare_exchange(state, next_state, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let raw = (ts << (Self::WORKER_BITS + Self::SEQUENCE_BITS))
                    | (self.worker_id << Self::SEQUENCE_BITS)
                    | next_seq;
                return Snowflake::new(raw);
            }
        }
    }

    fn now_offset() -> i64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        (millis - Snowflake::EPOCH).max(0)
    }
}
