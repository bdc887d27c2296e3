use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Instant at which a component version takes effect.
///
/// Stored as milliseconds since the UNIX epoch, UTC. Release files carry the
/// instant as an 8-digit compressed date (`yyyymmdd`), which resolves to
/// midnight UTC of that date.
///
/// Ordering is plain chronological order on the epoch value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectiveTime {
    epoch_ms: i64,
}

impl EffectiveTime {
    /// Create from an explicit epoch-millisecond value.
    pub const fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self { epoch_ms }
    }

    /// Parse an 8-digit compressed date (`yyyymmdd`) as midnight UTC.
    ///
    /// Any other shape, including a syntactically valid but impossible date,
    /// fails with [`TypeError::MalformedTimestamp`].
    pub fn parse_compressed(text: &str) -> Result<Self, TypeError> {
        if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::MalformedTimestamp(text.to_owned()));
        }
        let date = NaiveDate::parse_from_str(text, "%Y%m%d")
            .map_err(|_| TypeError::MalformedTimestamp(text.to_owned()))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| TypeError::MalformedTimestamp(text.to_owned()))?;
        Ok(Self {
            epoch_ms: midnight.and_utc().timestamp_millis(),
        })
    }

    /// The current wall-clock instant.
    pub fn now() -> Self {
        Self {
            epoch_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Milliseconds since the UNIX epoch.
    pub const fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }

    /// The instant as a `chrono` UTC datetime, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.epoch_ms)
    }
}

impl fmt::Debug for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectiveTime({}ms)", self.epoch_ms)
    }
}

impl fmt::Display for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "{}ms", self.epoch_ms),
        }
    }
}
