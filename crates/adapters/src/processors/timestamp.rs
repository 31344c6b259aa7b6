//! Event timestamps in the configured format.

use chrono::{DateTime, Local, Utc};
use cwlog_config::TimestampFormat;
use cwlog_domain::{EventDict, FieldValue, keys};
use cwlog_ports::{Processor, RecordMeta, Step};
use std::fmt::{self, Write as _};
use std::sync::Arc;

const ISO_UTC: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const ISO_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Adds `timestamp`, captured when the record is processed.
#[derive(Clone)]
pub struct TimeStamper {
    format: TimestampFormat,
    utc: bool,
    clock: Clock,
}

impl TimeStamper {
    /// Stamper reading the system clock.
    #[must_use]
    pub fn new(format: TimestampFormat, utc: bool) -> Self {
        Self {
            format,
            utc,
            clock: Arc::new(Utc::now),
        }
    }

    /// ISO-8601 in UTC.
    #[must_use]
    pub fn iso_utc() -> Self {
        Self::new(TimestampFormat::Iso, true)
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn stamp(&self, now: DateTime<Utc>) -> FieldValue {
        match &self.format {
            TimestampFormat::Iso if self.utc => FieldValue::Text(now.format(ISO_UTC).to_string()),
            TimestampFormat::Iso => {
                FieldValue::Text(now.with_timezone(&Local).format(ISO_LOCAL).to_string())
            },
            TimestampFormat::Unix => FieldValue::Float(unix_seconds(now)),
            TimestampFormat::Custom(pattern) => {
                let rendered = if self.utc {
                    strftime(&now, pattern)
                } else {
                    strftime(&now.with_timezone(&Local), pattern)
                };
                // An unusable pattern still yields a timestamp.
                FieldValue::Text(rendered.unwrap_or_else(|_| now.format(ISO_UTC).to_string()))
            },
        }
    }
}

#[allow(clippy::cast_precision_loss, reason = "microsecond precision fits in f64 for current dates")]
fn unix_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_micros() as f64 / 1_000_000.0
}

fn strftime<Tz>(now: &DateTime<Tz>, pattern: &str) -> Result<String, fmt::Error>
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", now.format(pattern))?;
    Ok(out)
}

impl fmt::Debug for TimeStamper {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TimeStamper")
            .field("format", &self.format)
            .field("utc", &self.utc)
            .finish_non_exhaustive()
    }
}

impl Processor for TimeStamper {
    fn name(&self) -> &'static str {
        "time_stamper"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        event.insert(keys::TIMESTAMP, self.stamp((self.clock)()));
        Step::Continue(event)
    }
}
