//! Raw glucose record ingestion
//!
//! Journal stores report glucose under several shapes: the value may arrive
//! as `glucose` or `sgv`, and the timestamp as an epoch-millisecond `date`,
//! an RFC3339 `dateString`, or a zone-less `displayTime`. This module
//! resolves those into a uniform `GlucoseSample`; the first resolvable
//! timestamp field wins.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Minimum accepted glucose value (mg/dL); lower readings are sensor noise
/// or error codes.
pub const MIN_GLUCOSE: f64 = 39.0;

/// A raw glucose record as reported by a journal store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGlucoseRecord {
    /// Glucose value (mg/dL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose: Option<f64>,
    /// Alternate glucose field used by some stores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sgv: Option<f64>,
    /// Epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    /// RFC3339 timestamp
    #[serde(rename = "dateString", skip_serializing_if = "Option::is_none")]
    pub date_string: Option<String>,
    /// Zone-less display timestamp
    #[serde(rename = "displayTime", skip_serializing_if = "Option::is_none")]
    pub display_time: Option<String>,
}

/// A resolved, accepted glucose sample. Immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseSample {
    pub time: DateTime<Utc>,
    pub glucose: f64,
}

impl RawGlucoseRecord {
    /// Resolve the record into a sample, or `None` if no timestamp field is
    /// usable or the glucose value is missing or below `MIN_GLUCOSE`.
    pub fn resolve(&self) -> Option<GlucoseSample> {
        let glucose = self.glucose.or(self.sgv)?;
        if glucose < MIN_GLUCOSE {
            return None;
        }
        let time = self.resolve_time()?;
        Some(GlucoseSample { time, glucose })
    }

    fn resolve_time(&self) -> Option<DateTime<Utc>> {
        if let Some(ms) = self.date {
            if let Some(t) = Utc.timestamp_millis_opt(ms).single() {
                return Some(t);
            }
        }
        if let Some(s) = &self.display_time {
            if let Some(t) = parse_timestamp(s) {
                return Some(t);
            }
        }
        if let Some(s) = &self.date_string {
            if let Some(t) = parse_timestamp(s) {
                return Some(t);
            }
        }
        None
    }
}

/// Parse an RFC3339 timestamp, falling back to a zone-less form.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc())
}

/// Resolve a batch of raw records, dropping anything unusable.
pub fn resolve_samples(records: &[RawGlucoseRecord]) -> Vec<GlucoseSample> {
    records.iter().filter_map(RawGlucoseRecord::resolve).collect()
}
