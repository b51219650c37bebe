//! Schedule lookup
//!
//! Piecewise time-of-day lookups for basal rate and insulin sensitivity.
//! Schedules are sets of (offset-in-minutes-since-midnight, value) entries;
//! the active entry is the last one whose offset is at or before the query
//! offset, wrapping to the final entry for times past the last offset.

use crate::types::{round3, BasalEntry, IsfSchedule};
use chrono::{DateTime, Timelike, Utc};
use tracing::warn;

/// Cached active-interval bounds from the previous ISF lookup.
///
/// Valid only because the categorizer queries at monotonically advancing
/// times within a day; a query inside `[offset, end_offset)` skips the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsfMemo {
    pub offset: u32,
    pub end_offset: u32,
    pub sensitivity: f64,
}

fn minutes_of_day(at: DateTime<Utc>) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Basal rate (U/hr) at the provided time of day, rounded to 3 decimals.
///
/// A final entry with a rate of exactly 0 signals a malformed schedule:
/// logged, and `None` is returned rather than 0.
pub fn basal_lookup(schedule: &[BasalEntry], at: DateTime<Utc>) -> Option<f64> {
    let mut entries: Vec<&BasalEntry> = schedule.iter().collect();
    entries.sort_by_key(|e| e.minutes);

    let last = match entries.last() {
        Some(e) => e,
        None => {
            warn!("empty basal schedule");
            return None;
        }
    };
    if last.rate == 0.0 {
        warn!("bad basal schedule: final entry has zero rate");
        return None;
    }

    let now = minutes_of_day(at);
    let mut rate = last.rate;
    for pair in entries.windows(2) {
        if now >= pair[0].minutes && now < pair[1].minutes {
            rate = pair[0].rate;
            break;
        }
    }
    Some(round3(rate))
}

/// Insulin sensitivity (mg/dL per U) at the provided time of day.
///
/// Returns the sensitivity and the memo for the next call. A schedule that
/// does not cover offset 0 is malformed: logged, and `None` is returned for
/// the sensitivity while the memo passes through unchanged.
pub fn isf_lookup(
    schedule: &IsfSchedule,
    at: DateTime<Utc>,
    memo: Option<IsfMemo>,
) -> (Option<f64>, Option<IsfMemo>) {
    let now = minutes_of_day(at);

    if let Some(m) = memo {
        if now >= m.offset && now < m.end_offset {
            return (Some(m.sensitivity), memo);
        }
    }

    let mut entries: Vec<&crate::types::IsfEntry> = schedule.sensitivities.iter().collect();
    entries.sort_by_key(|e| e.offset);

    let first = match entries.first() {
        Some(e) => e,
        None => {
            warn!("empty ISF schedule");
            return (None, memo);
        }
    };
    if first.offset != 0 {
        warn!("ISF schedule does not cover offset 0");
        return (None, memo);
    }

    // default to the final entry, which covers times past the last offset
    let mut active = *entries.last().unwrap_or(first);
    let mut end_offset = 1440;
    for pair in entries.windows(2) {
        if now >= pair[0].offset && now < pair[1].offset {
            active = pair[0];
            end_offset = pair[1].offset;
            break;
        }
    }

    let memo = IsfMemo {
        offset: active.offset,
        end_offset,
        sensitivity: active.sensitivity,
    };
    (Some(active.sensitivity), Some(memo))
}
