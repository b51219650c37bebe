//! Insulin-dosed aggregator
//!
//! Sums explicit insulin doses inside a carb-ratio window. Only treatments
//! carrying an `insulin` amount count; temp-basal records without one are
//! ignored here (their effect is already folded into IOB).

use crate::types::{round3, Treatment};
use chrono::{DateTime, Utc};

/// Total insulin dosed in the half-open interval `(start, end]`, rounded to
/// 3 decimals. A treatment exactly at `start` belongs to the previous
/// window; one exactly at `end` belongs to this one.
pub fn insulin_dosed(treatments: &[Treatment], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let mut total = 0.0;
    for treatment in treatments {
        if let Some(insulin) = treatment.insulin {
            if treatment.timestamp > start && treatment.timestamp <= end {
                total += insulin;
            }
        }
    }
    round3(total)
}
