//! Glucose bucketizer
//!
//! Converts an irregular glucose sample stream into a uniform, strictly
//! time-ordered (newest-first) sequence of ~5-minute buckets. Samples less
//! than 2 minutes from the first sample of the current bucket are averaged
//! into it; a gap of 2 minutes or more starts a new bucket. Larger gaps are
//! not interpolated: they simply produce no buckets in that span.

use crate::ingest::{resolve_samples, GlucoseSample, RawGlucoseRecord};
use crate::types::Bucket;

/// Bucketize raw journal records: resolve timestamps, drop invalid values,
/// and merge into buckets.
pub fn bucketize(records: &[RawGlucoseRecord]) -> Vec<Bucket> {
    bucketize_samples(resolve_samples(records))
}

/// Bucketize already-resolved samples.
pub fn bucketize_samples(mut samples: Vec<GlucoseSample>) -> Vec<Bucket> {
    samples.sort_by(|a, b| b.time.cmp(&a.time));

    let mut buckets: Vec<Bucket> = Vec::new();
    let first = match samples.first() {
        Some(s) => s,
        None => return buckets,
    };
    buckets.push(Bucket::new(first.time, first.glucose));

    // k is the index of the first sample merged into the current bucket;
    // the merge deadband is anchored there, not at the latest sample
    let mut k = 0;
    for i in 1..samples.len() {
        let elapsed_minutes =
            (samples[i].time - samples[k].time).num_milliseconds() as f64 / 60_000.0;
        if elapsed_minutes.abs() >= 2.0 {
            k = i;
            buckets.push(Bucket::new(samples[i].time, samples[i].glucose));
        } else {
            let total: f64 = samples[k..=i].iter().map(|s| s.glucose).sum();
            if let Some(current) = buckets.last_mut() {
                current.glucose = total / (i - k + 1) as f64;
            }
        }
    }
    buckets
}
