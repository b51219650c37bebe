//! Category rebalancer
//!
//! Sensitivity tuning downstream needs each collection to carry enough
//! samples to be statistically meaningful. When unannounced-meal (UAM)
//! deviations crowd out the basal or ISF collections, or carb absorption
//! swallows most of the day, this pass reassigns deviations between
//! collections. Rules are evaluated as an exclusive chain, in order.

use crate::categorize::CategorizerOutput;
use crate::types::Bucket;
use tracing::{debug, warn};

/// Merge, sort ascending by deviation, and keep the lower half. Dropping
/// the high-deviation half keeps the merged collection from dragging the
/// tuned value upward.
fn keep_lowest_half(mut merged: Vec<Bucket>) -> Vec<Bucket> {
    merged.sort_by(|a, b| {
        let da = a.deviation.unwrap_or(0.0);
        let db = b.deviation.unwrap_or(0.0);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    let keep = merged.len() / 2;
    merged.truncate(keep);
    merged
}

/// Rebalance the categorized collections.
///
/// UAM deviations that no rule claims stay in the UAM collection rather
/// than being dropped.
pub fn rebalance(mut data: CategorizerOutput, uam_as_basal: bool) -> CategorizerOutput {
    let csf_n = data.csf.len();
    let basal_n = data.basal.len();
    let isf_n = data.isf.len();
    let uam_n = data.uam.len();

    if uam_as_basal || csf_n > 12 {
        if !data.uam.is_empty() {
            debug!(
                csf = csf_n,
                uam = uam_n,
                "treating unannounced-meal deviations as basal"
            );
        }
        data.basal.append(&mut data.uam);
    } else if 2 * basal_n < uam_n {
        warn!(
            basal = basal_n,
            uam = uam_n,
            "too few basal deviations; merging unannounced-meal data into basal"
        );
        let mut merged = std::mem::take(&mut data.basal);
        merged.append(&mut data.uam);
        data.basal = keep_lowest_half(merged);
    } else if 2 * isf_n < uam_n && isf_n < 10 {
        warn!(
            isf = isf_n,
            uam = uam_n,
            "too few ISF deviations; merging unannounced-meal data into ISF"
        );
        let mut merged = std::mem::take(&mut data.isf);
        merged.append(&mut data.uam);
        data.isf = keep_lowest_half(merged);
    }

    // re-read lengths: the UAM rules above may have changed them
    let basal_n = data.basal.len();
    let isf_n = data.isf.len();
    let csf_n = data.csf.len();
    if 4 * basal_n + isf_n < csf_n && isf_n < 10 {
        warn!(
            csf = csf_n,
            isf = isf_n,
            "too many deviations categorized as carb absorption; reassigning to ISF"
        );
        data.isf.append(&mut data.csf);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn buckets(start_index: i64, deviations: &[f64]) -> Vec<Bucket> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        deviations
            .iter()
            .enumerate()
            .map(|(k, &dev)| {
                let mut b = Bucket::new(
                    t0 + Duration::minutes(5 * (start_index + k as i64)),
                    120.0,
                );
                b.deviation = Some(dev);
                b
            })
            .collect()
    }

    fn output(csf: &[f64], isf: &[f64], uam: &[f64], basal: &[f64]) -> CategorizerOutput {
        CategorizerOutput {
            csf: buckets(0, csf),
            isf: buckets(100, isf),
            uam: buckets(200, uam),
            basal: buckets(300, basal),
            cr_data: Vec::new(),
        }
    }

    #[test]
    fn test_flag_moves_uam_to_basal_wholesale() {
        let data = output(&[], &[1.0; 12], &[3.0; 5], &[0.5; 3]);
        let out = rebalance(data, true);
        assert_eq!(out.basal.len(), 8);
        assert!(out.uam.is_empty());
    }

    #[test]
    fn test_long_csf_run_moves_uam_to_basal() {
        let data = output(&[2.0; 13], &[1.0; 12], &[3.0; 5], &[0.5; 3]);
        let out = rebalance(data, false);
        assert_eq!(out.basal.len(), 8);
        assert!(out.uam.is_empty());
        assert_eq!(out.csf.len(), 13);
    }

    #[test]
    fn test_uam_merged_into_sparse_basal_keeps_lowest_half() {
        let data = output(
            &[],
            &[1.0; 12],
            &[-3.0, -2.0, -1.0, 0.0, 1.0, 2.0],
            &[5.0, 6.0],
        );
        let out = rebalance(data, false);
        assert!(out.uam.is_empty());
        assert_eq!(out.basal.len(), 4);
        for b in &out.basal {
            assert!(b.deviation.unwrap() <= 0.0, "high-deviation bucket kept");
        }
    }

    #[test]
    fn test_uam_merged_into_sparse_isf() {
        // basal is plentiful so the basal rule does not fire
        let data = output(
            &[],
            &[4.0],
            &[-2.0, -1.0, 0.0, 1.0, 2.0, 3.0],
            &[0.5; 10],
        );
        let out = rebalance(data, false);
        assert!(out.uam.is_empty());
        assert_eq!(out.basal.len(), 10);
        // 1 ISF + 6 UAM merged, lower half kept
        assert_eq!(out.isf.len(), 3);
        for b in &out.isf {
            assert!(b.deviation.unwrap() <= 0.0);
        }
    }

    #[test]
    fn test_unclaimed_uam_is_retained() {
        let data = output(&[], &[1.0; 10], &[3.0; 3], &[0.5; 10]);
        let out = rebalance(data, false);
        assert_eq!(out.uam.len(), 3);
        assert_eq!(out.basal.len(), 10);
        assert_eq!(out.isf.len(), 10);
    }

    #[test]
    fn test_dominant_csf_reassigned_to_isf() {
        let data = output(&[2.0; 10], &[1.0, 1.5], &[], &[0.5]);
        let out = rebalance(data, false);
        assert!(out.csf.is_empty());
        assert_eq!(out.isf.len(), 12);
    }

    #[test]
    fn test_plentiful_isf_blocks_csf_reassignment() {
        let data = output(&[2.0; 60], &[1.0; 10], &[], &[0.5]);
        let out = rebalance(data, false);
        assert_eq!(out.csf.len(), 60);
        assert_eq!(out.isf.len(), 10);
    }
}
