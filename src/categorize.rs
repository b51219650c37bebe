//! Deviation categorizer
//!
//! The central state machine: walks the bucketed glucose trace in
//! chronological order (the bucket array is newest-first; iteration runs
//! from index `len-5` down to `1`), computing per-bucket insulin impact
//! (BGI) and deviation from expected basal-only movement, absorbing
//! announced carbs, tracking carb-ratio calibration windows, and assigning
//! each bucket to one of {CSF, UAM, ISF, basal}.
//!
//! Ordering is load-bearing: the meal-COB accumulator, the absorption and
//! UAM hysteresis flags, and the open carb-ratio window only carry forward
//! correctly when buckets and treatments are visited in time order.

use crate::iob::{iob_total, IobInput};
use crate::schedule::{basal_lookup, isf_lookup, IsfMemo};
use crate::types::{
    round2, round3, AbsorptionMarker, Bucket, Category, CrDatum, Profile, Treatment,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace, warn};

/// Inputs for one categorization pass.
///
/// `buckets` must be newest-first as produced by the bucketizer. Treatments
/// may arrive in any order; a cursor over a sorted copy replaces the
/// destructive consumption of earlier designs, so the caller's slice is
/// never mutated and each treatment is still attributed exactly once.
pub struct CategorizerInput<'a> {
    pub buckets: &'a [Bucket],
    pub treatments: &'a [Treatment],
    pub profile: &'a Profile,
}

/// The four per-bucket collections plus raw carb-ratio windows, before
/// rebalancing. Every classified bucket appears in exactly one collection.
#[derive(Debug, Default)]
pub struct CategorizerOutput {
    pub csf: Vec<Bucket>,
    pub isf: Vec<Bucket>,
    pub uam: Vec<Bucket>,
    pub basal: Vec<Bucket>,
    pub cr_data: Vec<CrDatum>,
}

/// Initial values captured when a carb-ratio window opens
#[derive(Debug, Clone, Copy)]
struct CrStart {
    iob: f64,
    bg: f64,
    time: DateTime<Utc>,
}

/// All mutable state threaded through the bucket walk. Scoped to one
/// categorization call; nothing survives across invocations.
#[derive(Debug, Default)]
struct CategorizeCtx {
    /// Unabsorbed announced carbs (grams); never negative
    meal_cob: f64,
    /// Running announced-carb total for the current absorption run
    meal_carbs: f64,
    /// Carb-absorption hysteresis: positive deviations with meal-scale IOB
    absorbing: bool,
    /// Unannounced-meal hysteresis: tracks the sign of deviation
    uam: bool,
    calculating_cr: bool,
    cr_carbs: f64,
    cr_start: Option<CrStart>,
    isf_memo: Option<IsfMemo>,
    last_category: Option<Category>,
    isf_warned: bool,
}

/// Categorize the bucketed trace.
///
/// Returns an empty output when there are no treatments or fewer than six
/// buckets; callers must treat that as insufficient data.
pub fn categorize(input: &CategorizerInput<'_>) -> CategorizerOutput {
    let mut out = CategorizerOutput::default();
    let buckets = input.buckets;
    let profile = input.profile;
    let n = buckets.len();
    if n < 6 || input.treatments.is_empty() {
        return out;
    }

    // treatments in ascending time order; the consumption cursor moves
    // forward in lockstep with the bucket clock
    let mut ascending: Vec<Treatment> = input.treatments.to_vec();
    ascending.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    // treatments older than the oldest bucket never enter meal accounting
    let oldest = buckets[n - 1].time;
    let mut cursor = 0;
    while cursor < ascending.len() && ascending[cursor].timestamp < oldest {
        cursor += 1;
    }

    // sliding 6h lookback window into the ascending list for IOB calls
    let mut win_lo = 0;
    let mut win_hi = 0;

    let mut ctx = CategorizeCtx::default();

    // the newest bucket and the four oldest (lookahead-only) buckets are
    // never classified
    for i in (1..=n - 5).rev() {
        let bucket = &buckets[i];
        let bg_time = bucket.time;
        let is_final = i == 1;

        // consume every treatment strictly older than this bucket
        let mut my_carbs = 0.0;
        while cursor < ascending.len() && ascending[cursor].timestamp < bg_time {
            if let Some(carbs) = ascending[cursor].carbs {
                if carbs >= 1.0 {
                    ctx.meal_cob += carbs;
                    ctx.meal_carbs += carbs;
                    my_carbs += carbs;
                }
            }
            cursor += 1;
        }
        if let Some(cap) = profile.max_cob {
            ctx.meal_cob = ctx.meal_cob.min(cap);
        }

        let bg = bucket.glucose;
        let lookahead = buckets[i + 4].glucose;
        if bg < 40.0 || lookahead < 40.0 {
            continue;
        }
        let delta = bg - buckets[i + 1].glucose;
        let avg_delta = round2((bg - lookahead) / 4.0);

        let (sens, memo) = isf_lookup(&profile.isf_schedule, bg_time, ctx.isf_memo);
        ctx.isf_memo = memo;
        let Some(sens) = sens else {
            if !ctx.isf_warned {
                warn!("invalid ISF lookup; skipping affected buckets");
                ctx.isf_warned = true;
            }
            continue;
        };

        // 4-hour trailing average of the pump's configured basal profile,
        // used only as IOB-engine input: it dampens divergence between the
        // tuned and pump profiles
        let Some(pump_basal_avg) = pump_basal_average(profile, bg_time) else {
            continue;
        };

        // the tuned basal drives every category decision
        let Some(current_basal) = basal_lookup(&profile.basal_schedule, bg_time) else {
            continue;
        };

        // U/hr * mg/dL/U / 60 min * 5 = mg/dL per 5-minute tick
        let basal_bgi = round2(current_basal * sens / 60.0 * 5.0);

        while win_hi < ascending.len() && ascending[win_hi].timestamp < bg_time {
            win_hi += 1;
        }
        while win_lo < win_hi && bg_time - ascending[win_lo].timestamp >= Duration::hours(6) {
            win_lo += 1;
        }
        let iob = iob_total(
            &IobInput {
                treatments: &ascending[win_lo..win_hi],
                profile,
                current_basal: pump_basal_avg,
            },
            bg_time,
        );

        let bgi = round2(-iob.activity * sens * 5.0);
        let mut deviation = avg_delta - bgi;
        // positive deviations below 80 mg/dL are measurement noise near
        // hypoglycemia, not carb absorption
        if bg < 80.0 && deviation > 0.0 {
            deviation = 0.0;
        }
        let deviation = round2(deviation);
        let dev5m = round2(delta - bgi);

        let mut datum = bucket.clone();
        datum.avg_delta = Some(avg_delta);
        datum.bgi = Some(bgi);
        datum.deviation = Some(deviation);
        datum.dev5m = Some(dev5m);

        // absorb announced carbs over this 5-minute interval
        if ctx.meal_cob > 0.0 {
            ctx.meal_cob = absorb_cob(ctx.meal_cob, deviation, profile, sens);
        }

        // carb-ratio window tracking, independent of category assignment:
        // the window spans from the first carb until COB is gone and IOB has
        // decayed below half the tuned basal rate
        if ctx.meal_cob > 0.0 || ctx.calculating_cr {
            ctx.cr_carbs += my_carbs;
            if !ctx.calculating_cr {
                debug!(iob = iob.iob, bg = datum.glucose, time = %bg_time, "opening carb-ratio window");
                ctx.cr_start = Some(CrStart {
                    iob: iob.iob,
                    bg: datum.glucose,
                    time: bg_time,
                });
            }
            if (ctx.meal_cob > 0.0 || iob.iob > current_basal / 2.0) && !is_final {
                ctx.calculating_cr = true;
            } else if let Some(start) = ctx.cr_start.take() {
                debug!(iob = iob.iob, bg = datum.glucose, time = %bg_time, "closing carb-ratio window");
                let elapsed =
                    ((bg_time - start.time).num_seconds() as f64 / 60.0).round() as i64;
                if elapsed < 60 || (is_final && ctx.meal_cob > 0.0) {
                    debug!(elapsed, "ignoring short carb-ratio period");
                } else {
                    out.cr_data.push(CrDatum {
                        initial_iob: start.iob,
                        initial_bg: start.bg,
                        initial_carb_time: start.time,
                        end_iob: iob.iob,
                        end_bg: datum.glucose,
                        end_time: bg_time,
                        carbs: ctx.cr_carbs,
                        insulin: None,
                    });
                }
                ctx.cr_carbs = 0.0;
                ctx.calculating_cr = false;
            }
        }

        // category assignment, mutually exclusive, evaluated in order
        if ctx.meal_cob > 0.0 || ctx.absorbing || ctx.meal_carbs > 0.0 {
            // meal IOB has decayed: end absorption after this bucket unless
            // COB remains
            if iob.iob < current_basal / 2.0 {
                ctx.absorbing = false;
            } else if deviation > 0.0 {
                ctx.absorbing = true;
            } else {
                ctx.absorbing = false;
            }
            if !ctx.absorbing && ctx.meal_cob == 0.0 {
                ctx.meal_carbs = 0.0;
            }
            if ctx.last_category != Some(Category::Csf) {
                datum.meal_absorption = Some(AbsorptionMarker::Start);
                debug!(time = %bg_time, "start carb absorption");
            }
            ctx.last_category = Some(Category::Csf);
            datum.meal_carbs = Some(ctx.meal_carbs);
            out.csf.push(datum);
        } else {
            if ctx.last_category == Some(Category::Csf) {
                if let Some(last) = out.csf.last_mut() {
                    last.meal_absorption = Some(AbsorptionMarker::End);
                    debug!("end carb absorption");
                }
            }

            if iob.iob > 2.0 * current_basal || deviation > 6.0 || ctx.uam {
                ctx.uam = deviation > 0.0;
                if ctx.last_category != Some(Category::Uam) {
                    datum.uam_absorption = Some(AbsorptionMarker::Start);
                    debug!(time = %bg_time, "start unannounced meal absorption");
                }
                ctx.last_category = Some(Category::Uam);
                out.uam.push(datum);
            } else {
                if ctx.last_category == Some(Category::Uam) {
                    debug!("end unannounced meal absorption");
                }
                // scheduled basal activity dominating the observed insulin
                // impact means the interval tunes basals; an unexplained
                // rise is conservatively attributed to basal mis-tuning
                // rather than ISF; the remainder tunes sensitivity
                let category = if basal_bgi > -4.0 * bgi {
                    Category::Basal
                } else if avg_delta > 0.0 && avg_delta > -2.0 * bgi {
                    Category::Basal
                } else {
                    Category::Isf
                };
                ctx.last_category = Some(category);
                if category == Category::Basal {
                    out.basal.push(datum);
                } else {
                    out.isf.push(datum);
                }
            }
        }

        trace!(
            absorbing = ctx.absorbing,
            meal_cob = ctx.meal_cob,
            meal_carbs = ctx.meal_carbs,
            bgi,
            iob = iob.iob,
            dev5m,
            deviation,
            avg_delta,
            category = ctx.last_category.map(|c| c.as_str()).unwrap_or(""),
            bg,
            my_carbs,
            "bucket"
        );
    }

    out
}

/// One 5-minute absorption step: carb impact is the observed deviation,
/// floored at the profile minimum, converted to grams through the carb
/// ratio and sensitivity. The returned carbs-on-board is never negative.
fn absorb_cob(meal_cob: f64, deviation: f64, profile: &Profile, sens: f64) -> f64 {
    let ci = deviation.max(profile.min_5m_carbimpact);
    let absorbed = ci * profile.carb_ratio / sens;
    (meal_cob - absorbed).max(0.0)
}

/// Average of the pump basal rate at the bucket time and 1/2/3 hours prior,
/// rounded to 3 decimals.
fn pump_basal_average(profile: &Profile, at: DateTime<Utc>) -> Option<f64> {
    let mut sum = 0.0;
    for hours_ago in 0..4 {
        sum += basal_lookup(
            &profile.pump_basal_schedule,
            at - Duration::hours(hours_ago),
        )?;
    }
    Some(round3(sum / 4.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BasalEntry, IsfEntry, IsfSchedule};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
    }

    fn flat_profile(carb_ratio: f64, min_impact: f64, isf: f64, basal: f64) -> Profile {
        Profile {
            carb_ratio,
            min_5m_carbimpact: min_impact,
            dia_hours: 5.0,
            curve: "rapid-acting".to_string(),
            isf_schedule: IsfSchedule {
                sensitivities: vec![IsfEntry { offset: 0, sensitivity: isf }],
            },
            basal_schedule: vec![BasalEntry { minutes: 0, rate: basal }],
            pump_basal_schedule: vec![BasalEntry { minutes: 0, rate: basal }],
            max_cob: None,
            categorize_uam_as_basal: false,
        }
    }

    /// Newest-first buckets from a chronological glucose series, 5 minutes
    /// apart starting at `t0()`.
    fn buckets_from(series: &[f64]) -> Vec<Bucket> {
        series
            .iter()
            .enumerate()
            .map(|(k, &bg)| Bucket::new(t0() + Duration::minutes(5 * k as i64), bg))
            .rev()
            .collect()
    }

    fn minutes(m: f64) -> Duration {
        Duration::seconds((m * 60.0) as i64)
    }

    fn all_times(out: &CategorizerOutput) -> Vec<DateTime<Utc>> {
        out.csf
            .iter()
            .chain(out.isf.iter())
            .chain(out.uam.iter())
            .chain(out.basal.iter())
            .map(|b| b.time)
            .collect()
    }

    #[test]
    fn test_announced_meal_produces_csf_run() {
        // 50g of carbs, no insulin: glucose rises for 90 minutes, then
        // flattens. Absorption at the carb-impact floor drains 5 g per
        // bucket, so the run closes well inside the data.
        let series: Vec<f64> = (0..36)
            .map(|k| match k {
                0..=4 => 100.0,
                5..=22 => 100.0 + 5.0 * (k as f64 - 4.0),
                _ => 190.0,
            })
            .collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::carbs(t0() + minutes(22.5), 50.0)];
        let profile = flat_profile(15.0, 10.0, 30.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        // carbs land at the bucket after the entry and drain over 10 buckets
        assert_eq!(out.csf.len(), 10);
        assert_eq!(out.csf[0].time, t0() + Duration::minutes(25));
        assert_eq!(out.csf[0].meal_absorption, Some(AbsorptionMarker::Start));
        assert_eq!(out.csf[9].meal_absorption, Some(AbsorptionMarker::End));
        assert_eq!(out.csf[9].meal_carbs, Some(0.0));
        assert_eq!(out.csf[4].meal_carbs, Some(50.0));

        // carbs alone never exceed half the basal in IOB, so the window
        // closes as soon as COB drains: 45 minutes, below the 60-minute
        // floor, and no CR sample is emitted
        assert!(out.cr_data.is_empty());
        assert!(out.uam.is_empty());
        assert!(out.isf.is_empty());
        assert_eq!(out.basal.len(), 21);
    }

    #[test]
    fn test_max_cob_caps_absorption_run() {
        // same meal as above but with COB capped at 20g: the capped COB
        // drains in 4 buckets instead of 10
        let series: Vec<f64> = (0..36)
            .map(|k| match k {
                0..=4 => 100.0,
                5..=22 => 100.0 + 5.0 * (k as f64 - 4.0),
                _ => 190.0,
            })
            .collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::carbs(t0() + minutes(22.5), 50.0)];
        let mut profile = flat_profile(15.0, 10.0, 30.0, 1.0);
        profile.max_cob = Some(20.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert_eq!(out.csf.len(), 4);
        // the announced total is unaffected by the cap
        assert_eq!(out.csf[0].meal_carbs, Some(50.0));
    }

    #[test]
    fn test_meal_with_bolus_emits_cr_sample() {
        // 50g of carbs with a 3U bolus against flat glucose: the window
        // stays open while COB drains and IOB decays, then closes past the
        // 60-minute floor
        let series: Vec<f64> = (0..48).map(|_| 150.0).collect();
        let buckets = buckets_from(&series);
        let treatments = vec![
            Treatment::carbs(t0() + minutes(22.5), 50.0),
            Treatment::insulin(t0() + minutes(32.5), 3.0),
        ];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert_eq!(out.cr_data.len(), 1);
        let cr = &out.cr_data[0];
        assert_eq!(cr.carbs, 50.0);
        assert_eq!(cr.initial_carb_time, t0() + Duration::minutes(25));
        let elapsed = (cr.end_time - cr.initial_carb_time).num_minutes();
        assert!((150..=185).contains(&elapsed), "elapsed was {elapsed}");
        assert!(cr.insulin.is_none(), "dosed insulin is filled downstream");

        assert!(out.csf.len() >= 30);
        assert_eq!(out.csf[0].meal_absorption, Some(AbsorptionMarker::Start));
    }

    #[test]
    fn test_insulin_activity_classified_isf() {
        // falling glucose under a small bolus with no carbs: once activity
        // ramps up, basal BGI no longer dominates and buckets tune ISF
        let series: Vec<f64> = (0..20).map(|k| 200.0 - 3.0 * k as f64).collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::insulin(t0() + minutes(1.0), 0.5)];
        let profile = flat_profile(10.0, 8.0, 50.0, 0.5);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert!(out.csf.is_empty());
        assert!(out.uam.is_empty());
        assert!(!out.basal.is_empty(), "early low-activity buckets tune basal");
        assert!(!out.isf.is_empty(), "peak-activity buckets tune ISF");
        let isf_times: Vec<_> = out.isf.iter().map(|b| b.time).collect();
        assert!(isf_times.contains(&(t0() + Duration::minutes(40))));
    }

    #[test]
    fn test_rise_without_carbs_flags_uam() {
        // a sharp unannounced rise pushes deviation past 6 with no carb
        // entry on record
        let series: Vec<f64> = (0..20)
            .map(|k| if k < 8 { 120.0 } else { 120.0 + 10.0 * (k as f64 - 7.0) })
            .collect();
        let buckets = buckets_from(&series);
        // an insulin record keeps the treatment stream non-empty without
        // meaningfully moving IOB
        let treatments = vec![Treatment::insulin(t0() + minutes(1.0), 0.05)];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert!(out.csf.is_empty());
        assert!(!out.uam.is_empty());
        assert_eq!(out.uam[0].uam_absorption, Some(AbsorptionMarker::Start));
    }

    #[test]
    fn test_low_glucose_clamps_positive_deviation() {
        let series: Vec<f64> = (0..10).map(|k| 60.0 + 2.0 * k as f64).collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::insulin(t0() + minutes(1.0), 0.05)];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert!(!out.basal.is_empty());
        for bucket in &out.basal {
            assert_eq!(bucket.deviation, Some(0.0));
        }
    }

    #[test]
    fn test_boundary_buckets_are_skipped() {
        let series: Vec<f64> = (0..36).map(|_| 120.0).collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::insulin(t0() + minutes(1.0), 0.01)];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        let times = all_times(&out);
        assert_eq!(times.len(), 31);
        // the newest bucket is never classified
        assert!(!times.contains(&buckets[0].time));
        // neither are the four oldest, which only serve as lookahead
        for bucket in &buckets[32..] {
            assert!(!times.contains(&bucket.time));
        }
        assert!(times.contains(&(t0() + Duration::minutes(20))));
        assert!(times.contains(&(t0() + Duration::minutes(170))));
    }

    #[test]
    fn test_single_category_membership() {
        // mixed scenario: carbs, a bolus, and an unannounced rise
        let series: Vec<f64> = (0..40)
            .map(|k| 120.0 + (k as f64 * 2.5) - if k > 20 { k as f64 } else { 0.0 })
            .collect();
        let buckets = buckets_from(&series);
        let treatments = vec![
            Treatment::carbs(t0() + minutes(12.5), 25.0),
            Treatment::insulin(t0() + minutes(17.5), 2.0),
        ];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        let mut times = all_times(&out);
        let total = times.len();
        times.sort();
        times.dedup();
        assert_eq!(times.len(), total, "bucket assigned to two categories");
    }

    #[test]
    fn test_malformed_isf_schedule_skips_without_crashing() {
        let series: Vec<f64> = (0..12).map(|_| 120.0).collect();
        let buckets = buckets_from(&series);
        let treatments = vec![Treatment::carbs(t0() + minutes(12.5), 30.0)];
        let mut profile = flat_profile(10.0, 8.0, 50.0, 1.0);
        profile.isf_schedule = IsfSchedule {
            sensitivities: vec![IsfEntry { offset: 60, sensitivity: 50.0 }],
        };

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert!(all_times(&out).is_empty());
        assert!(out.cr_data.is_empty());
    }

    #[test]
    fn test_treatments_before_oldest_bucket_ignored() {
        let series: Vec<f64> = (0..12).map(|_| 120.0).collect();
        let buckets = buckets_from(&series);
        // carbs an hour before any glucose data: must not enter meal COB
        let treatments = vec![
            Treatment::carbs(t0() - Duration::hours(1), 80.0),
            Treatment::insulin(t0() + minutes(1.0), 0.01),
        ];
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);

        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });

        assert!(out.csf.is_empty());
        assert!(out.cr_data.is_empty());
    }

    #[test]
    fn test_insufficient_input_returns_empty() {
        let profile = flat_profile(10.0, 8.0, 50.0, 1.0);
        let series: Vec<f64> = (0..5).map(|_| 120.0).collect();
        let buckets = buckets_from(&series);

        // too few buckets for any lookahead
        let treatments = vec![Treatment::carbs(t0(), 10.0)];
        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &treatments,
            profile: &profile,
        });
        assert!(all_times(&out).is_empty());

        // no treatments at all
        let series: Vec<f64> = (0..12).map(|_| 120.0).collect();
        let buckets = buckets_from(&series);
        let out = categorize(&CategorizerInput {
            buckets: &buckets,
            treatments: &[],
            profile: &profile,
        });
        assert!(all_times(&out).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cob_stays_non_negative_and_drains(
                cob in 0.0f64..120.0,
                deviation in -20.0f64..20.0,
                floor in 1.0f64..12.0,
            ) {
                let profile = flat_profile(10.0, floor, 50.0, 1.0);
                let next = absorb_cob(cob, deviation, &profile, 50.0);
                prop_assert!(next >= 0.0);
                // the impact floor is positive, so every step absorbs
                prop_assert!(next < cob || next == 0.0);
            }
        }
    }
}
