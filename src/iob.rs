//! IOB/activity engine
//!
//! Computes instantaneous insulin-on-board and activity (the first
//! derivative of insulin action) at an arbitrary timestamp from an
//! insulin-delivery history and a named action-curve model.
//!
//! Three curves are supported: `bilinear` (triangular activity, scaled to
//! the DIA), and the exponential `rapid-acting` and `ultra-rapid` curves
//! with fixed peak-activity offsets of 75 and 55 minutes. The exponential
//! curves force a minimum DIA of 5 hours; bilinear floors DIA at 3 hours.

use crate::types::{round3, round4, InsulinCurve, IobResult, Profile, Treatment};
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Inputs for one IOB computation.
///
/// `treatments` is the insulin-delivery history; callers should window it to
/// a bounded lookback (the categorizer uses 6 hours) for performance.
/// `current_basal` is the scheduled basal rate used to reduce temp-basal
/// segments that carry no explicit insulin amount.
#[derive(Debug, Clone, Copy)]
pub struct IobInput<'a> {
    pub treatments: &'a [Treatment],
    pub profile: &'a Profile,
    pub current_basal: f64,
}

/// Explicit doses smaller than this are attributed to basal-origin
/// delivery. Net insulin derived from a temp-basal segment is basal-origin
/// regardless of its size.
const BASAL_DOSE_CEILING: f64 = 0.1;

struct CurveContrib {
    iob: f64,
    activity: f64,
}

/// Total IOB, activity, and basal/bolus attribution at `time`.
///
/// Pure function of its inputs. IOB components are rounded to 3 decimals,
/// activity to 4.
pub fn iob_total(input: &IobInput<'_>, time: DateTime<Utc>) -> IobResult {
    let profile = input.profile;

    let curve = InsulinCurve::parse(&profile.curve).unwrap_or_else(|| {
        warn!(
            curve = %profile.curve,
            "unsupported curve function, defaulting to rapid-acting"
        );
        InsulinCurve::RapidActing
    });

    // force minimum DIA of 3h; exponential curves require 5h or more
    let mut dia = profile.dia_hours.max(3.0);
    if curve.requires_long_dia() && dia < 5.0 {
        dia = 5.0;
    }
    let peak = curve.peak_minutes();

    let mut iob = 0.0;
    let mut activity = 0.0;
    let mut basal_iob = 0.0;
    let mut bolus_iob = 0.0;
    let mut net_basal_insulin = 0.0;
    let mut bolus_insulin = 0.0;

    let dia_ago = time - Duration::milliseconds((dia * 60.0 * 60.0 * 1000.0) as i64);
    for treatment in input.treatments {
        let Some(dose) = effective_insulin(treatment, input.current_basal) else {
            continue;
        };
        if treatment.timestamp > time || treatment.timestamp <= dia_ago {
            continue;
        }
        let mins_ago = ((time - treatment.timestamp).num_seconds() as f64 / 60.0).round();
        let contrib = match curve {
            InsulinCurve::Bilinear => bilinear_contrib(dose, mins_ago, dia),
            _ => exponential_contrib(dose, mins_ago, dia, peak),
        };
        iob += contrib.iob;
        activity += contrib.activity;
        let basal_origin = treatment.insulin.is_none() || dose < BASAL_DOSE_CEILING;
        if contrib.iob != 0.0 {
            if basal_origin {
                basal_iob += contrib.iob;
                net_basal_insulin += dose;
            } else {
                bolus_iob += contrib.iob;
                bolus_insulin += dose;
            }
        }
    }

    IobResult {
        iob: round3(iob),
        activity: round4(activity),
        basal_iob: round3(basal_iob),
        bolus_iob: round3(bolus_iob),
        net_basal_insulin: round3(net_basal_insulin),
        bolus_insulin: round3(bolus_insulin),
        time,
    }
}

/// Insulin amount contributed by a treatment: the explicit dose, or the net
/// insulin of a temp-basal segment relative to the scheduled basal.
fn effective_insulin(treatment: &Treatment, current_basal: f64) -> Option<f64> {
    if let Some(insulin) = treatment.insulin {
        if insulin == 0.0 {
            return None;
        }
        return Some(insulin);
    }
    match (treatment.rate, treatment.duration_minutes) {
        (Some(rate), Some(duration)) if duration > 0.0 => {
            let net = (rate - current_basal) * duration / 60.0;
            if net == 0.0 {
                None
            } else {
                Some(net)
            }
        }
        _ => None,
    }
}

/// Triangular activity model. Peak and end are fixed at 75/180 minutes for a
/// 3-hour DIA and scale linearly with longer DIAs.
fn bilinear_contrib(insulin: f64, mins_ago: f64, dia: f64) -> CurveContrib {
    const DEFAULT_DIA: f64 = 3.0;
    const PEAK: f64 = 75.0;
    const END: f64 = 180.0;

    let scaled = DEFAULT_DIA / dia * mins_ago;

    // triangle area must sum to the full dose, so the peak height scales
    // with the DIA even though peak/end stay fixed on the scaled axis
    let activity_peak = 2.0 / (dia * 60.0);
    let slope_up = activity_peak / PEAK;
    let slope_down = -activity_peak / (END - PEAK);

    if scaled < PEAK {
        let x1 = scaled / 5.0 + 1.0;
        CurveContrib {
            iob: insulin * (-0.001852 * x1 * x1 + 0.001852 * x1 + 1.0),
            activity: insulin * slope_up * scaled,
        }
    } else if scaled < END {
        let past_peak = scaled - PEAK;
        let x2 = past_peak / 5.0;
        CurveContrib {
            iob: insulin * (0.001323 * x2 * x2 - 0.054233 * x2 + 0.55556),
            activity: insulin * (activity_peak + slope_down * past_peak),
        }
    } else {
        CurveContrib { iob: 0.0, activity: 0.0 }
    }
}

/// Exponential insulin action with a configurable peak, ending at the DIA.
fn exponential_contrib(insulin: f64, mins_ago: f64, dia: f64, peak: f64) -> CurveContrib {
    let end = dia * 60.0;
    if mins_ago >= end || mins_ago < 0.0 {
        return CurveContrib { iob: 0.0, activity: 0.0 };
    }

    let tau = peak * (1.0 - peak / end) / (1.0 - 2.0 * peak / end);
    let a = 2.0 * tau / end;
    let s = 1.0 / (1.0 - a + (1.0 + a) * (-end / tau).exp());

    let activity =
        insulin * (s / (tau * tau)) * mins_ago * (1.0 - mins_ago / end) * (-mins_ago / tau).exp();
    let iob = insulin
        * (1.0
            - s * (1.0 - a)
                * ((mins_ago * mins_ago / (tau * end * (1.0 - a)) - mins_ago / tau - 1.0)
                    * (-mins_ago / tau).exp()
                    + 1.0));
    CurveContrib { iob, activity }
}
