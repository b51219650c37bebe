//! Core types for the retrolens pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: treatments, schedules, glucose buckets, IOB results, carb-ratio
//! samples, and the final categorized dataset.
//!
//! Serde names match the historical wire shapes (`CRInitialIOB`,
//! `mealAbsorption`, ...) so downstream tuning tooling can consume the output
//! unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A carb or insulin event with a timestamp.
///
/// Exactly one of `carbs`, `insulin`, or `rate`+`duration` is normally set.
/// Temp-basal records carry a rate (U/hr) and duration (minutes); their net
/// insulin relative to the scheduled basal is derived by the IOB engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    /// Event timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Carbohydrate amount (grams)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    /// Insulin amount (units); negative for net low-temp segments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin: Option<f64>,
    /// Temp-basal rate (U/hr)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Temp-basal duration (minutes)
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

impl Treatment {
    /// Construct a carb entry
    pub fn carbs(timestamp: DateTime<Utc>, grams: f64) -> Self {
        Treatment {
            timestamp,
            carbs: Some(grams),
            insulin: None,
            rate: None,
            duration_minutes: None,
        }
    }

    /// Construct an insulin dose
    pub fn insulin(timestamp: DateTime<Utc>, units: f64) -> Self {
        Treatment {
            timestamp,
            carbs: None,
            insulin: Some(units),
            rate: None,
            duration_minutes: None,
        }
    }

    /// Construct a temp-basal segment
    pub fn temp_basal(timestamp: DateTime<Utc>, rate: f64, duration_minutes: f64) -> Self {
        Treatment {
            timestamp,
            carbs: None,
            insulin: None,
            rate: Some(rate),
            duration_minutes: Some(duration_minutes),
        }
    }
}

/// One segment of a basal schedule: `rate` U/hr starting at `minutes` past
/// midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasalEntry {
    /// Offset in minutes since midnight
    pub minutes: u32,
    /// Basal rate (U/hr)
    pub rate: f64,
}

/// One segment of an ISF schedule: `sensitivity` mg/dL per unit starting at
/// `offset` minutes past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsfEntry {
    /// Offset in minutes since midnight
    pub offset: u32,
    /// Insulin sensitivity (mg/dL per U)
    pub sensitivity: f64,
}

/// Piecewise ISF schedule over a day. Well-formed only if it covers offset 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsfSchedule {
    pub sensitivities: Vec<IsfEntry>,
}

/// Named insulin action curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsulinCurve {
    Bilinear,
    RapidActing,
    UltraRapid,
}

impl InsulinCurve {
    /// Parse a curve name. Unrecognized names return `None`; the IOB engine
    /// substitutes rapid-acting with a logged warning.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bilinear" => Some(InsulinCurve::Bilinear),
            "rapid-acting" => Some(InsulinCurve::RapidActing),
            "ultra-rapid" => Some(InsulinCurve::UltraRapid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsulinCurve::Bilinear => "bilinear",
            InsulinCurve::RapidActing => "rapid-acting",
            InsulinCurve::UltraRapid => "ultra-rapid",
        }
    }

    /// Fixed peak-activity offset in minutes
    pub fn peak_minutes(&self) -> f64 {
        match self {
            InsulinCurve::Bilinear | InsulinCurve::RapidActing => 75.0,
            InsulinCurve::UltraRapid => 55.0,
        }
    }

    /// Exponential curves require a DIA of at least 5 hours
    pub fn requires_long_dia(&self) -> bool {
        !matches!(self, InsulinCurve::Bilinear)
    }
}

/// Dosing profile consumed by the categorizer.
///
/// Carries both the tuned schedules (used for category decisions) and the
/// pump-native basal schedule (used only for IOB-engine input).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Grams of carbohydrate offset by one unit of insulin
    pub carb_ratio: f64,
    /// Floor on assumed carb impact per 5-minute interval (mg/dL)
    pub min_5m_carbimpact: f64,
    /// Duration of insulin action (hours)
    #[serde(rename = "dia")]
    pub dia_hours: f64,
    /// Insulin action curve name
    pub curve: String,
    /// Tuned ISF schedule
    #[serde(rename = "isfProfile")]
    pub isf_schedule: IsfSchedule,
    /// Tuned basal schedule
    #[serde(rename = "basalprofile")]
    pub basal_schedule: Vec<BasalEntry>,
    /// Pump-configured basal schedule
    #[serde(rename = "pumpbasalprofile")]
    pub pump_basal_schedule: Vec<BasalEntry>,
    /// Ceiling on accumulated carbs-on-board (grams)
    #[serde(rename = "maxCOB", default, skip_serializing_if = "Option::is_none")]
    pub max_cob: Option<f64>,
    /// Treat all unannounced-meal buckets as basal in the rebalancing pass
    #[serde(default)]
    pub categorize_uam_as_basal: bool,
}

/// Final category assigned to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Csf,
    Isf,
    Uam,
    Basal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Csf => "csf",
            Category::Isf => "isf",
            Category::Uam => "uam",
            Category::Basal => "basal",
        }
    }
}

/// Marks the bucket where an absorption run begins or ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsorptionMarker {
    Start,
    End,
}

/// A synthetic glucose sample representing a ~5-minute interval.
///
/// Produced by the bucketizer in newest-first order; the derived fields are
/// filled in during categorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket anchor time (UTC)
    #[serde(rename = "date")]
    pub time: DateTime<Utc>,
    /// Mean glucose of the raw samples merged into this bucket (mg/dL)
    pub glucose: f64,
    /// Average glucose change per 5 minutes over the trailing 20 minutes
    #[serde(rename = "avgDelta", skip_serializing_if = "Option::is_none")]
    pub avg_delta: Option<f64>,
    /// Glucose impact of insulin activity over this interval (mg/dL)
    #[serde(rename = "BGI", skip_serializing_if = "Option::is_none")]
    pub bgi: Option<f64>,
    /// Observed movement minus insulin-explained movement (mg/dL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,
    /// Single-bucket deviation, diagnostic only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev5m: Option<f64>,
    /// Running announced-meal carb total while classified CSF (grams)
    #[serde(rename = "mealCarbs", skip_serializing_if = "Option::is_none")]
    pub meal_carbs: Option<f64>,
    /// Carb-absorption run transition marker
    #[serde(rename = "mealAbsorption", skip_serializing_if = "Option::is_none")]
    pub meal_absorption: Option<AbsorptionMarker>,
    /// Unannounced-meal run transition marker
    #[serde(rename = "uamAbsorption", skip_serializing_if = "Option::is_none")]
    pub uam_absorption: Option<AbsorptionMarker>,
}

impl Bucket {
    /// A fresh bucket with no derived annotations
    pub fn new(time: DateTime<Utc>, glucose: f64) -> Self {
        Bucket {
            time,
            glucose,
            avg_delta: None,
            bgi: None,
            deviation: None,
            dev5m: None,
            meal_carbs: None,
            meal_absorption: None,
            uam_absorption: None,
        }
    }
}

/// Instantaneous insulin-on-board and activity at one point in time.
///
/// Valid only at the instant it was computed; never cached across buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IobResult {
    /// Total insulin on board (U), rounded to 3 decimals
    pub iob: f64,
    /// Rate of insulin effect (U/min), rounded to 4 decimals
    pub activity: f64,
    /// IOB attributable to basal-origin doses (U)
    #[serde(rename = "basaliob")]
    pub basal_iob: f64,
    /// IOB attributable to bolus-origin doses (U)
    #[serde(rename = "bolusiob")]
    pub bolus_iob: f64,
    /// Net basal-origin insulin inside the DIA window (U)
    #[serde(rename = "netbasalinsulin")]
    pub net_basal_insulin: f64,
    /// Bolus-origin insulin inside the DIA window (U)
    #[serde(rename = "bolusinsulin")]
    pub bolus_insulin: f64,
    /// Instant the result was computed for
    pub time: DateTime<Utc>,
}

/// One carb-ratio calibration sample.
///
/// Opened when carb-on-board first becomes positive, closed when COB returns
/// to zero and IOB decays below half the tuned basal rate. `insulin` is
/// filled by the insulin-dosed aggregator after categorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrDatum {
    #[serde(rename = "CRInitialIOB")]
    pub initial_iob: f64,
    #[serde(rename = "CRInitialBG")]
    pub initial_bg: f64,
    #[serde(rename = "CRInitialCarbTime")]
    pub initial_carb_time: DateTime<Utc>,
    #[serde(rename = "CREndIOB")]
    pub end_iob: f64,
    #[serde(rename = "CREndBG")]
    pub end_bg: f64,
    #[serde(rename = "CREndTime")]
    pub end_time: DateTime<Utc>,
    /// Carbs accumulated inside the window (grams)
    #[serde(rename = "CRCarbs")]
    pub carbs: f64,
    /// Insulin delivered inside the window (U), rounded to 3 decimals
    #[serde(rename = "CRInsulin", skip_serializing_if = "Option::is_none")]
    pub insulin: Option<f64>,
}

/// Provenance stamped into every emitted dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub producer: String,
    pub version: String,
    pub instance_id: String,
    pub computed_at_utc: String,
}

impl RunInfo {
    pub fn new() -> Self {
        RunInfo {
            producer: crate::PRODUCER_NAME.to_string(),
            version: crate::ENGINE_VERSION.to_string(),
            instance_id: uuid::Uuid::new_v4().to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
        }
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// The categorized output: four mutually-exclusive bucket collections plus
/// the carb-ratio sample list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedDataset {
    pub run: RunInfo,
    #[serde(rename = "CRData")]
    pub cr_data: Vec<CrDatum>,
    #[serde(rename = "CSFGlucoseData")]
    pub csf: Vec<Bucket>,
    #[serde(rename = "ISFGlucoseData")]
    pub isf: Vec<Bucket>,
    #[serde(rename = "UAMGlucoseData")]
    pub uam: Vec<Bucket>,
    #[serde(rename = "basalGlucoseData")]
    pub basal: Vec<Bucket>,
}

impl CategorizedDataset {
    /// Empty dataset, returned when the inputs are insufficient.
    ///
    /// Callers must treat this as "insufficient data", not as success.
    pub fn empty() -> Self {
        CategorizedDataset {
            run: RunInfo::new(),
            cr_data: Vec::new(),
            csf: Vec::new(),
            isf: Vec::new(),
            uam: Vec::new(),
            basal: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cr_data.is_empty()
            && self.csf.is_empty()
            && self.isf.is_empty()
            && self.uam.is_empty()
            && self.basal.is_empty()
    }
}

/// Round to 2 decimal places (deviations, deltas, BGI)
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to 3 decimal places (IOB components, basal rates, dosed insulin)
pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Round to 4 decimal places (activity)
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_curve_parse() {
        assert_eq!(InsulinCurve::parse("bilinear"), Some(InsulinCurve::Bilinear));
        assert_eq!(
            InsulinCurve::parse("Rapid-Acting"),
            Some(InsulinCurve::RapidActing)
        );
        assert_eq!(
            InsulinCurve::parse("ultra-rapid"),
            Some(InsulinCurve::UltraRapid)
        );
        assert_eq!(InsulinCurve::parse("regular"), None);
    }

    #[test]
    fn test_curve_peaks() {
        assert_eq!(InsulinCurve::RapidActing.peak_minutes(), 75.0);
        assert_eq!(InsulinCurve::UltraRapid.peak_minutes(), 55.0);
        assert!(!InsulinCurve::Bilinear.requires_long_dia());
        assert!(InsulinCurve::RapidActing.requires_long_dia());
    }

    #[test]
    fn test_cr_datum_wire_names() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let datum = CrDatum {
            initial_iob: 1.5,
            initial_bg: 120.0,
            initial_carb_time: t,
            end_iob: 0.2,
            end_bg: 110.0,
            end_time: t + chrono::Duration::minutes(90),
            carbs: 45.0,
            insulin: Some(3.25),
        };
        let json = serde_json::to_string(&datum).unwrap();
        assert!(json.contains("CRInitialIOB"));
        assert!(json.contains("CREndTime"));
        assert!(json.contains("CRInsulin"));
    }

    #[test]
    fn test_bucket_marker_serialization() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut bucket = Bucket::new(t, 134.0);
        bucket.meal_absorption = Some(AbsorptionMarker::Start);
        let json = serde_json::to_string(&bucket).unwrap();
        assert!(json.contains(r#""mealAbsorption":"start""#));
        // unset annotations stay off the wire
        assert!(!json.contains("uamAbsorption"));
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(4.166_666), 4.17);
        assert_eq!(round3(0.123_45), 0.123);
        assert_eq!(round4(0.123_456), 0.1235);
    }
}
