//! End-to-end preparation pipeline
//!
//! Wires the stages together: ingest raw glucose, bucketize, categorize
//! against treatments and the profile, fill in dosed insulin for each
//! carb-ratio window, rebalance, and stamp provenance.

use crate::bucket::bucketize;
use crate::categorize::{categorize, CategorizerInput};
use crate::dosed::insulin_dosed;
use crate::error::PrepError;
use crate::ingest::RawGlucoseRecord;
use crate::rebalance::rebalance;
use crate::types::{CategorizedDataset, Profile, RunInfo, Treatment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything one preparation run consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepInput {
    /// Raw glucose journal records, any order
    pub glucose: Vec<RawGlucoseRecord>,
    /// Carb, bolus, and temp-basal history, any order
    pub treatments: Vec<Treatment>,
    pub profile: Profile,
}

/// Run the full preparation pipeline.
///
/// Missing glucose or treatment history yields an empty dataset rather
/// than an error: a day without data is a normal condition for a nightly
/// batch job.
pub fn prep(input: &PrepInput) -> CategorizedDataset {
    if input.glucose.is_empty() || input.treatments.is_empty() {
        info!(
            glucose = input.glucose.len(),
            treatments = input.treatments.len(),
            "insufficient input; emitting empty dataset"
        );
        return CategorizedDataset::empty();
    }

    let buckets = bucketize(&input.glucose);
    debug!(
        raw = input.glucose.len(),
        buckets = buckets.len(),
        "bucketized glucose"
    );

    let mut categorized = categorize(&CategorizerInput {
        buckets: &buckets,
        treatments: &input.treatments,
        profile: &input.profile,
    });

    // each carb-ratio window learns its dosed insulin from the raw
    // treatment history, not from IOB
    for cr in &mut categorized.cr_data {
        cr.insulin = Some(insulin_dosed(
            &input.treatments,
            cr.initial_carb_time,
            cr.end_time,
        ));
    }

    let balanced = rebalance(categorized, input.profile.categorize_uam_as_basal);
    info!(
        csf = balanced.csf.len(),
        isf = balanced.isf.len(),
        uam = balanced.uam.len(),
        basal = balanced.basal.len(),
        cr = balanced.cr_data.len(),
        "categorization complete"
    );

    CategorizedDataset {
        run: RunInfo::new(),
        cr_data: balanced.cr_data,
        csf: balanced.csf,
        isf: balanced.isf,
        uam: balanced.uam,
        basal: balanced.basal,
    }
}

/// JSON-in, JSON-out convenience wrapper for embedding callers.
pub fn prep_from_json(json: &str) -> Result<String, PrepError> {
    let input: PrepInput = serde_json::from_str(json)?;
    let dataset = prep(&input);
    Ok(serde_json::to_string_pretty(&dataset)?)
}
