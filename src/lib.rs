//! retrolens - retrospective glucose categorization engine
//!
//! Replays a day of glucose and treatment history and attributes each
//! ~5-minute interval's glucose movement to one of four causes: announced
//! carb absorption (CSF), unannounced meals (UAM), insulin sensitivity
//! (ISF), or basal mis-tuning. The categorized collections, together with
//! carb-ratio calibration windows, feed downstream profile tuning.
//!
//! The pipeline stages, in order:
//! 1. ingest: resolve raw journal records into timestamped samples
//! 2. bucket: merge samples into uniform ~5-minute buckets
//! 3. categorize: compute IOB/BGI per bucket and assign categories
//! 4. dosed: total the insulin delivered in each carb-ratio window
//! 5. rebalance: reassign deviations between undersized collections
//!
//! Entry point: [`pipeline::prep`] (or [`pipeline::prep_from_json`] for
//! embedding callers).

pub mod bucket;
pub mod categorize;
pub mod dosed;
pub mod error;
pub mod ingest;
pub mod iob;
pub mod pipeline;
pub mod rebalance;
pub mod schedule;
pub mod types;

pub use error::PrepError;
pub use pipeline::{prep, prep_from_json, PrepInput};
pub use types::{Bucket, CategorizedDataset, CrDatum, Profile, Treatment};

/// Producer name stamped into output provenance
pub const PRODUCER_NAME: &str = "retrolens";

/// Engine version stamped into output provenance
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
