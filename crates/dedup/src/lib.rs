//! # Local Business Deduplication
//!
//! Entity resolution and record merging for business listings collected
//! independently from a mapping service, a review site and a social page.
//!
//! ## Pipeline
//!
//! - **Similarity**: text, phone and website normalization plus fuzzy text similarity
//! - **Pair Matcher**: ordered scoring rules over two records from different sources
//! - **Resolver**: greedy, confidence-ordered one-to-one match selection
//! - **Merger**: field-level merge of an accepted pair into a canonical record
//! - **Consolidator**: groups by source, drives the stages above, reports the run
//!
//! ## Example
//!
//! ```rust
//! use local_business_dedup::{Consolidator, Record, Source};
//!
//! let records = vec![
//!     Record::new("g1", "Sunrise Dental", Source::MapsService)
//!         .with_website("https://sunrisedental.com"),
//!     Record::new("y1", "Sunrise Dental", Source::ReviewSite)
//!         .with_website("https://sunrisedental.com/reviews"),
//! ];
//!
//! let output = Consolidator::new().consolidate(&records);
//! assert_eq!(output.records.len(), 1);
//! assert!(output.records[0].is_merged());
//! ```

pub mod config;
pub mod consolidator;
pub mod matcher;
pub mod merger;
pub mod metrics;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod types;

pub use config::{DedupConfig, MatchWeights};
pub use consolidator::{group_by_source, CandidateSet, Consolidator, SourceBucket};
pub use matcher::{MatchRule, MatchScore, PairMatcher};
pub use merger::{merge_candidate, merge_records, MergeFields};
pub use metrics::{DedupMetrics, MetricsSnapshot};
pub use report::{ConsolidationOutput, ConsolidationReport};
pub use resolver::resolve_matches;
pub use types::*;
