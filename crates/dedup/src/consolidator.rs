//! Cross-source record consolidation
//!
//! Groups records by source, scores every pair of records from different
//! sources, resolves the candidates one-to-one and merges each accepted pair.

use crate::config::DedupConfig;
use crate::matcher::PairMatcher;
use crate::merger::merge_candidate;
use crate::metrics::DedupMetrics;
use crate::report::{ConsolidationOutput, ConsolidationReport};
use crate::resolver::resolve_matches;
use crate::similarity::normalize_text;
use crate::types::{DedupError, MatchCandidate, Record, Source};
use chrono::Utc;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Records of one source, as positions in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBucket {
    pub source: Source,
    pub indices: Vec<usize>,
}

/// Partition records by source
///
/// Buckets are listed in order of each source's first appearance and keep the
/// relative input order of their records.
pub fn group_by_source(records: &[Record]) -> Vec<SourceBucket> {
    let mut buckets: Vec<SourceBucket> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match buckets.iter_mut().find(|b| b.source == record.source) {
            Some(bucket) => bucket.indices.push(index),
            None => buckets.push(SourceBucket {
                source: record.source,
                indices: vec![index],
            }),
        }
    }

    buckets
}

/// Candidates gathered across all source pairs
#[derive(Debug, Clone, Default)]
pub struct CandidateSet<'a> {
    /// In enumeration order: source pair, then record A, then record B
    pub candidates: Vec<MatchCandidate<'a>>,
    pub bucket_pairs: usize,
    pub comparisons: usize,
}

/// Consolidates records from several sources into one deduplicated set
#[derive(Debug, Clone)]
pub struct Consolidator {
    matcher: PairMatcher,
    config: DedupConfig,
    metrics: Arc<DedupMetrics>,
}

impl Default for Consolidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Consolidator {
    /// Create a consolidator with the default configuration
    pub fn new() -> Self {
        let config = DedupConfig::default();
        Self {
            matcher: PairMatcher::with_weights(config.weights.clone()),
            config,
            metrics: Arc::new(DedupMetrics::new()),
        }
    }

    /// Create a consolidator from a validated configuration
    pub fn with_config(config: DedupConfig) -> Result<Self, DedupError> {
        config.validate()?;
        Ok(Self {
            matcher: PairMatcher::with_weights(config.weights.clone()),
            config,
            metrics: Arc::new(DedupMetrics::new()),
        })
    }

    /// Share a metrics sink with other consolidators
    pub fn with_metrics(mut self, metrics: Arc<DedupMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn metrics(&self) -> &DedupMetrics {
        &self.metrics
    }

    /// Score every cross-source pair and keep those above the threshold
    ///
    /// Records inside one bucket are never compared. With blocking enabled a
    /// pair is only scored when the leading characters of both normalized
    /// names agree.
    pub fn find_candidates<'a>(
        &self,
        records: &'a [Record],
        buckets: &[SourceBucket],
    ) -> CandidateSet<'a> {
        let block_keys: Option<Vec<String>> = self.config.blocking_prefix_len.map(|len| {
            records
                .iter()
                .map(|r| normalize_text(&r.name).chars().take(len).collect())
                .collect()
        });

        let mut set = CandidateSet::default();

        for (i, left) in buckets.iter().enumerate() {
            for right in &buckets[i + 1..] {
                set.bucket_pairs += 1;
                let before = set.candidates.len();

                let row = |&index_a: &usize| -> (Vec<MatchCandidate<'a>>, usize) {
                    let mut found = Vec::new();
                    let mut compared = 0;

                    for &index_b in &right.indices {
                        if let Some(keys) = &block_keys {
                            if keys[index_a] != keys[index_b] {
                                continue;
                            }
                        }

                        compared += 1;
                        if let Some(candidate) = self.matcher.evaluate(
                            &records[index_a],
                            index_a,
                            &records[index_b],
                            index_b,
                        ) {
                            found.push(candidate);
                        }
                    }

                    (found, compared)
                };

                // Rows come back in input order either way
                let rows: Vec<(Vec<MatchCandidate<'a>>, usize)> = if self.config.parallel {
                    left.indices.par_iter().map(row).collect()
                } else {
                    left.indices.iter().map(row).collect()
                };

                for (found, compared) in rows {
                    set.comparisons += compared;
                    set.candidates.extend(found);
                }

                debug!(
                    left = %left.source,
                    right = %right.source,
                    candidates = set.candidates.len() - before,
                    "Source pair compared"
                );
            }
        }

        set
    }

    /// Run the full consolidation pass
    ///
    /// Returns merged records in acceptance order followed by every record that
    /// was not part of an accepted match, in input order.
    pub fn consolidate(&self, records: &[Record]) -> ConsolidationOutput {
        let start = Instant::now();
        let mut report = ConsolidationReport::new(Utc::now());
        report.count_sources(records);

        info!(
            records = records.len(),
            parallel = self.config.parallel,
            blocking = ?self.config.blocking_prefix_len,
            "Starting consolidation"
        );

        let buckets = group_by_source(records);
        let found = self.find_candidates(records, &buckets);
        report.bucket_pairs = found.bucket_pairs;
        report.comparisons = found.comparisons;
        report.candidates = found.candidates.len();

        debug!(
            buckets = buckets.len(),
            comparisons = found.comparisons,
            candidates = found.candidates.len(),
            "Candidate search complete"
        );

        let accepted = resolve_matches(found.candidates);
        report.count_matches(&accepted);

        let mut consumed = vec![false; records.len()];
        let mut output = Vec::with_capacity(records.len().saturating_sub(accepted.len()));

        for candidate in &accepted {
            consumed[candidate.index_a] = true;
            consumed[candidate.index_b] = true;
            output.push(merge_candidate(candidate));
        }
        report.merged_records = output.len();

        output.extend(
            records
                .iter()
                .zip(&consumed)
                .filter(|&(_, &is_consumed)| !is_consumed)
                .map(|(record, _)| record.clone()),
        );
        report.unmatched_records = output.len() - report.merged_records;
        report.output_records = output.len();

        let elapsed = start.elapsed();
        report.record_elapsed(elapsed);
        self.metrics.record_run(&report, elapsed);

        info!(
            input = report.input_records,
            output = report.output_records,
            merged = report.merged_records,
            elapsed_ms = report.elapsed_ms,
            "Consolidation complete"
        );

        ConsolidationOutput {
            records: output,
            report,
        }
    }

    /// Consolidate and return only the records
    pub fn merge_records(&self, records: &[Record]) -> Vec<Record> {
        self.consolidate(records).records
    }
}
