//! Per-run consolidation summary

use crate::types::{MatchCandidate, MatchType, Record, Source};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of one consolidation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationReport {
    pub input_records: usize,
    pub records_by_source: BTreeMap<Source, usize>,
    /// Distinct source pairs compared
    pub bucket_pairs: usize,
    /// Record pairs scored
    pub comparisons: usize,
    /// Pairs above the acceptance threshold
    pub candidates: usize,
    pub accepted_matches: usize,
    pub matches_by_type: BTreeMap<MatchType, usize>,
    pub merged_records: usize,
    pub unmatched_records: usize,
    pub output_records: usize,
    pub elapsed_ms: u64,
    pub run_at: DateTime<Utc>,
}

impl ConsolidationReport {
    pub fn new(run_at: DateTime<Utc>) -> Self {
        Self {
            input_records: 0,
            records_by_source: BTreeMap::new(),
            bucket_pairs: 0,
            comparisons: 0,
            candidates: 0,
            accepted_matches: 0,
            matches_by_type: BTreeMap::new(),
            merged_records: 0,
            unmatched_records: 0,
            output_records: 0,
            elapsed_ms: 0,
            run_at,
        }
    }

    /// Count input records per source
    pub fn count_sources(&mut self, records: &[Record]) {
        self.input_records = records.len();
        for record in records {
            *self.records_by_source.entry(record.source).or_default() += 1;
        }
    }

    /// Store the run's wall time, saturating at `u64::MAX` milliseconds
    pub fn record_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    }

    /// Count accepted matches per match type
    pub fn count_matches(&mut self, accepted: &[MatchCandidate<'_>]) {
        self.accepted_matches = accepted.len();
        for candidate in accepted {
            *self.matches_by_type.entry(candidate.match_type).or_default() += 1;
        }
    }

    /// Records removed by merging
    pub fn reduction(&self) -> usize {
        self.input_records.saturating_sub(self.output_records)
    }
}

impl std::fmt::Display for ConsolidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Consolidation: {} → {} records",
            self.input_records, self.output_records
        )?;

        let sources: Vec<String> = self
            .records_by_source
            .iter()
            .map(|(source, count)| format!("{} {}", count, source))
            .collect();
        writeln!(f, "  Input: {}", sources.join(", "))?;

        writeln!(
            f,
            "  Pairs: {} source pairs, {} scored, {} candidates, {} accepted",
            self.bucket_pairs, self.comparisons, self.candidates, self.accepted_matches
        )?;

        let types: Vec<String> = self
            .matches_by_type
            .iter()
            .map(|(match_type, count)| format!("{} {}", count, match_type))
            .collect();
        if !types.is_empty() {
            writeln!(f, "  Match types: {}", types.join(", "))?;
        }

        writeln!(
            f,
            "  Output: {} merged, {} unique ({}ms)",
            self.merged_records, self.unmatched_records, self.elapsed_ms
        )?;
        Ok(())
    }
}

/// Result of a consolidation run
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationOutput {
    /// Merged records in acceptance order, then unmatched records in input order
    pub records: Vec<Record>,
    pub report: ConsolidationReport,
}
