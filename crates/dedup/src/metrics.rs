//! Consolidation metrics
//!
//! Cumulative counters across runs of one consolidator.

use crate::report::ConsolidationReport;
use crate::types::MatchType;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics for consolidation runs
#[derive(Debug, Default)]
pub struct DedupMetrics {
    /// Consolidation runs completed
    runs: AtomicU64,
    /// Input records processed
    records_processed: AtomicU64,
    /// Record pairs scored
    comparisons: AtomicU64,
    /// Pairs that cleared the acceptance threshold
    candidates: AtomicU64,
    /// Candidates accepted by the resolver
    accepted_matches: AtomicU64,
    name_address_matches: AtomicU64,
    name_phone_matches: AtomicU64,
    website_matches: AtomicU64,
    fuzzy_matches: AtomicU64,
    /// Run time in microseconds (exponential moving average)
    run_time_ema: AtomicU64,
    /// Peak run time in microseconds
    peak_run_time: AtomicU64,
}

impl DedupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run
    pub fn record_run(&self, report: &ConsolidationReport, duration: Duration) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.records_processed
            .fetch_add(report.input_records as u64, Ordering::Relaxed);
        self.comparisons
            .fetch_add(report.comparisons as u64, Ordering::Relaxed);
        self.candidates
            .fetch_add(report.candidates as u64, Ordering::Relaxed);
        self.accepted_matches
            .fetch_add(report.accepted_matches as u64, Ordering::Relaxed);

        for (match_type, count) in &report.matches_by_type {
            self.record_match_type(*match_type, *count as u64);
        }

        // EMA with α = 0.3: (3 * current + 7 * previous) / 10
        let duration_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let prev = self.run_time_ema.load(Ordering::Relaxed);
        let new_ema = if prev == 0 {
            duration_us
        } else {
            duration_us.saturating_mul(3).saturating_add(prev.saturating_mul(7)) / 10
        };
        self.run_time_ema.store(new_ema, Ordering::Relaxed);

        self.peak_run_time.fetch_max(duration_us, Ordering::Relaxed);
    }

    fn record_match_type(&self, match_type: MatchType, count: u64) {
        let counter = match match_type {
            MatchType::NameAddress => &self.name_address_matches,
            MatchType::NamePhone => &self.name_phone_matches,
            MatchType::Website => &self.website_matches,
            MatchType::Fuzzy => &self.fuzzy_matches,
        };
        counter.fetch_add(count, Ordering::Relaxed);
    }

    /// Share of scored pairs that became candidates (0.0 - 1.0)
    pub fn candidate_rate(&self) -> f64 {
        let comparisons = self.comparisons.load(Ordering::Relaxed) as f64;
        if comparisons == 0.0 {
            0.0
        } else {
            self.candidates.load(Ordering::Relaxed) as f64 / comparisons
        }
    }

    /// Share of candidates the resolver accepted (0.0 - 1.0)
    pub fn acceptance_rate(&self) -> f64 {
        let candidates = self.candidates.load(Ordering::Relaxed) as f64;
        if candidates == 0.0 {
            0.0
        } else {
            self.accepted_matches.load(Ordering::Relaxed) as f64 / candidates
        }
    }

    pub fn avg_run_time_ms(&self) -> f64 {
        self.run_time_ema.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn peak_run_time_ms(&self) -> f64 {
        self.peak_run_time.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            records_processed: self.records_processed.load(Ordering::Relaxed),
            comparisons: self.comparisons.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            accepted_matches: self.accepted_matches.load(Ordering::Relaxed),
            name_address_matches: self.name_address_matches.load(Ordering::Relaxed),
            name_phone_matches: self.name_phone_matches.load(Ordering::Relaxed),
            website_matches: self.website_matches.load(Ordering::Relaxed),
            fuzzy_matches: self.fuzzy_matches.load(Ordering::Relaxed),
            candidate_rate: self.candidate_rate(),
            acceptance_rate: self.acceptance_rate(),
            avg_run_time_ms: self.avg_run_time_ms(),
            peak_run_time_ms: self.peak_run_time_ms(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        for counter in [
            &self.runs,
            &self.records_processed,
            &self.comparisons,
            &self.candidates,
            &self.accepted_matches,
            &self.name_address_matches,
            &self.name_phone_matches,
            &self.website_matches,
            &self.fuzzy_matches,
            &self.run_time_ema,
            &self.peak_run_time,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub records_processed: u64,
    pub comparisons: u64,
    pub candidates: u64,
    pub accepted_matches: u64,
    pub name_address_matches: u64,
    pub name_phone_matches: u64,
    pub website_matches: u64,
    pub fuzzy_matches: u64,
    pub candidate_rate: f64,
    pub acceptance_rate: f64,
    pub avg_run_time_ms: f64,
    pub peak_run_time_ms: f64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Consolidation Metrics:")?;
        writeln!(
            f,
            "  Runs: {}, records processed: {}",
            self.runs, self.records_processed
        )?;
        writeln!(
            f,
            "  Pairs: {} scored, {} candidates ({:.1}%), {} accepted ({:.1}%)",
            self.comparisons,
            self.candidates,
            self.candidate_rate * 100.0,
            self.accepted_matches,
            self.acceptance_rate * 100.0
        )?;
        writeln!(
            f,
            "  Matches: {} name+address, {} name+phone, {} website, {} fuzzy",
            self.name_address_matches, self.name_phone_matches, self.website_matches, self.fuzzy_matches
        )?;
        writeln!(
            f,
            "  Performance: {:.2}ms avg, {:.2}ms peak",
            self.avg_run_time_ms, self.peak_run_time_ms
        )?;
        Ok(())
    }
}
