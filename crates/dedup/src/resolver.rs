//! Greedy one-to-one match resolution
//!
//! Candidates are accepted strongest first; a record that already belongs to an
//! accepted match blocks every weaker candidate that mentions it. This is an
//! approximation of maximum-weight matching that is deterministic for a given
//! candidate order.

use crate::types::MatchCandidate;
use tracing::debug;

/// Select a conflict-free subset of candidates
///
/// Candidates are stable-sorted by confidence, highest first, so ties keep the
/// order in which they were generated. The returned matches are in acceptance
/// order and no record index appears twice.
pub fn resolve_matches<'a>(mut candidates: Vec<MatchCandidate<'a>>) -> Vec<MatchCandidate<'a>> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let slots = candidates
        .iter()
        .map(|c| c.index_a.max(c.index_b) + 1)
        .max()
        .unwrap_or(0);
    let mut consumed = vec![false; slots];
    let mut accepted = Vec::new();

    for candidate in candidates {
        if consumed[candidate.index_a] || consumed[candidate.index_b] {
            continue;
        }

        consumed[candidate.index_a] = true;
        consumed[candidate.index_b] = true;

        debug!(
            record_a = %candidate.record_a.id,
            record_b = %candidate.record_b.id,
            confidence = candidate.confidence,
            match_type = %candidate.match_type,
            "Match accepted"
        );

        accepted.push(candidate);
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchType, Record, Source};

    fn candidate<'a>(
        records: &'a [Record],
        index_a: usize,
        index_b: usize,
        confidence: f64,
    ) -> MatchCandidate<'a> {
        MatchCandidate {
            record_a: &records[index_a],
            record_b: &records[index_b],
            index_a,
            index_b,
            confidence,
            match_type: MatchType::NamePhone,
        }
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new("a", "A", Source::MapsService),
            Record::new("b", "B", Source::ReviewSite),
            Record::new("c", "C", Source::SocialPage),
            Record::new("d", "D", Source::ReviewSite),
        ]
    }

    #[test]
    fn test_higher_confidence_wins() {
        let records = records();
        // a-b and b-c share b
        let candidates = vec![
            candidate(&records, 0, 1, 0.8),
            candidate(&records, 1, 2, 0.95),
        ];

        let accepted = resolve_matches(candidates);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].record_a.id, "b");
        assert_eq!(accepted[0].record_b.id, "c");
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let records = records();
        let candidates = vec![
            candidate(&records, 0, 1, 0.9),
            candidate(&records, 0, 3, 0.9),
        ];

        let accepted = resolve_matches(candidates);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].record_b.id, "b");
    }

    #[test]
    fn test_disjoint_candidates_all_accepted_in_confidence_order() {
        let records = records();
        let candidates = vec![
            candidate(&records, 0, 1, 0.75),
            candidate(&records, 2, 3, 1.1),
        ];

        let accepted = resolve_matches(candidates);
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].record_a.id, "c");
        assert_eq!(accepted[1].record_a.id, "a");
    }

    #[test]
    fn test_no_record_consumed_twice() {
        let records = records();
        let candidates = vec![
            candidate(&records, 0, 1, 0.9),
            candidate(&records, 0, 2, 0.85),
            candidate(&records, 2, 1, 0.8),
            candidate(&records, 2, 3, 0.75),
        ];

        let accepted = resolve_matches(candidates);
        let mut seen = std::collections::HashSet::new();
        for m in &accepted {
            assert!(seen.insert(m.index_a));
            assert!(seen.insert(m.index_b));
        }
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(resolve_matches(Vec::new()).is_empty());
    }
}
