//! Pairwise record matching
//!
//! Scores two records from different sources by folding an ordered list of
//! rules over a running `(confidence, match_type)` state. Each rule reads the
//! state and the two records and either contributes or stays silent.

use crate::config::MatchWeights;
use crate::similarity::{normalize_host, normalize_text, phones_match, text_similarity};
use crate::types::{MatchCandidate, MatchType, Record};
use tracing::trace;

/// Scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Normalized names are identical
    ExactName,
    /// Names are similar, only tried when nothing has scored yet
    FuzzyName,
    /// Addresses are similar
    Address,
    /// Phone numbers match
    Phone,
    /// Website hosts match
    Website,
}

impl MatchRule {
    /// Evaluation order. Later rules win when they set the match type.
    pub const ORDER: [MatchRule; 5] = [
        MatchRule::ExactName,
        MatchRule::FuzzyName,
        MatchRule::Address,
        MatchRule::Phone,
        MatchRule::Website,
    ];
}

/// How a firing rule changes the provisional match type
#[derive(Debug, Clone, Copy)]
enum TypeEffect {
    Set(MatchType),
    /// Replaces the type only while it is still `Fuzzy`
    Upgrade(MatchType),
}

#[derive(Debug, Clone, Copy)]
struct Contribution {
    score: f64,
    effect: TypeEffect,
}

/// Outcome of scoring one pair
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    /// Sum of rule contributions, not clamped
    pub confidence: f64,
    pub match_type: MatchType,
    /// Rules that fired, in evaluation order
    pub rules: Vec<MatchRule>,
}

impl MatchScore {
    fn initial() -> Self {
        Self {
            confidence: 0.0,
            match_type: MatchType::Fuzzy,
            rules: Vec::new(),
        }
    }

    fn apply(mut self, rule: MatchRule, contribution: Contribution) -> Self {
        self.confidence += contribution.score;
        self.match_type = match contribution.effect {
            TypeEffect::Set(match_type) => match_type,
            TypeEffect::Upgrade(match_type) if self.match_type == MatchType::Fuzzy => match_type,
            TypeEffect::Upgrade(_) => self.match_type,
        };
        self.rules.push(rule);
        self
    }

    /// Check whether a rule contributed to this score
    pub fn fired(&self, rule: MatchRule) -> bool {
        self.rules.contains(&rule)
    }
}

/// Scores record pairs and emits match candidates
#[derive(Debug, Clone, Default)]
pub struct PairMatcher {
    weights: MatchWeights,
}

impl PairMatcher {
    /// Create a matcher with the default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom weights
    pub fn with_weights(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Run every rule over the pair
    pub fn score(&self, a: &Record, b: &Record) -> MatchScore {
        MatchRule::ORDER
            .iter()
            .fold(MatchScore::initial(), |state, &rule| {
                match self.contribution(rule, a, b, &state) {
                    Some(contribution) => state.apply(rule, contribution),
                    None => state,
                }
            })
    }

    fn contribution(
        &self,
        rule: MatchRule,
        a: &Record,
        b: &Record,
        state: &MatchScore,
    ) -> Option<Contribution> {
        let weights = &self.weights;

        match rule {
            MatchRule::ExactName => {
                let name_a = normalize_text(&a.name);
                (!name_a.trim().is_empty() && name_a == normalize_text(&b.name)).then_some(Contribution {
                    score: weights.exact_name,
                    effect: TypeEffect::Set(MatchType::NameAddress),
                })
            }
            MatchRule::FuzzyName => {
                if state.fired(MatchRule::ExactName) || state.confidence != 0.0 {
                    return None;
                }
                let similarity = text_similarity(&a.name, &b.name);
                (similarity > weights.fuzzy_name_threshold).then_some(Contribution {
                    score: similarity * weights.fuzzy_name,
                    effect: TypeEffect::Set(MatchType::Fuzzy),
                })
            }
            MatchRule::Address => {
                let (address_a, address_b) = (filled(&a.address)?, filled(&b.address)?);
                let similarity = text_similarity(address_a, address_b);
                (similarity > weights.address_threshold).then_some(Contribution {
                    score: similarity * weights.address,
                    effect: TypeEffect::Upgrade(MatchType::NameAddress),
                })
            }
            MatchRule::Phone => {
                let (phone_a, phone_b) = (filled_opt(&a.phone)?, filled_opt(&b.phone)?);
                phones_match(phone_a, phone_b).then_some(Contribution {
                    score: weights.phone,
                    effect: TypeEffect::Set(MatchType::NamePhone),
                })
            }
            MatchRule::Website => {
                let (site_a, site_b) = (filled_opt(&a.website)?, filled_opt(&b.website)?);
                (normalize_host(site_a) == normalize_host(site_b)).then_some(Contribution {
                    score: weights.website,
                    effect: TypeEffect::Set(MatchType::Website),
                })
            }
        }
    }

    /// Score a pair and return a candidate if it clears the acceptance threshold
    ///
    /// `index_a` and `index_b` are the records' positions in the consolidation
    /// input. Records from the same source never match.
    pub fn evaluate<'a>(
        &self,
        a: &'a Record,
        index_a: usize,
        b: &'a Record,
        index_b: usize,
    ) -> Option<MatchCandidate<'a>> {
        if a.source == b.source {
            return None;
        }

        let score = self.score(a, b);

        trace!(
            record_a = %a.id,
            record_b = %b.id,
            confidence = score.confidence,
            match_type = %score.match_type,
            "Pair scored"
        );

        (score.confidence > self.weights.accept_threshold).then(|| MatchCandidate {
            record_a: a,
            record_b: b,
            index_a,
            index_b,
            confidence: score.confidence,
            match_type: score.match_type,
        })
    }

    /// Check if two records would produce a candidate
    pub fn matches(&self, a: &Record, b: &Record) -> bool {
        self.evaluate(a, 0, b, 1).is_some()
    }
}

fn filled(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.trim().is_empty())
}

fn filled_opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn maps(id: &str, name: &str) -> Record {
        Record::new(id, name, Source::MapsService)
    }

    fn reviews(id: &str, name: &str) -> Record {
        Record::new(id, name, Source::ReviewSite)
    }

    #[test]
    fn test_exact_name_and_phone_is_not_enough() {
        let matcher = PairMatcher::new();
        let a = maps("a", "ABC Plumbing Services").with_phone("+1-555-123-4567");
        let b = reviews("b", "ABC Plumbing Services").with_phone("555-123-4567");

        let score = matcher.score(&a, &b);
        assert_eq!(score.confidence, 0.7);
        assert_eq!(score.rules, vec![MatchRule::ExactName, MatchRule::Phone]);
        assert!(matcher.evaluate(&a, 0, &b, 1).is_none());
    }

    #[test]
    fn test_exact_name_phone_and_address() {
        let matcher = PairMatcher::new();
        let a = maps("a", "ABC Plumbing Services")
            .with_phone("+1-555-123-4567")
            .with_address("42 Elm Street, Springfield");
        let b = reviews("b", "ABC Plumbing Services")
            .with_phone("555-123-4567")
            .with_address("42 Elm Street, Springfield");

        let candidate = matcher.evaluate(&a, 0, &b, 1).expect("should match");
        assert_eq!(candidate.confidence, 1.0);
        // Phone runs after address and overrides the type
        assert_eq!(candidate.match_type, MatchType::NamePhone);
        assert_eq!(candidate.index_a, 0);
        assert_eq!(candidate.index_b, 1);
    }

    #[test]
    fn test_exact_name_and_address_only_is_not_enough() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Blue Door Bakery").with_address("12 Main St");
        let b = reviews("b", "Blue Door Bakery").with_address("12 Main St");

        let score = matcher.score(&a, &b);
        assert_eq!(score.confidence, 0.7);
        assert_eq!(score.match_type, MatchType::NameAddress);
        assert!(!matcher.matches(&a, &b));
    }

    #[test]
    fn test_fuzzy_name_upgraded_by_address() {
        let matcher = PairMatcher::new();
        let a = maps("a", "ABC Plumbing Services").with_address("42 Elm Street");
        let b = reviews("b", "ABC Plumbing Service").with_address("42 Elm Street");

        let score = matcher.score(&a, &b);
        assert_eq!(score.rules, vec![MatchRule::FuzzyName, MatchRule::Address]);
        assert_eq!(score.match_type, MatchType::NameAddress);
        assert!(score.confidence > 0.58 && score.confidence < 0.59);
    }

    #[test]
    fn test_fuzzy_name_skipped_after_exact_name() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Blue Door Bakery");
        let b = reviews("b", "blue door bakery!");

        let score = matcher.score(&a, &b);
        assert_eq!(score.rules, vec![MatchRule::ExactName]);
        assert_eq!(score.confidence, 0.4);
    }

    #[test]
    fn test_fuzzy_name_below_threshold() {
        let matcher = PairMatcher::new();
        let score = matcher.score(&maps("a", "Blue Door Bakery"), &reviews("b", "Red Door Cafe"));
        assert!(score.rules.is_empty());
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_trailing_punctuation_falls_back_to_fuzzy() {
        let matcher = PairMatcher::new();
        let score = matcher.score(&maps("a", "Joe's Pizza !"), &reviews("b", "Joe's Pizza"));

        assert_eq!(score.rules, vec![MatchRule::FuzzyName]);
        // One extra trailing space out of eleven characters
        assert!((score.confidence - (10.0 / 11.0) * 0.3).abs() < 1e-9);
        assert_eq!(score.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_website_overrides_type() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Sunrise Dental").with_website("https://www.sunrisedental.com/");
        let b = reviews("b", "Sunrise Dental").with_website("http://WWW.SUNRISEDENTAL.COM/contact");

        let candidate = matcher.evaluate(&a, 0, &b, 1).expect("should match");
        assert_eq!(candidate.match_type, MatchType::Website);
        assert!((candidate.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_all_rules_can_exceed_one() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Sunrise Dental")
            .with_address("9 Oak Ave")
            .with_phone("555 867 5309")
            .with_website("http://sunrisedental.com");
        let b = reviews("b", "Sunrise Dental")
            .with_address("9 Oak Ave")
            .with_phone("(555) 867-5309")
            .with_website("https://sunrisedental.com");

        let candidate = matcher.evaluate(&a, 0, &b, 1).expect("should match");
        assert!((candidate.confidence - 1.4).abs() < 1e-9);
        assert_eq!(candidate.display_confidence(), 1.0);
        assert_eq!(candidate.match_type, MatchType::Website);
    }

    #[test]
    fn test_missing_fields_contribute_nothing() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Sunrise Dental").with_phone("   ").with_website("");
        let b = reviews("b", "Sunrise Dental").with_phone("").with_website("");

        let score = matcher.score(&a, &b);
        assert_eq!(score.rules, vec![MatchRule::ExactName]);
    }

    #[test]
    fn test_same_source_never_matches() {
        let matcher = PairMatcher::new();
        let a = maps("a", "Sunrise Dental").with_website("sunrisedental.com").with_phone("5558675309");
        let b = maps("b", "Sunrise Dental").with_website("sunrisedental.com").with_phone("5558675309");

        assert!(matcher.score(&a, &b).confidence > 0.7);
        assert!(matcher.evaluate(&a, 0, &b, 1).is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let weights = MatchWeights {
            accept_threshold: 0.5,
            ..MatchWeights::default()
        };
        let matcher = PairMatcher::with_weights(weights);
        let a = maps("a", "Blue Door Bakery").with_address("12 Main St");
        let b = reviews("b", "Blue Door Bakery").with_address("12 Main St");

        assert!(matcher.matches(&a, &b));
    }
}
