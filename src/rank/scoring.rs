//! Similarity formulas for query/candidate token sets.
//!
//! Two formulas coexist and are selected per domain via [`ScoreStrategy`].
//! They are deliberately not unified: each domain's ranking quality was
//! tuned against its own formula, and the sort keys that follow the score
//! differ between them.

use crate::normalize::count_location_terms;
use crate::types::{SuggestionScope, SuggestionSource};
use ahash::AHashSet;

/// Flat bonus added when both query and candidate mention a position word.
///
/// Small relative to the F1 range so token overlap stays the primary signal;
/// it separates same-part candidates on different corners of the vehicle.
pub const LOCATION_BONUS: f64 = 0.08;

/// Which similarity formula a domain ranks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    /// Harmonic mean of precision and recall over token sets, plus the
    /// location bonus. The labour-time formula.
    OverlapF1,
    /// Shared-token fraction normalized by the larger set, with provenance
    /// tie-breaking in the sort. The parts formula.
    Jaccard,
}

impl ScoreStrategy {
    /// Result cap applied when the caller does not override it.
    pub const fn default_limit(self) -> usize {
        match self {
            Self::OverlapF1 => 8,
            Self::Jaccard => 10,
        }
    }

    /// Scores one candidate token set against the query token set.
    pub fn score(self, query: &[String], candidate: &[String]) -> f64 {
        match self {
            Self::OverlapF1 => f1_overlap(query, candidate),
            Self::Jaccard => jaccard_overlap(query, candidate),
        }
    }
}

/// F1 token overlap with location bonus.
///
/// Precision is the fraction of query tokens found in the candidate, recall
/// the fraction of candidate tokens found in the query, and the base score
/// their harmonic mean `2pr / (p + r)`. [`LOCATION_BONUS`] is added whenever
/// both sides contain at least one position word, including at zero token
/// overlap. Either side empty scores exactly `0.0`.
pub fn f1_overlap(query: &[String], candidate: &[String]) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let query_set: AHashSet<&str> = query.iter().map(String::as_str).collect();
    let candidate_set: AHashSet<&str> = candidate.iter().map(String::as_str).collect();
    let overlap = query_set.intersection(&candidate_set).count();

    let mut score = 0.0;
    if overlap > 0 {
        let precision = overlap as f64 / query_set.len() as f64;
        let recall = overlap as f64 / candidate_set.len() as f64;
        score = 2.0 * precision * recall / (precision + recall);
    }
    if count_location_terms(query) > 0 && count_location_terms(candidate) > 0 {
        score += LOCATION_BONUS;
    }
    score
}

/// Shared-token fraction normalized by the larger set.
///
/// Dividing by `max(|A|, |B|)` means only identical sets reach `1.0`; extra
/// tokens on either side dilute the score. Either side empty scores exactly
/// `0.0`.
pub fn jaccard_overlap(query: &[String], candidate: &[String]) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let query_set: AHashSet<&str> = query.iter().map(String::as_str).collect();
    let candidate_set: AHashSet<&str> = candidate.iter().map(String::as_str).collect();
    let overlap = query_set.intersection(&candidate_set).count();
    overlap as f64 / query_set.len().max(candidate_set.len()) as f64
}

/// Provenance tier for the parts sort, lower first: learned from this user's
/// own jobs, learned workshop-wide, preset, then everything else.
///
/// A learned candidate carrying no scope is indistinguishable from unknown
/// provenance and lands in the last tier.
pub(crate) const fn source_rank(source: SuggestionSource, scope: Option<SuggestionScope>) -> u8 {
    match (source, scope) {
        (SuggestionSource::Learned, Some(SuggestionScope::User)) => 0,
        (SuggestionSource::Learned, Some(SuggestionScope::Global)) => 1,
        (SuggestionSource::Preset, _) => 2,
        _ => 3,
    }
}
