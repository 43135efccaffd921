//! Candidate ordering and projection into ranked suggestions.

use std::cmp::Ordering;

use crate::normalize::Normalizer;
use crate::rank::scoring::{source_rank, ScoreStrategy};
use crate::types::{Candidate, Suggestion};

/// A candidate paired with its score and its position in the input slice.
///
/// The input position serves two roles: it is the fallback for a missing
/// `default_order`, and it is the final tie-break key so the sort order is
/// total regardless of how many earlier keys compare equal.
struct ScoredCandidate<'a, P> {
    candidate: &'a Candidate<P>,
    index: usize,
    score: f64,
}

impl<P> ScoredCandidate<'_, P> {
    fn effective_order(&self) -> u32 {
        self.candidate
            .default_order
            .unwrap_or_else(|| u32::try_from(self.index).unwrap_or(u32::MAX))
    }
}

fn compare_overlap_f1<P>(a: &ScoredCandidate<'_, P>, b: &ScoredCandidate<'_, P>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.candidate.usage_count.cmp(&a.candidate.usage_count))
        .then_with(|| a.effective_order().cmp(&b.effective_order()))
        .then_with(|| a.index.cmp(&b.index))
}

fn compare_jaccard<P>(a: &ScoredCandidate<'_, P>, b: &ScoredCandidate<'_, P>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            source_rank(a.candidate.source, a.candidate.scope)
                .cmp(&source_rank(b.candidate.source, b.candidate.scope))
        })
        .then_with(|| b.candidate.usage_count.cmp(&a.candidate.usage_count))
        .then_with(|| a.index.cmp(&b.index))
}

/// Builds the token set a candidate is scored on.
///
/// The F1 strategy folds tags into the candidate text before tokenizing;
/// the Jaccard strategy scores the stored text alone.
fn assemble_tokens(
    normalizer: &Normalizer,
    strategy: ScoreStrategy,
    text: &str,
    tags: &[String],
) -> Vec<String> {
    match strategy {
        ScoreStrategy::OverlapF1 if !tags.is_empty() => {
            let mut combined = text.to_string();
            for tag in tags {
                combined.push(' ');
                combined.push_str(tag);
            }
            normalizer.tokenize(&combined)
        }
        _ => normalizer.tokenize(text),
    }
}

/// Scores a single candidate text (plus tags) against a query, both given as
/// raw strings. Empty or all-stop-word input on either side scores `0.0`.
pub fn score_match(
    normalizer: &Normalizer,
    strategy: ScoreStrategy,
    query_text: &str,
    candidate_text: &str,
    candidate_tags: &[String],
) -> f64 {
    let query_tokens = normalizer.tokenize(query_text);
    let candidate_tokens = assemble_tokens(normalizer, strategy, candidate_text, candidate_tags);
    strategy.score(&query_tokens, &candidate_tokens)
}

/// Ranks `candidates` against `query_text` and returns at most `limit`
/// projected suggestions.
///
/// Zero-score candidates are dropped before sorting, so an unmatchable query
/// yields an empty list rather than `limit` arbitrary entries. Truncation
/// happens after the sort and never reorders: the returned list is always a
/// prefix of the full ranking. Deterministic for fixed inputs.
pub fn rank_suggestions<P: Clone>(
    normalizer: &Normalizer,
    strategy: ScoreStrategy,
    query_text: &str,
    candidates: &[Candidate<P>],
    limit: usize,
) -> Vec<Suggestion<P>> {
    let query_tokens = normalizer.tokenize(query_text);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredCandidate<'_, P>> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let tokens = assemble_tokens(normalizer, strategy, &candidate.text, &candidate.tags);
            let score = strategy.score(&query_tokens, &tokens);
            (score > 0.0).then_some(ScoredCandidate {
                candidate,
                index,
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| match strategy {
        ScoreStrategy::OverlapF1 => compare_overlap_f1(a, b),
        ScoreStrategy::Jaccard => compare_jaccard(a, b),
    });

    scored
        .iter()
        .take(limit)
        .map(|entry| project(normalizer, entry))
        .collect()
}

fn project<P: Clone>(normalizer: &Normalizer, entry: &ScoredCandidate<'_, P>) -> Suggestion<P> {
    let candidate = entry.candidate;
    Suggestion {
        id: candidate.id.clone(),
        source: candidate.source,
        scope: candidate.scope,
        display: candidate.text.clone(),
        normalized_key: normalizer.normalized_key(&candidate.text),
        score: entry.score,
        usage_count: candidate.usage_count,
        payload: candidate.payload.clone(),
    }
}
