//! The normalization pipeline: raw free text to an ordered token set.

use crate::normalize::profile::DomainProfile;
use ahash::AHashSet;
use regex::Regex;

/// Fixed vocabulary of position words recognized by the labour-time bonus.
///
/// The compound forms are only ever produced by synonym tables; raw text
/// cannot yield them because stripping never leaves an underscore behind.
pub(crate) const LOCATION_TERMS: &[&str] = &[
    "offside",
    "nearside",
    "front",
    "rear",
    "offside_front",
    "offside_rear",
    "nearside_front",
    "nearside_rear",
];

/// Counts tokens present in the fixed location vocabulary.
pub fn count_location_terms(tokens: &[String]) -> usize {
    tokens
        .iter()
        .filter(|token| LOCATION_TERMS.contains(&token.as_str()))
        .count()
}

/// Applies one domain profile's normalization pipeline.
///
/// The pipeline, in order: lowercase and trim, run the profile's literal
/// rewrites, replace everything outside `[a-z0-9\s]` with a space, collapse
/// whitespace, split, drop stop-words and too-short tokens, append synonyms
/// after their base token, and deduplicate keeping first occurrence.
///
/// Every method is total: empty or garbage input yields an empty result,
/// never an error.
#[derive(Debug, Clone)]
pub struct Normalizer {
    profile: DomainProfile,
    non_token: Regex,
    whitespace: Regex,
}

impl Normalizer {
    pub fn new(profile: DomainProfile) -> Self {
        // Fixed patterns; compilation cannot fail.
        let non_token = Regex::new(r"[^a-z0-9\s]+").unwrap();
        let whitespace = Regex::new(r"\s+").unwrap();
        Self {
            profile,
            non_token,
            whitespace,
        }
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    /// Canonical cleaned form of `text`: lowercased, rewrites applied,
    /// punctuation replaced by spaces, whitespace collapsed. Idempotent.
    pub fn normalize_text(&self, text: &str) -> String {
        let mut current = text.to_lowercase().trim().to_string();
        if current.is_empty() {
            return current;
        }
        for rule in &self.profile.rewrites {
            current = current.replace(&rule.find, &rule.replace);
        }
        let stripped = self.non_token.replace_all(&current, " ");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }

    /// Ordered token set of `text`: first-occurrence order, duplicates
    /// removed, stop-words and short tokens dropped, synonyms appended
    /// directly after their base token (one level, never recursive).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize_text(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<String> = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        for word in normalized.split(' ') {
            if word.len() < self.profile.min_token_len || self.profile.is_stop_word(word) {
                continue;
            }
            if seen.insert(word) {
                out.push(word.to_string());
            }
            if let Some(expansion) = self.profile.synonyms_of(word) {
                for synonym in expansion {
                    if seen.insert(synonym.as_str()) {
                        out.push(synonym.clone());
                    }
                }
            }
        }
        out
    }

    /// Space-joined [`tokenize`](Self::tokenize) output, used as cache key
    /// and stable display identifier.
    ///
    /// Tokens keep first-occurrence order, so two wordings with the same
    /// token set but different word order produce different keys even though
    /// they score identically. Cache keys inherit that: a reordered query is
    /// a cache miss, not a collision.
    pub fn normalized_key(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }
}
