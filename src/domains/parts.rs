//! Parts domain: vocabulary, payload, projection and engine constructor.
//!
//! Queries are fault descriptions as reported by the customer ("grinding
//! noise when braking"); candidates are stocklist searches previously raised
//! against similar faults. The vocabulary therefore bridges complaint words
//! to part words (`squeal` to `squeak` and `noise`) rather than canonical
//! position forms, and ranking favours provenance over raw usage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::TtlCache;
use crate::engine::{CandidateSource, Engine, EngineConfig, RankedList};
use crate::normalize::DomainProfile;
use crate::rank::ScoreStrategy;
use crate::types::{Suggestion, SuggestionScope, SuggestionSource};

const MIN_TOKEN_LEN: usize = 2;

/// Reporting phrases from the front desk that carry no matching signal.
const STOP_WORDS: &[&str] = &[
    "a",
    "advise",
    "advised",
    "an",
    "and",
    "are",
    "as",
    "at",
    "be",
    "check",
    "customer",
    "for",
    "from",
    "has",
    "have",
    "in",
    "investigate",
    "is",
    "it",
    "of",
    "on",
    "or",
    "possible",
    "quote",
    "reported",
    "reports",
    "required",
    "states",
    "the",
    "to",
    "when",
    "with",
];

/// Applied in order; compound part names fuse before punctuation stripping
/// would split them, and the three-part slash forms run before the two-part
/// ones they contain.
const REWRITES: &[(&str, &str)] = &[
    ("wind screen", "windscreen"),
    ("wind-screen", "windscreen"),
    ("head lamp", "headlamp"),
    ("head-lamp", "headlamp"),
    ("head light", "headlight"),
    ("head-light", "headlight"),
    ("cam belt", "cambelt"),
    ("cam-belt", "cambelt"),
    ("anti roll", "antiroll"),
    ("anti-roll", "antiroll"),
    ("number plate", "numberplate"),
    ("o/s/f", "osf"),
    ("n/s/f", "nsf"),
    ("o/s/r", "osr"),
    ("n/s/r", "nsr"),
    ("o/s", "offside"),
    ("n/s", "nearside"),
];

/// One level of expansion, mostly complaint-to-part bridges.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("squeal", &["squeak", "noise"]),
    ("squeak", &["squeal", "noise"]),
    ("grinding", &["grind", "noise"]),
    ("judder", &["shudder", "vibration"]),
    ("rattle", &["knock", "noise"]),
    ("leak", &["leaking"]),
    ("leaking", &["leak"]),
    ("windscreen", &["screen", "glass"]),
    ("headlamp", &["headlight"]),
    ("headlight", &["headlamp"]),
    ("bulb", &["lamp", "light"]),
    ("cambelt", &["timing", "belt"]),
    ("dpf", &["particulate", "filter"]),
    ("egr", &["valve"]),
    ("cat", &["catalytic", "converter"]),
    ("abs", &["sensor"]),
    ("pads", &["pad"]),
    ("pad", &["pads"]),
    ("discs", &["disc"]),
    ("disc", &["discs"]),
    ("tyres", &["tyre"]),
    ("tyre", &["tyres"]),
    ("osf", &["offside", "front", "offside_front"]),
    ("nsf", &["nearside", "front", "nearside_front"]),
    ("osr", &["offside", "rear", "offside_rear"]),
    ("nsr", &["nearside", "rear", "nearside_rear"]),
];

/// The parts vocabulary.
pub fn profile() -> DomainProfile {
    DomainProfile::from_static("parts", MIN_TOKEN_LEN, STOP_WORDS, REWRITES, SYNONYMS)
}

/// Parts payload carried through ranking untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartFields {
    /// Stocklist search string the original part line was raised with.
    #[serde(default)]
    pub query: String,
}

/// Wire shape of one parts suggestion, provenance spelled out for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSuggestion {
    pub id: String,
    /// Stocklist search to pre-fill when the suggestion is accepted.
    pub query: String,
    pub source: SuggestionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<SuggestionScope>,
    pub reason: &'static str,
}

const fn reason_for(source: SuggestionSource, scope: Option<SuggestionScope>) -> &'static str {
    match (source, scope) {
        (SuggestionSource::Learned, Some(SuggestionScope::User)) => "used before on your jobs",
        (SuggestionSource::Learned, Some(SuggestionScope::Global)) => "used across the workshop",
        (SuggestionSource::Preset, _) => "preset for this work type",
        _ => "related match",
    }
}

/// Projects ranked parts suggestions into their wire shape, deriving the
/// reason line from provenance. Order is preserved.
pub fn project(ranked: &[Suggestion<PartFields>]) -> Vec<PartSuggestion> {
    ranked
        .iter()
        .map(|suggestion| PartSuggestion {
            id: suggestion.id.clone(),
            query: suggestion.payload.query.clone(),
            source: suggestion.source,
            scope: suggestion.scope,
            reason: reason_for(suggestion.source, suggestion.scope),
        })
        .collect()
}

/// Ready-made parts engine: Jaccard strategy, default limit 10, cache keys
/// under `parts:`.
pub fn parts_engine<S>(
    source: S,
    cache: Arc<TtlCache<RankedList<PartFields>>>,
) -> Engine<PartFields, S>
where
    S: CandidateSource<PartFields>,
{
    let config = EngineConfig::new(profile(), ScoreStrategy::Jaccard, "parts:");
    Engine::new(config, source, cache)
}
