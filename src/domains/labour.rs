//! Labour-time domain: vocabulary, payload and engine constructor.
//!
//! Queries are job descriptions typed on a job sheet ("replace n/s/f pads");
//! candidates are previously billed labour lines with standard hours. The
//! vocabulary centres on vehicle position abbreviations, which the rewrite
//! table canonicalizes and the synonym table fans out so `nsf` matches
//! `nearside front`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::TtlCache;
use crate::engine::{CandidateSource, Engine, EngineConfig, RankedList};
use crate::normalize::DomainProfile;
use crate::rank::ScoreStrategy;

const MIN_TOKEN_LEN: usize = 2;

/// Job-sheet verbs and filler words that carry no matching signal.
const STOP_WORDS: &[&str] = &[
    "a",
    "all",
    "an",
    "and",
    "are",
    "as",
    "at",
    "be",
    "both",
    "carry",
    "check",
    "fit",
    "fitted",
    "fitting",
    "for",
    "from",
    "in",
    "into",
    "is",
    "needed",
    "needs",
    "of",
    "on",
    "or",
    "out",
    "please",
    "renew",
    "renewed",
    "replace",
    "replaced",
    "replacement",
    "require",
    "required",
    "supplied",
    "supply",
    "the",
    "to",
    "with",
];

/// Applied in order; the three-part slash forms must run before the
/// two-part ones they contain.
const REWRITES: &[(&str, &str)] = &[
    ("off side", "offside"),
    ("off-side", "offside"),
    ("near side", "nearside"),
    ("near-side", "nearside"),
    ("o/s/f", "osf"),
    ("n/s/f", "nsf"),
    ("o/s/r", "osr"),
    ("n/s/r", "nsr"),
    ("o/s", "offside"),
    ("n/s", "nearside"),
    ("anti roll", "antiroll"),
    ("anti-roll", "antiroll"),
    ("hand brake", "handbrake"),
    ("hand-brake", "handbrake"),
    ("head lamp", "headlamp"),
    ("head light", "headlight"),
    ("wish bone", "wishbone"),
];

/// One level of expansion. Position abbreviations fan out to their corner
/// words plus the compound form the location bonus recognizes; part nouns
/// bridge singular and plural.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("osf", &["offside", "front", "offside_front"]),
    ("osr", &["offside", "rear", "offside_rear"]),
    ("nsf", &["nearside", "front", "nearside_front"]),
    ("nsr", &["nearside", "rear", "nearside_rear"]),
    ("os", &["offside"]),
    ("ns", &["nearside"]),
    ("pads", &["pad"]),
    ("pad", &["pads"]),
    ("discs", &["disc"]),
    ("disc", &["discs"]),
    ("brakes", &["brake"]),
    ("brake", &["brakes"]),
    ("tyres", &["tyre"]),
    ("tyre", &["tyres"]),
    ("shocks", &["shock"]),
    ("springs", &["spring"]),
    ("spring", &["springs"]),
    ("wipers", &["wiper"]),
    ("wiper", &["wipers"]),
    ("bulbs", &["bulb"]),
    ("bulb", &["bulbs"]),
];

/// The labour-time vocabulary.
pub fn profile() -> DomainProfile {
    DomainProfile::from_static("labour", MIN_TOKEN_LEN, STOP_WORDS, REWRITES, SYNONYMS)
}

/// Labour payload carried through ranking untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabourFields {
    /// Standard hours billed for this job line.
    #[serde(default, alias = "timeHours")]
    pub time_hours: f64,
}

/// Ready-made labour-time engine: F1 strategy, default limit 8, cache keys
/// under `labour:`.
pub fn labour_engine<S>(
    source: S,
    cache: Arc<TtlCache<RankedList<LabourFields>>>,
) -> Engine<LabourFields, S>
where
    S: CandidateSource<LabourFields>,
{
    let config = EngineConfig::new(profile(), ScoreStrategy::OverlapF1, "labour:");
    Engine::new(config, source, cache)
}
