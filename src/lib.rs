//! Ranked, cached text suggestions for workshop job sheets.
//!
//! Free-text queries are normalized against a domain vocabulary, matched
//! against previously used candidates, scored, and returned as a capped,
//! deterministically ordered list. Ranked lists are cached with a TTL and
//! concurrent lookups for the same query share a single source fetch.

pub mod cache;
pub mod domains;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod rank;
pub mod tracing;
pub mod types;

pub use cache::TtlCache;
pub use domains::{labour_engine, parts_engine, LabourFields, PartFields, PartSuggestion};
pub use engine::{CandidateSource, Engine, EngineConfig, RankedList, DEFAULT_TTL};
pub use error::{ProfileError, Result, SuggestError};
pub use normalize::{count_location_terms, DomainProfile, Normalizer, RewriteRule};
pub use rank::{rank_suggestions, score_match, ScoreStrategy, LOCATION_BONUS};
pub use types::{Candidate, Suggestion, SuggestionScope, SuggestionSource};
