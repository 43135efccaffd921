//! Ranking: scoring strategies, the sort, and projection to suggestions.

// Module declarations
pub(crate) mod ranker;
pub(crate) mod scoring;

// Ranking entry points
pub use ranker::{rank_suggestions, score_match};

// Strategies and score functions
pub use scoring::{f1_overlap, jaccard_overlap, ScoreStrategy, LOCATION_BONUS};
