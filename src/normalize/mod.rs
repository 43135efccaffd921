//! Text normalization: domain profiles and the tokenization pipeline.
//!
//! A [`DomainProfile`] carries the per-domain vocabulary (stop words,
//! literal rewrites, synonym expansions); a [`Normalizer`] applies it.
//! Both suggestion domains share this one implementation and differ only
//! in the profile they load.

// Module declarations
pub(crate) mod profile;
pub(crate) mod tokenize;

// Profiles and their construction
pub use profile::{DomainProfile, RewriteRule};

// The pipeline itself
pub use tokenize::{count_location_terms, Normalizer};
