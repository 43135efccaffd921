//! The two production suggestion domains as static configuration.
//!
//! Everything domain-specific lives here as data (vocabulary tables, payload
//! types, engine constructors); the normalizer, ranker, cache and engine are
//! shared machinery. Adding a third domain means adding a module shaped like
//! these two, or loading a [`DomainProfile`](crate::normalize::DomainProfile)
//! from TOML at runtime.

// Module declarations
pub mod labour;
pub mod parts;

// Domain constructors and payloads
pub use labour::{labour_engine, LabourFields};
pub use parts::{parts_engine, PartFields, PartSuggestion};
