//! Error handling types and utilities.

/// A specialized Result type for workshop-suggest operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a domain profile fails to parse or validate.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The profile document is not valid TOML.
    #[error("failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),
    /// The profile has no name.
    #[error("profile name must not be empty")]
    EmptyName,
    /// A minimum token length of zero would keep empty tokens.
    #[error("profile '{name}': min_token_len must be at least 1")]
    ZeroTokenLength { name: String },
    /// A rewrite rule with an empty find pattern matches everywhere.
    #[error("profile '{name}': rewrite rule {index} has an empty find pattern")]
    EmptyRewrite { name: String, index: usize },
}

/// Error returned when the engine facade cannot produce suggestions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SuggestError {
    /// The candidate source failed while fetching.
    #[error("candidate source failed: {0}")]
    Source(String),
}
