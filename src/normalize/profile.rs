//! Domain profiles: the vocabulary data that specializes the generic
//! normalizer to one suggestion domain.

use crate::error::ProfileError;
use ahash::{AHashMap, AHashSet};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Minimum token length applied when a profile does not set its own.
const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// One literal substring rewrite applied before tokenization.
///
/// Rewrites run in table order on the lowercased text, so punctuation
/// variants can be folded onto a canonical token before stripping removes
/// the punctuation (`"o/s/f"` must rewrite before `"o/s"` does).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewriteRule {
    pub find: String,
    pub replace: String,
}

/// Vocabulary configuration for one suggestion domain.
///
/// Two profiles ship built in (see [`crate::domains`]). A further domain is
/// pure data: either construct one from static slices or load it from TOML,
/// where rewrites use an array of tables to keep their order:
///
/// ```toml
/// name = "glass"
/// min_token_len = 2
/// stop_words = ["the", "and", "replace"]
///
/// [[rewrites]]
/// find = "wind screen"
/// replace = "windscreen"
///
/// [synonyms]
/// windscreen = ["screen", "glass"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DomainProfile {
    pub name: String,
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    #[serde(default)]
    pub stop_words: AHashSet<String>,
    #[serde(default)]
    pub rewrites: Vec<RewriteRule>,
    #[serde(default)]
    pub synonyms: AHashMap<String, Vec<String>>,
}

fn default_min_token_len() -> usize {
    DEFAULT_MIN_TOKEN_LEN
}

impl DomainProfile {
    /// Builds a profile from static vocabulary slices.
    pub fn from_static(
        name: &str,
        min_token_len: usize,
        stop_words: &[&str],
        rewrites: &[(&str, &str)],
        synonyms: &[(&str, &[&str])],
    ) -> Self {
        Self {
            name: name.to_string(),
            min_token_len,
            stop_words: stop_words.iter().map(|w| (*w).to_string()).collect(),
            rewrites: rewrites
                .iter()
                .map(|(find, replace)| RewriteRule {
                    find: (*find).to_string(),
                    replace: (*replace).to_string(),
                })
                .collect(),
            synonyms: synonyms
                .iter()
                .map(|(token, expansion)| {
                    let expansion = expansion.iter().map(|s| (*s).to_string()).collect();
                    ((*token).to_string(), expansion)
                })
                .collect(),
        }
    }

    /// Parses and validates a profile from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        let profile: Self = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reads and parses a profile file.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile file {}", path.display()))?;
        let profile = Self::from_toml_str(&text)
            .with_context(|| format!("invalid profile file {}", path.display()))?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.min_token_len == 0 {
            return Err(ProfileError::ZeroTokenLength {
                name: self.name.clone(),
            });
        }
        for (index, rule) in self.rewrites.iter().enumerate() {
            if rule.find.is_empty() {
                return Err(ProfileError::EmptyRewrite {
                    name: self.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub(crate) fn synonyms_of(&self, token: &str) -> Option<&[String]> {
        self.synonyms.get(token).map(Vec::as_slice)
    }
}
