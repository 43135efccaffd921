//! Shared domain types: candidates going into the ranker and the suggestion
//! projections coming out.
//!
//! Candidate rows arrive from callers as JSON (learned entries, curated
//! presets, catalog items). The numeric fields on those rows are not trusted:
//! `usage_count` and `default_order` deserialize through lenient visitors that
//! coerce strings, fractions, negatives, and garbage to a safe default instead
//! of failing the whole batch. That coercion happens once, here, at the type
//! boundary; everything downstream works with plain typed fields.

use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Where a candidate record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// Learned from completed jobs.
    Learned,
    /// Curated preset shipped with the product.
    Preset,
    /// Anything else found in the row.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SuggestionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learned => "learned",
            Self::Preset => "preset",
            Self::Unknown => "unknown",
        }
    }
}

/// Visibility scope of a learned candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionScope {
    /// Learned from the requesting user's own jobs.
    User,
    /// Learned across the whole workshop.
    Global,
}

impl SuggestionScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Global => "global",
        }
    }
}

/// An unranked suggestion record competing to match a query.
///
/// The matching fields are fixed; `payload` is the domain-specific remainder
/// of the row (labour hours, part query, ...) carried through ranking
/// untouched. On the serde side the payload is flattened, so a labour row
/// keeps its `time_hours` at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate<P> {
    pub id: String,
    #[serde(default)]
    pub source: SuggestionSource,
    #[serde(default, deserialize_with = "lenient_scope")]
    pub scope: Option<SuggestionScope>,
    /// Free text the ranker matches against.
    #[serde(default, alias = "display_description", alias = "context_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    /// How often this candidate was picked before. Never negative.
    #[serde(default, deserialize_with = "lenient_count")]
    pub usage_count: u32,
    /// Curated ordering among equally scored candidates. Falls back to the
    /// candidate's position in the input array when absent.
    #[serde(default, deserialize_with = "lenient_order")]
    pub default_order: Option<u32>,
    #[serde(flatten)]
    pub payload: P,
}

/// A ranked projection of one candidate.
///
/// Carries the superset both domains project from: identity and provenance,
/// the display text with its stable normalized key, the similarity score that
/// produced this position, and the flattened domain payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion<P> {
    pub id: String,
    pub source: SuggestionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<SuggestionScope>,
    /// Original candidate text, unmodified.
    pub display: String,
    /// Space-joined token key of the display text; stable dedup identifier.
    pub normalized_key: String,
    pub score: f64,
    pub usage_count: u32,
    #[serde(flatten)]
    pub payload: P,
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_scope<'de, D>(deserializer: D) -> Result<Option<SuggestionScope>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScopeVisitor;

    impl<'de> Visitor<'de> for ScopeVisitor {
        type Value = Option<SuggestionScope>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("\"user\", \"global\", or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(match v {
                "user" => Some(SuggestionScope::User),
                "global" => Some(SuggestionScope::Global),
                _ => None,
            })
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(ScopeVisitor)
        }

        fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScopeVisitor)
}

/// Coerces a count field to `u32`: negatives and garbage become 0, fractions
/// floor, numeric strings parse, overflow saturates.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a non-negative count in any numeric shape")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(u32::try_from(v).unwrap_or(u32::MAX))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(coerce_f64(v))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse::<f64>().map_or(0, coerce_f64))
        }

        fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(CountVisitor)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(0)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(0)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// Like [`lenient_count`] but keeps absence observable, so the ranker can
/// substitute the input position.
fn lenient_order<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderVisitor;

    impl<'de> Visitor<'de> for OrderVisitor {
        type Value = Option<u32>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an ordering number or null")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(u32::try_from(v).unwrap_or(u32::MAX)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(u32::try_from(v.max(0)).unwrap_or(u32::MAX)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(coerce_f64(v)))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse::<f64>().ok().map(coerce_f64))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(OrderVisitor)
        }

        fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(OrderVisitor)
}

fn coerce_f64(v: f64) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, f64::from(u32::MAX)).floor() as u32
}
