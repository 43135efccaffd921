//! The suggestion engine: cache-first query flow over a candidate source.
//!
//! One engine serves one domain. It owns that domain's normalizer, strategy
//! and result cap, borrows a cache injected by the hosting service, and
//! coordinates concurrent lookups through shared futures so a burst of
//! identical queries costs one source fetch.

use crate::cache::TtlCache;
use crate::error::SuggestError;
use crate::normalize::{DomainProfile, Normalizer};
use crate::rank::{rank_suggestions, ScoreStrategy};
use crate::types::{Candidate, Suggestion};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Cache lifetime applied when a config does not override it.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A ranked, capped suggestion list as cached and returned to callers.
pub type RankedList<P> = Arc<Vec<Suggestion<P>>>;

/// Type alias for shared fetch-and-rank futures.
type SharedRankFuture<P> = Shared<BoxFuture<'static, Result<RankedList<P>, String>>>;

/// One outstanding fetch, shared by every caller that asked for its key.
///
/// The future holds a clone of `token` and recognizes its own entry by
/// pointer identity before publishing. A fetch that invalidation has
/// disowned finishes quietly, without touching the cache or a successor's
/// entry for the same key.
struct InFlightFetch<P> {
    token: Arc<()>,
    future: SharedRankFuture<P>,
}

/// Supplier of raw candidates for a query, typically a database lookup
/// owned by the hosting service.
///
/// The engine treats a fetch as opaque: it applies no timeout, retry or
/// cancellation of its own, and a fetch error reaches every caller that
/// joined the same lookup.
pub trait CandidateSource<P>: Send + Sync + 'static {
    fn fetch(
        &self,
        query_text: &str,
    ) -> impl Future<Output = crate::error::Result<Vec<Candidate<P>>>> + Send;
}

/// Everything that parameterizes an engine for one domain.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Vocabulary the engine normalizes queries and candidates with.
    pub profile: DomainProfile,
    /// Similarity formula, which also fixes the sort keys.
    pub strategy: ScoreStrategy,
    /// Result cap; `None` takes the strategy's default.
    pub limit: Option<usize>,
    /// Cache entry lifetime.
    pub ttl: Duration,
    /// Prepended to every cache key so domains sharing one cache stay
    /// disjoint. Must be nonempty, or `invalidate_all` wipes the whole cache.
    pub cache_prefix: String,
}

impl EngineConfig {
    pub fn new(
        profile: DomainProfile,
        strategy: ScoreStrategy,
        cache_prefix: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            strategy,
            limit: None,
            ttl: DEFAULT_TTL,
            cache_prefix: cache_prefix.into(),
        }
    }
}

/// Coordination point for one domain's suggestion lookups.
///
/// Ties together:
/// - the normalizer and ranking strategy (pure, lock-free)
/// - the injected TTL cache of ranked lists
/// - in-flight fetch futures, awaitable by any number of callers
pub struct Engine<P, S> {
    normalizer: Normalizer,
    strategy: ScoreStrategy,
    limit: usize,
    ttl: Duration,
    cache_prefix: String,
    cache: Arc<TtlCache<RankedList<P>>>,
    source: Arc<S>,
    in_flight: Arc<Mutex<HashMap<String, InFlightFetch<P>>>>,
}

impl<P, S> Engine<P, S>
where
    P: Clone + Send + Sync + 'static,
    S: CandidateSource<P>,
{
    pub fn new(config: EngineConfig, source: S, cache: Arc<TtlCache<RankedList<P>>>) -> Self {
        let limit = config
            .limit
            .unwrap_or_else(|| config.strategy.default_limit());
        tracing::info!(
            "Suggestion engine for {:?} ready (strategy {:?}, limit {})",
            config.profile.name,
            config.strategy,
            limit
        );
        Self {
            normalizer: Normalizer::new(config.profile),
            strategy: config.strategy,
            limit,
            ttl: config.ttl,
            cache_prefix: config.cache_prefix,
            cache,
            source: Arc::new(source),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ranks `candidates` directly, skipping the cache and the source.
    pub fn rank(&self, query_text: &str, candidates: &[Candidate<P>]) -> Vec<Suggestion<P>> {
        rank_suggestions(
            &self.normalizer,
            self.strategy,
            query_text,
            candidates,
            self.limit,
        )
    }

    /// Full suggestion flow for one query. It:
    /// 1. Short-circuits queries that normalize to nothing
    /// 2. Checks the cache
    /// 3. Joins an in-flight fetch for the same key, or starts one
    /// 4. Awaits the shared result
    ///
    /// The fetch future publishes to the cache and retires its own map
    /// entry as its final step, so cleanup does not depend on any caller
    /// surviving: when every caller is cancelled mid-fetch, the entry stays
    /// joinable and the next caller for its key drives it to completion.
    ///
    /// `partition` scopes the cache key to one tenant or workshop; queries
    /// in different partitions never share results.
    pub async fn suggest(
        &self,
        partition: &str,
        query_text: &str,
    ) -> Result<RankedList<P>, SuggestError> {
        // 1. Nothing survived normalization, so nothing can score above zero
        let normalized_key = self.normalizer.normalized_key(query_text);
        if normalized_key.is_empty() {
            tracing::debug!("Query normalized to nothing in {}, skipping fetch", partition);
            return Ok(Arc::new(Vec::new()));
        }
        let cache_key = self.cache_key(partition, &normalized_key);

        // 2. Check the cache first
        if let Some(ranked) = self.cache.get(&cache_key, self.ttl) {
            return Ok(ranked);
        }

        // 3. Join an in-flight fetch or start one. Decided under one lock
        //    so two misses on the same key cannot both reach the source.
        let future = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(entry) = in_flight.get(&cache_key) {
                tracing::debug!("Awaiting in-flight fetch for {}", cache_key);
                entry.future.clone()
            } else if let Some(ranked) = self.cache.get(&cache_key, self.ttl) {
                // A fetch finished between the unlocked cache check and here.
                return Ok(ranked);
            } else {
                let token = Arc::new(());
                let future =
                    self.make_rank_future(&cache_key, query_text, Arc::clone(&token));
                in_flight.insert(
                    cache_key.clone(),
                    InFlightFetch {
                        token,
                        future: future.clone(),
                    },
                );
                future
            }
        };

        // 4. Await the shared result
        future.await.map_err(SuggestError::Source)
    }

    /// Drops cached results for one partition, for when its learned data
    /// changes. Fetches still in flight for the partition are disowned too:
    /// callers already awaiting them get the pre-invalidation result, but it
    /// is not cached.
    pub async fn invalidate(&self, partition: &str) {
        let prefix = format!("{}{}:", self.cache_prefix, partition);
        // The purge must precede the cache clear, or a finishing fetch
        // could publish between the two.
        self.in_flight
            .lock()
            .await
            .retain(|key, _| !key.starts_with(&prefix));
        self.cache.clear_by_prefix(&prefix);
    }

    /// Drops every cached result belonging to this engine's domain, along
    /// with all of its in-flight fetches.
    pub async fn invalidate_all(&self) {
        self.in_flight.lock().await.clear();
        self.cache.clear_by_prefix(&self.cache_prefix);
    }

    fn cache_key(&self, partition: &str, normalized_key: &str) -> String {
        format!("{}{}:{}", self.cache_prefix, partition, normalized_key)
    }

    /// Builds the fetch-and-rank future for one cache key.
    ///
    /// The future owns clones of everything it touches so it can be `'static`
    /// and shared. Errors cross it as `String` because shared futures hand
    /// every awaiter a clone of the output. Whichever caller polls it to
    /// completion runs the publish-and-retire tail exactly once; `token`
    /// proves the map entry is still this fetch's own.
    fn make_rank_future(
        &self,
        cache_key: &str,
        query_text: &str,
        token: Arc<()>,
    ) -> SharedRankFuture<P> {
        tracing::info!("Starting candidate fetch for {}", cache_key);
        let source = Arc::clone(&self.source);
        let normalizer = self.normalizer.clone();
        let strategy = self.strategy;
        let limit = self.limit;
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let key = cache_key.to_string();
        let query = query_text.to_string();

        let future: BoxFuture<'static, Result<RankedList<P>, String>> = Box::pin(async move {
            let result = match source.fetch(&query).await {
                Ok(candidates) => {
                    tracing::debug!("Fetched {} candidates for {:?}", candidates.len(), query);
                    let ranked =
                        rank_suggestions(&normalizer, strategy, &query, &candidates, limit);
                    Ok(Arc::new(ranked))
                }
                Err(e) => {
                    tracing::warn!("Candidate fetch failed for {:?}: {}", query, e);
                    Err(e.to_string())
                }
            };

            // Publish and retire under the in-flight lock, so later callers
            // find either this entry or the cached value, never a gap.
            let mut entries = in_flight.lock().await;
            let own_entry = entries
                .get(&key)
                .is_some_and(|entry| Arc::ptr_eq(&entry.token, &token));
            if own_entry {
                if let Ok(ranked) = &result {
                    cache.set(key.clone(), ranked.clone());
                }
                entries.remove(&key);
            }
            drop(entries);
            result
        });
        future.shared()
    }
}
