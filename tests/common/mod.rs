//! Shared fixtures and builders for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test builds its own engine over its own `Arc<TtlCache>`, so cached
//! results never cross tests and everything runs in parallel. The crate
//! keeps no global state, so there is nothing to reset between tests.
//!
//! # Scripted Sources
//!
//! [`ScriptedSource`] stands in for the database-backed candidate source a
//! hosting service would supply. It counts fetches, can be gated so a fetch
//! parks until the test releases it (for exercising in-flight deduplication),
//! and can be scripted to fail. Clones share state: keep one handle for
//! assertions and hand another to the engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::fixture;
use tokio::sync::Notify;
use workshop_suggest::{
    labour_engine, parts_engine, Candidate, CandidateSource, Engine, LabourFields, PartFields,
    SuggestionScope, SuggestionSource, TtlCache,
};

/// Learned, user-scoped labour line; rank tests vary the usage count and the
/// hours ride along as payload.
#[allow(dead_code)] // Used across different integration test binaries
pub fn labour_candidate(
    id: &str,
    text: &str,
    usage_count: u32,
    time_hours: f64,
) -> Candidate<LabourFields> {
    Candidate {
        id: id.to_string(),
        source: SuggestionSource::Learned,
        scope: Some(SuggestionScope::User),
        text: text.to_string(),
        tags: Vec::new(),
        usage_count,
        default_order: None,
        payload: LabourFields { time_hours },
    }
}

/// Parts line with explicit provenance, which the parts sort keys on.
#[allow(dead_code)] // Used across different integration test binaries
pub fn part_candidate(
    id: &str,
    text: &str,
    query: &str,
    source: SuggestionSource,
    scope: Option<SuggestionScope>,
) -> Candidate<PartFields> {
    Candidate {
        id: id.to_string(),
        source,
        scope,
        text: text.to_string(),
        tags: Vec::new(),
        usage_count: 0,
        default_order: None,
        payload: PartFields {
            query: query.to_string(),
        },
    }
}

struct SourceInner<P> {
    candidates: Vec<Candidate<P>>,
    fetches: AtomicUsize,
    entered: Notify,
    release: Notify,
    gated: bool,
    fail: Option<String>,
}

/// Scripted stand-in for a candidate source.
///
/// The gated handshake runs: the test awaits [`wait_for_fetch`] to know a
/// fetch has entered, arranges whatever concurrency it is testing, then
/// calls [`release`] to let the fetch return. Both notifications store a
/// permit, so neither side can miss the other.
///
/// [`wait_for_fetch`]: ScriptedSource::wait_for_fetch
/// [`release`]: ScriptedSource::release
pub struct ScriptedSource<P> {
    inner: Arc<SourceInner<P>>,
}

impl<P> Clone for ScriptedSource<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[allow(dead_code)] // Constructors used across different integration test binaries
impl<P> ScriptedSource<P> {
    fn build(candidates: Vec<Candidate<P>>, gated: bool, fail: Option<String>) -> Self {
        Self {
            inner: Arc::new(SourceInner {
                candidates,
                fetches: AtomicUsize::new(0),
                entered: Notify::new(),
                release: Notify::new(),
                gated,
                fail,
            }),
        }
    }

    /// Serves `candidates` immediately on every fetch.
    pub fn serving(candidates: Vec<Candidate<P>>) -> Self {
        Self::build(candidates, false, None)
    }

    /// Serves `candidates`, but each fetch parks until [`release`] is called.
    ///
    /// [`release`]: ScriptedSource::release
    pub fn gated(candidates: Vec<Candidate<P>>) -> Self {
        Self::build(candidates, true, None)
    }

    /// Fails every fetch with `message`.
    pub fn failing(message: &str) -> Self {
        Self::build(Vec::new(), false, Some(message.to_string()))
    }

    /// Number of fetches that have entered the source so far.
    pub fn fetches(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Waits until a fetch has entered the source.
    pub async fn wait_for_fetch(&self) {
        self.inner.entered.notified().await;
    }

    /// Lets one parked fetch return.
    pub fn release(&self) {
        self.inner.release.notify_one();
    }
}

impl<P> CandidateSource<P> for ScriptedSource<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, _query_text: &str) -> workshop_suggest::Result<Vec<Candidate<P>>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.entered.notify_one();
        if self.inner.gated {
            self.inner.release.notified().await;
        }
        if let Some(message) = &self.inner.fail {
            anyhow::bail!("{}", message);
        }
        Ok(self.inner.candidates.clone())
    }
}

/// Labour engine over `source` with a fresh private cache. Also initializes
/// the tracing subscriber for this test binary.
#[allow(dead_code)] // Used across different integration test binaries
pub fn labour_engine_for(
    source: ScriptedSource<LabourFields>,
) -> Engine<LabourFields, ScriptedSource<LabourFields>> {
    workshop_suggest::tracing::init();
    labour_engine(source, Arc::new(TtlCache::new()))
}

/// Parts engine over `source` with a fresh private cache.
#[allow(dead_code)] // Used across different integration test binaries
pub fn parts_engine_for(
    source: ScriptedSource<PartFields>,
) -> Engine<PartFields, ScriptedSource<PartFields>> {
    workshop_suggest::tracing::init();
    parts_engine(source, Arc::new(TtlCache::new()))
}

/// Labour lines a front-brake query matches with distinct strengths; the
/// wiper line shares no token with it and drops out entirely.
#[fixture]
#[allow(dead_code)] // Used across different integration test binaries
pub fn brake_job_candidates() -> Vec<Candidate<LabourFields>> {
    vec![
        labour_candidate("lab-pads", "Replace front brake pads", 12, 1.2),
        labour_candidate("lab-pads-discs", "Replace front brake pads and discs", 7, 2.2),
        labour_candidate("lab-wiper", "Replace wiper blades", 3, 0.3),
    ]
}
