//! Parallel all-pairs screening orchestration.
//!
//! The engine validates its configuration up front, owns an explicitly
//! sized worker pool, and evaluates every query against every reference.
//! Queries are partitioned into contiguous chunks, one per worker; each
//! worker scores its chunk against the shared read-only reference set and
//! the merged results get one deterministic final sort, so output never
//! depends on scheduling order or worker count.

use std::cmp::Ordering;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::config::{MatchMode, ScreeningConfig};
use crate::core::errors::{HeimdallError, Result};
use crate::matching::normalize::{NormalizedName, Normalizer};
use crate::matching::scoring::SimilarityScorer;
use crate::screening::records::{MatchRecord, NO_MATCH};

/// A reference list normalized once and reusable across screening calls.
///
/// Build one per run (or hold one for as long as the underlying list is
/// known to be current; refresh policy is the caller's concern).
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceSet {
    /// Number of reference names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set holds no references
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
struct ReferenceEntry {
    original: String,
    normalized: NormalizedName,
}

impl ReferenceEntry {
    /// Reporting text for a match against this reference: the matched
    /// alias when one is known, the original string otherwise.
    fn matched_text(&self, variant: Option<usize>) -> String {
        variant
            .and_then(|index| self.normalized.variants().get(index))
            .map(|v| v.source().to_string())
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| self.original.clone())
    }
}

/// One scored (query, reference) pairing prior to final ordering.
struct ScoredPair {
    query_index: usize,
    reference_index: Option<usize>,
    matched_name: String,
    score: f64,
}

impl ScoredPair {
    fn no_match(query_index: usize) -> Self {
        Self {
            query_index,
            reference_index: None,
            matched_name: NO_MATCH.to_string(),
            score: 0.0,
        }
    }

    /// Sentinel records order after every real reference.
    fn reference_order(&self) -> usize {
        self.reference_index.unwrap_or(usize::MAX)
    }
}

/// Screening engine: validated configuration, a sized worker pool, and
/// deterministic ordered output.
pub struct ScreeningEngine {
    config: ScreeningConfig,
    normalizer: Normalizer,
    scorer: SimilarityScorer,
    pool: ThreadPool,
}

impl std::fmt::Debug for ScreeningEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreeningEngine")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("scorer", &self.scorer)
            .field("pool", &format_args!("ThreadPool({} workers)", self.pool.current_num_threads()))
            .finish()
    }
}

impl ScreeningEngine {
    /// Create an engine from the given configuration.
    ///
    /// Fails on invalid configuration before any scoring work happens.
    pub fn new(config: ScreeningConfig) -> Result<Self> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("heimdall-worker-{index}"))
            .build()
            .map_err(|e| {
                HeimdallError::concurrency(format!("failed to build worker pool: {e}"))
            })?;

        let normalizer = Normalizer::new(&config.normalizer);
        let scorer = SimilarityScorer::new(config.weights.clone());

        info!(
            workers = pool.current_num_threads(),
            threshold = config.threshold,
            "screening engine initialized"
        );

        Ok(Self {
            config,
            normalizer,
            scorer,
            pool,
        })
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Normalize a reference list once for reuse across screening calls
    pub fn prepare_references(&self, references: &[String]) -> ReferenceSet {
        debug!(count = references.len(), "normalizing reference list");
        ReferenceSet {
            entries: references
                .iter()
                .map(|raw| ReferenceEntry {
                    original: raw.clone(),
                    normalized: self.normalizer.normalize(raw),
                })
                .collect(),
        }
    }

    /// Screen every query against every reference.
    pub fn screen(&self, queries: &[String], references: &[String]) -> Result<Vec<MatchRecord>> {
        let prepared = self.prepare_references(references);
        self.screen_prepared(queries, &prepared)
    }

    /// Screen against an already-normalized reference set.
    pub fn screen_prepared(
        &self,
        queries: &[String],
        references: &ReferenceSet,
    ) -> Result<Vec<MatchRecord>> {
        self.screen_with_cancellation(queries, references, &CancellationToken::new())
    }

    /// Screen with a whole-run cancellation token.
    ///
    /// A cancelled run returns [`HeimdallError::Cancelled`]; no partial
    /// result is produced.
    pub fn screen_with_cancellation(
        &self,
        queries: &[String],
        references: &ReferenceSet,
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchRecord>> {
        let normalized_queries: Vec<NormalizedName> =
            queries.iter().map(|raw| self.normalizer.normalize(raw)).collect();

        let workers = self.pool.current_num_threads().max(1);
        let chunk_size = normalized_queries.len().div_ceil(workers).max(1);

        let chunk_results: Vec<Vec<ScoredPair>> = self.pool.install(|| {
            normalized_queries
                .par_chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    self.score_chunk(chunk_index * chunk_size, chunk, references, cancel)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut pairs: Vec<ScoredPair> = chunk_results.into_iter().flatten().collect();

        // Output order is part of the contract: score descending, then
        // query input order, then reference input order. Sorting after the
        // merge keeps worker scheduling out of the result.
        pairs.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.query_index.cmp(&b.query_index))
                .then_with(|| a.reference_order().cmp(&b.reference_order()))
        });

        info!(
            queries = queries.len(),
            references = references.len(),
            records = pairs.len(),
            "screening run complete"
        );

        Ok(pairs
            .into_iter()
            .map(|pair| MatchRecord {
                query_name: queries[pair.query_index].clone(),
                matched_name: pair.matched_name,
                score: pair.score,
                flagged: pair.score >= self.config.threshold,
            })
            .collect())
    }

    /// Score a single query/reference pair directly.
    pub fn compare(&self, query: &str, reference: &str) -> f64 {
        let query = self.normalizer.normalize(query);
        let reference = self.normalizer.normalize(reference);
        round2(self.scorer.name_score(&query, &reference).score)
    }

    fn score_chunk(
        &self,
        base_index: usize,
        chunk: &[NormalizedName],
        references: &ReferenceSet,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredPair>> {
        let mut pairs = Vec::new();
        for (offset, query) in chunk.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(HeimdallError::Cancelled);
            }

            let query_index = base_index + offset;
            match self.config.mode {
                MatchMode::BestMatchOnly => {
                    pairs.push(self.best_match(query_index, query, references));
                }
                MatchMode::AllAboveThreshold => {
                    self.matches_above_threshold(query_index, query, references, &mut pairs);
                }
            }
        }
        Ok(pairs)
    }

    fn best_match(
        &self,
        query_index: usize,
        query: &NormalizedName,
        references: &ReferenceSet,
    ) -> ScoredPair {
        let mut best: Option<ScoredPair> = None;
        for (reference_index, entry) in references.entries.iter().enumerate() {
            let outcome = self.scorer.name_score(query, &entry.normalized);
            let score = round2(outcome.score);
            if best.as_ref().map_or(true, |current| score > current.score) {
                best = Some(ScoredPair {
                    query_index,
                    reference_index: Some(reference_index),
                    matched_name: entry.matched_text(outcome.matched_variant),
                    score,
                });
            }
        }

        match best {
            Some(pair) if pair.score > 0.0 => pair,
            _ => ScoredPair::no_match(query_index),
        }
    }

    fn matches_above_threshold(
        &self,
        query_index: usize,
        query: &NormalizedName,
        references: &ReferenceSet,
        pairs: &mut Vec<ScoredPair>,
    ) {
        for (reference_index, entry) in references.entries.iter().enumerate() {
            let outcome = self.scorer.name_score(query, &entry.normalized);
            let score = round2(outcome.score);
            if score >= self.config.threshold {
                pairs.push(ScoredPair {
                    query_index,
                    reference_index: Some(reference_index),
                    matched_name: entry.matched_text(outcome.matched_variant),
                    score,
                });
            }
        }
    }
}

/// Round to the two-decimal precision reported in records. Flagging uses
/// the rounded value so the stored score and the flag never disagree.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
