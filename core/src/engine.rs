use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::augment::Augmenter;
use crate::error::{Result, SearchError};
use crate::index::{CorpusIndex, Document};
use crate::query::{Evaluation, TokenBag};
use crate::rank::top_k;
use crate::tokenizer::{Analyzer, TextConfig, TextPipeline};

/// One ranked result. `score` is the normalized score, comparable across
/// queries of different total weight.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    EmptyId,
    DuplicateId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedDoc {
    pub doc_id: String,
    pub reason: RejectReason,
}

/// Per-document outcome of a bulk insert. A malformed document is reported
/// here and skipped; it never aborts the rest of the batch.
#[derive(Debug, Default, Serialize)]
pub struct InsertReport {
    pub indexed: usize,
    pub rejected: Vec<RejectedDoc>,
}

/// Search orchestrator: owns the analyzer and an immutable index snapshot.
///
/// Rebuilds construct a fresh [`CorpusIndex`] off to the side and swap it in
/// atomically, so any number of concurrent searches can read the current
/// snapshot without locking while inserts proceed.
pub struct Engine {
    analyzer: Box<dyn Analyzer>,
    index: RwLock<Arc<CorpusIndex>>,
}

impl Engine {
    pub fn new(config: &TextConfig) -> Result<Self> {
        Ok(Self::with_analyzer(Box::new(TextPipeline::new(config)?)))
    }

    /// Builds an engine around a caller-supplied analyzer, the seam for
    /// pinning a fixed tokenization in tests or embedding contexts.
    pub fn with_analyzer(analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            index: RwLock::new(Arc::new(CorpusIndex::default())),
        }
    }

    fn snapshot(&self) -> Arc<CorpusIndex> {
        self.index.read().clone()
    }

    pub fn num_docs(&self) -> usize {
        self.snapshot().params.n
    }

    /// The stored full text of a document, for result display.
    pub fn document(&self, doc_id: &str) -> Option<String> {
        self.snapshot().docs.get(doc_id).map(|d| d.text.clone())
    }

    /// Inserts a batch of `(id, text)` documents and rebuilds every derived
    /// table over the full document set. Documents with an empty or
    /// already-used id are rejected individually and reported; the rest of
    /// the batch still goes through.
    pub fn add_many<I>(&self, docs: I) -> InsertReport
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let current = self.snapshot();
        let mut merged: HashMap<String, Document> = current.docs.clone();
        let mut report = InsertReport::default();

        for (doc_id, text) in docs {
            if doc_id.is_empty() {
                report.rejected.push(RejectedDoc {
                    doc_id,
                    reason: RejectReason::EmptyId,
                });
                continue;
            }
            if merged.contains_key(&doc_id) {
                report.rejected.push(RejectedDoc {
                    doc_id,
                    reason: RejectReason::DuplicateId,
                });
                continue;
            }
            let tokens = self.analyzer.analyze(&text);
            merged.insert(doc_id, Document { text, tokens, tf: HashMap::new() });
            report.indexed += 1;
        }

        let rebuilt = Arc::new(CorpusIndex::build(merged));
        *self.index.write() = rebuilt;

        if !report.rejected.is_empty() {
            tracing::warn!(
                rejected = report.rejected.len(),
                indexed = report.indexed,
                "bulk insert rejected some documents"
            );
        }
        report
    }

    /// Single synchronous query: analyze, weight, evaluate, rank.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let index = self.snapshot();
        let tokens = self.analyzer.analyze(query);
        self.run(&index, &tokens, &[], k)
    }

    /// Searches with the primary query blended against pre-generated
    /// variant queries, one weight per variant. The bag accumulates every
    /// token occurrence at its query's weight (merged-bag semantics).
    pub fn search_blended(
        &self,
        query: &str,
        k: usize,
        variants: &[String],
        weights: &[f64],
    ) -> Result<Vec<SearchHit>> {
        if variants.len() != weights.len() {
            return Err(SearchError::Config(format!(
                "{} variant queries but {} weights",
                variants.len(),
                weights.len()
            )));
        }
        let index = self.snapshot();
        let tokens = self.analyzer.analyze(query);
        let variants: Vec<(Vec<String>, f64)> = variants
            .iter()
            .zip(weights)
            .map(|(v, w)| (self.analyzer.analyze(v), *w))
            .collect();
        self.run(&index, &tokens, &variants, k)
    }

    /// Asks the collaborator for up to `count` paraphrases and blends them
    /// in at `weight` each (`1/(1+count)` gives an average-like blend).
    /// Augmentation failure is recoverable: the search falls back to the
    /// unaugmented query.
    pub fn search_augmented(
        &self,
        query: &str,
        k: usize,
        augmenter: &dyn Augmenter,
        count: usize,
        weight: f64,
    ) -> Result<Vec<SearchHit>> {
        match augmenter.augment(query, count) {
            Ok(variants) => {
                let weights = vec![weight; variants.len()];
                self.search_blended(query, k, &variants, &weights)
            }
            Err(err) => {
                tracing::warn!(%err, query, "augmentation failed, searching unaugmented");
                self.search(query, k)
            }
        }
    }

    /// Runs every query against the current snapshot on a bounded pool of
    /// `max_concurrency` workers. The output is index-aligned with the
    /// input regardless of completion order, and each slot carries its own
    /// outcome, so one failing query never aborts its siblings. Blocks
    /// until the whole batch is done.
    pub fn search_many(
        &self,
        queries: &[String],
        k: usize,
        max_concurrency: usize,
    ) -> Result<Vec<Result<Vec<SearchHit>>>> {
        let pool = self.worker_pool(max_concurrency)?;
        Ok(pool.install(|| {
            queries.par_iter().map(|query| self.search(query, k)).collect()
        }))
    }

    /// Batch form of [`Engine::search_augmented`].
    pub fn search_augmented_many(
        &self,
        queries: &[String],
        k: usize,
        augmenter: &dyn Augmenter,
        count: usize,
        weight: f64,
        max_concurrency: usize,
    ) -> Result<Vec<Result<Vec<SearchHit>>>> {
        let pool = self.worker_pool(max_concurrency)?;
        Ok(pool.install(|| {
            queries
                .par_iter()
                .map(|query| self.search_augmented(query, k, augmenter, count, weight))
                .collect()
        }))
    }

    fn worker_pool(&self, max_concurrency: usize) -> Result<rayon::ThreadPool> {
        if max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_concurrency)
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))
    }

    fn run(
        &self,
        index: &CorpusIndex,
        primary: &[String],
        variants: &[(Vec<String>, f64)],
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        if !index.is_ready() {
            return Err(SearchError::IndexNotBuilt);
        }
        let bag = TokenBag::merge(primary, variants)?;
        let eval = Evaluation::evaluate(&bag, index)?;
        let ranked = top_k(&eval.scores, k);
        Ok(ranked
            .into_iter()
            .map(|doc_id| SearchHit { score: eval.normalized[&doc_id], doc_id })
            .collect())
    }
}
