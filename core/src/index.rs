use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A document as stored in the index: the verbatim text (kept for result
/// display), its token sequence, and the derived per-token occurrence
/// counts. The frequency table is always recomputed from `tokens`, never
/// supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub tokens: Vec<String>,
    pub tf: HashMap<String, u32>,
}

/// Global corpus parameters, recomputed on every rebuild.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Params {
    pub n: usize,
    pub avgdl: f64,
    pub alpha: f64,
    pub beta: f64,
}

/// The document set and every statistic derived from it. Immutable once
/// built; rebuilds construct a fresh index from scratch (there is no
/// incremental update path).
#[derive(Debug, Default)]
pub struct CorpusIndex {
    pub docs: HashMap<String, Document>,
    /// token -> ids of documents containing it, sorted ascending. A token
    /// occurring several times in one document contributes one membership.
    pub postings: HashMap<String, Vec<String>>,
    pub idf: HashMap<String, f64>,
    pub entropy: HashMap<String, f64>,
    pub params: Params,
}

impl CorpusIndex {
    /// Builds the full index over `docs`. Stage order is load-bearing:
    /// parameters -> term frequencies -> postings -> IDF -> entropy, each
    /// stage consuming the previous one's output.
    pub fn build(docs: HashMap<String, Document>) -> Self {
        let mut index = Self { docs, ..Self::default() };
        index.compute_params();
        index.compute_term_frequencies();
        index.compute_postings();
        index.compute_idf();
        index.compute_entropy();
        tracing::info!(
            num_docs = index.params.n,
            num_terms = index.postings.len(),
            avgdl = index.params.avgdl,
            "index rebuilt"
        );
        index
    }

    /// True once the index holds at least one document with at least one
    /// token; queries against anything else fail with `IndexNotBuilt`.
    pub fn is_ready(&self) -> bool {
        self.params.n > 0 && self.params.avgdl > 0.0
    }

    fn compute_params(&mut self) {
        let n = self.docs.len();
        if n == 0 {
            self.params = Params::default();
            return;
        }
        let total_len: usize = self.docs.values().map(|d| d.tokens.len()).sum();
        let avgdl = total_len as f64 / n as f64;
        self.params = Params {
            n,
            avgdl,
            alpha: (avgdl / 100.0).clamp(0.5, 1.5),
            beta: 1.0 / (1.0 + n as f64).ln(),
        };
    }

    fn compute_term_frequencies(&mut self) {
        for doc in self.docs.values_mut() {
            let mut tf: HashMap<String, u32> = HashMap::with_capacity(doc.tokens.len());
            for token in &doc.tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            doc.tf = tf;
        }
    }

    fn compute_postings(&mut self) {
        let mut postings: HashMap<String, Vec<String>> = HashMap::new();
        for (doc_id, doc) in &self.docs {
            for token in doc.tf.keys() {
                postings.entry(token.clone()).or_default().push(doc_id.clone());
            }
        }
        // Sorted lists pin the evaluation order, so repeated runs against
        // the same index accumulate floats identically.
        for list in postings.values_mut() {
            list.sort_unstable();
        }
        self.postings = postings;
    }

    fn compute_idf(&mut self) {
        let n = self.params.n as f64;
        self.idf = self
            .postings
            .iter()
            .map(|(token, docs)| {
                let df = docs.len() as f64;
                (token.clone(), (((n - df) + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();
    }

    /// Accumulates token entropy once per occurrence position: a document
    /// where a token has frequency 3 contributes that token's term three
    /// times. Collapsing this to once per document changes rankings.
    fn compute_entropy(&mut self) {
        let mut entropy: HashMap<String, f64> = HashMap::new();
        for doc in self.docs.values() {
            for token in &doc.tokens {
                let f = doc.tf[token] as f64;
                let p = 1.0 / (1.0 + (-f).exp());
                *entropy.entry(token.clone()).or_insert(0.0) += -p * p.ln();
            }
        }
        self.entropy = entropy;
    }
}
