use thiserror::Error;

/// Errors surfaced by index construction and query evaluation.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("config error: {0}")]
    Config(String),

    /// A query was issued against an empty or unbuilt index.
    #[error("index not built: corpus is empty")]
    IndexNotBuilt,

    /// The query carried no token weight at all (e.g. it tokenized to
    /// nothing and no variants contributed tokens either).
    #[error("empty query: total token weight is zero")]
    EmptyQuery,

    /// No query token occurs anywhere in the corpus, so the maximum token
    /// entropy is zero and the entropy-dependent score terms are undefined.
    #[error("degenerate query: no query token occurs in the corpus")]
    DegenerateQuery,

    #[error("augmentation failed: {0}")]
    Augmentation(#[from] AugmentationFailure),
}

/// Recoverable failure from the external paraphrase-generation collaborator.
///
/// The orchestrator falls back to the unaugmented query on this error
/// rather than aborting the search.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct AugmentationFailure {
    pub reason: String,
}

impl AugmentationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
