use crate::error::AugmentationFailure;

/// External paraphrase-generation collaborator. Implementations return up
/// to `count` paraphrases of `query`; fewer is fine. Implementations are
/// expected to fail fast (carrying their own deadline or cancellation)
/// rather than block a search indefinitely.
///
/// Failure is recoverable: the orchestrator logs it and searches with the
/// unaugmented query instead.
pub trait Augmenter: Send + Sync {
    fn augment(&self, query: &str, count: usize) -> Result<Vec<String>, AugmentationFailure>;
}
