//! Entropy-weighted BM25 ("BMX") lexical retrieval over an in-memory corpus.
//!
//! The engine ranks a fixed document collection against queries using a
//! BM25-style formula extended with per-token entropy weights, optionally
//! blending paraphrased query variants into the scoring, and evaluates
//! query batches under bounded concurrency with input-order results.
//!
//! ```no_run
//! use bmx_core::{Engine, TextConfig};
//!
//! let engine = Engine::new(&TextConfig::default())?;
//! engine.add_many(vec![
//!     ("doc1".to_string(), "the cat sat on the mat".to_string()),
//!     ("doc2".to_string(), "dogs chase cats".to_string()),
//! ]);
//! let hits = engine.search("cat", 10)?;
//! # Ok::<(), bmx_core::SearchError>(())
//! ```

pub mod augment;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod rank;
pub mod tokenizer;

pub use augment::Augmenter;
pub use engine::{Engine, InsertReport, RejectReason, RejectedDoc, SearchHit};
pub use error::{AugmentationFailure, Result, SearchError};
pub use index::{CorpusIndex, Document, Params};
pub use query::{Evaluation, TokenBag};
pub use tokenizer::{Analyzer, TextConfig, TextPipeline};
