use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SearchError};
use crate::index::CorpusIndex;

/// A query reduced to a weighted bag of tokens: the primary query's tokens
/// at weight 1.0 per occurrence, blended with any number of variant token
/// sequences at their caller-supplied weights. Weights accumulate
/// additively; no particular weighting scheme is enforced.
///
/// A `BTreeMap` keeps token iteration order deterministic, which pins the
/// floating-point accumulation order during evaluation.
#[derive(Debug, Clone)]
pub struct TokenBag {
    pub weights: BTreeMap<String, f64>,
    pub total_weight: f64,
}

impl TokenBag {
    pub fn merge(primary: &[String], variants: &[(Vec<String>, f64)]) -> Result<Self> {
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        let mut total = 0.0;
        for token in primary {
            *weights.entry(token.clone()).or_insert(0.0) += 1.0;
            total += 1.0;
        }
        for (tokens, weight) in variants {
            for token in tokens {
                *weights.entry(token.clone()).or_insert(0.0) += weight;
                total += weight;
            }
        }
        if total == 0.0 {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self { weights, total_weight: total })
    }
}

/// Raw and normalized scores for one query against one index snapshot.
/// Only documents matched by at least one bag token appear in the tables;
/// absence means score zero. Dropped after ranking.
#[derive(Debug)]
pub struct Evaluation {
    pub scores: HashMap<String, f64>,
    pub normalized: HashMap<String, f64>,
}

impl Evaluation {
    pub fn evaluate(bag: &TokenBag, index: &CorpusIndex) -> Result<Self> {
        if !index.is_ready() {
            return Err(SearchError::IndexNotBuilt);
        }

        let max_e = bag
            .weights
            .keys()
            .map(|t| index.entropy.get(t).copied().unwrap_or(0.0))
            .fold(0.0f64, f64::max);
        if max_e == 0.0 {
            return Err(SearchError::DegenerateQuery);
        }

        // Average entropy is normalized twice, by total weight and by the
        // maximum entropy, compressing it into roughly [0, 1].
        let mut avg_entropy = 0.0;
        for (token, weight) in &bag.weights {
            avg_entropy += weight * index.entropy.get(token).copied().unwrap_or(0.0);
        }
        avg_entropy /= bag.total_weight;
        avg_entropy /= max_e;

        // Coverage S(d): the fraction of total query weight matched by
        // tokens present in d, regardless of how often they occur there.
        let mut coverage: HashMap<&str, f64> = HashMap::new();
        for (token, weight) in &bag.weights {
            if let Some(doc_ids) = index.postings.get(token) {
                for doc_id in doc_ids {
                    *coverage.entry(doc_id.as_str()).or_insert(0.0) += weight;
                }
            }
        }
        let inv_total = 1.0 / bag.total_weight;
        for s in coverage.values_mut() {
            *s *= inv_total;
        }

        let params = &index.params;
        let alpha1 = params.alpha + 1.0;
        let alpha_avg_entropy = params.alpha * avg_entropy;
        let inv_avgdl = 1.0 / params.avgdl;
        let inv_max_e = 1.0 / max_e;

        let mut scores: HashMap<String, f64> = HashMap::with_capacity(coverage.len());
        for (token, weight) in &bag.weights {
            let Some(doc_ids) = index.postings.get(token) else { continue };
            let idf = index.idf.get(token).copied().unwrap_or(0.0);
            let beta_e = params.beta * index.entropy[token] * inv_max_e;
            for doc_id in doc_ids {
                let doc = &index.docs[doc_id];
                let f = doc.tf[token] as f64;
                let dl_ratio = doc.tokens.len() as f64 * inv_avgdl;
                let s = coverage[doc_id.as_str()];
                let tf_term = idf * (f * alpha1)
                    / (f + params.alpha * dl_ratio + alpha_avg_entropy);
                *scores.entry(doc_id.clone()).or_insert(0.0) +=
                    weight * (tf_term + beta_e * s);
            }
        }

        // Divide by the theoretical ceiling so scores are comparable
        // across queries of different total weight.
        let ceiling =
            bag.total_weight * ((1.0 + (params.n as f64 - 0.5) / 1.5).ln() + 1.0);
        let inv_ceiling = 1.0 / ceiling;
        let normalized = scores
            .iter()
            .map(|(doc_id, score)| (doc_id.clone(), score * inv_ceiling))
            .collect();

        tracing::debug!(
            tokens = bag.weights.len(),
            matched = scores.len(),
            avg_entropy,
            "query evaluated"
        );
        Ok(Self { scores, normalized })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Document;

    fn index_from(texts: &[&str]) -> CorpusIndex {
        let docs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let tokens: Vec<String> =
                    t.split_whitespace().map(|s| s.to_string()).collect();
                (
                    i.to_string(),
                    Document { text: t.to_string(), tokens, tf: HashMap::new() },
                )
            })
            .collect();
        CorpusIndex::build(docs)
    }

    fn bag(tokens: &[&str]) -> TokenBag {
        let primary: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        TokenBag::merge(&primary, &[]).unwrap()
    }

    #[test]
    fn merge_accumulates_variant_weights() {
        let primary = vec!["cat".to_string(), "cat".to_string()];
        let variants = vec![
            (vec!["cat".to_string(), "kitten".to_string()], 0.5),
            (vec!["kitten".to_string()], 0.25),
        ];
        let bag = TokenBag::merge(&primary, &variants).unwrap();
        assert!((bag.weights["cat"] - 2.5).abs() < 1e-12);
        assert!((bag.weights["kitten"] - 0.75).abs() < 1e-12);
        assert!((bag.total_weight - 3.25).abs() < 1e-12);
    }

    #[test]
    fn merge_of_nothing_is_empty_query() {
        assert!(matches!(
            TokenBag::merge(&[], &[]),
            Err(SearchError::EmptyQuery)
        ));
    }

    #[test]
    fn unknown_tokens_are_degenerate() {
        let index = index_from(&["cat sat", "dog ran"]);
        assert!(matches!(
            Evaluation::evaluate(&bag(&["zebra"]), &index),
            Err(SearchError::DegenerateQuery)
        ));
    }

    #[test]
    fn empty_index_rejects_queries() {
        let index = CorpusIndex::build(HashMap::new());
        assert!(matches!(
            Evaluation::evaluate(&bag(&["cat"]), &index),
            Err(SearchError::IndexNotBuilt)
        ));
    }

    #[test]
    fn only_matched_docs_are_scored() {
        let index = index_from(&["cat sat", "dog ran", "cat nap"]);
        let eval = Evaluation::evaluate(&bag(&["cat"]), &index).unwrap();
        assert_eq!(eval.scores.len(), 2);
        assert!(eval.scores.contains_key("0"));
        assert!(eval.scores.contains_key("2"));
        assert!(!eval.scores.contains_key("1"));
    }

    #[test]
    fn scores_are_finite_and_positive() {
        let index = index_from(&["cat sat on the mat", "dog ran far", "cat dog"]);
        let eval = Evaluation::evaluate(&bag(&["cat", "dog"]), &index).unwrap();
        for (doc_id, score) in &eval.scores {
            assert!(score.is_finite() && *score > 0.0, "score({doc_id}) = {score}");
        }
    }

    #[test]
    fn normalization_scales_raw_scores_linearly() {
        let index = index_from(&["cat sat", "cat cat dog", "dog ran"]);
        let eval = Evaluation::evaluate(&bag(&["cat", "dog"]), &index).unwrap();
        let n = index.params.n as f64;
        let bag = bag(&["cat", "dog"]);
        let factor = 1.0 / (bag.total_weight * ((1.0 + (n - 0.5) / 1.5).ln() + 1.0));
        for (doc_id, raw) in &eval.scores {
            let norm = eval.normalized[doc_id];
            assert!(norm.is_finite());
            assert!((norm - raw * factor).abs() < 1e-12);
        }
    }
}
