use std::collections::HashMap;

/// Selects the top `k` document ids from a score table, highest score
/// first. Ties break by ascending document id so rankings are
/// deterministic. `k` larger than the scored set returns everything;
/// `k == 0` returns nothing.
pub fn top_k(scores: &HashMap<String, f64>, k: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> =
        scores.iter().map(|(id, s)| (id, *s)).collect();
    ranked.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    ranked.into_iter().take(k).map(|(id, _)| id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    #[test]
    fn orders_by_descending_score() {
        let scores = table(&[("a", 0.2), ("b", 0.9), ("c", 0.5)]);
        assert_eq!(top_k(&scores, 3), vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let scores = table(&[("z", 0.5), ("a", 0.5), ("m", 0.5)]);
        assert_eq!(top_k(&scores, 3), vec!["a", "m", "z"]);
    }

    #[test]
    fn k_larger_than_table_returns_everything_once() {
        let scores = table(&[("a", 0.1), ("b", 0.2)]);
        let ranked = top_k(&scores, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked, vec!["b", "a"]);
    }

    #[test]
    fn zero_k_returns_nothing() {
        let scores = table(&[("a", 0.1)]);
        assert!(top_k(&scores, 0).is_empty());
    }
}
