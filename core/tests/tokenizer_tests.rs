use bmx_core::tokenizer::{Analyzer, TextConfig, TextPipeline};
use bmx_core::SearchError;

fn default_pipeline() -> TextPipeline {
    TextPipeline::new(&TextConfig::default()).unwrap()
}

#[test]
fn it_normalizes_and_stems() {
    let words = default_pipeline().analyze("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Diacritic folding: café -> cafe
    assert!(words.contains(&"cafe".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = default_pipeline().analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn whitespace_tokenizer_keeps_punctuation_attached() {
    let config = TextConfig {
        tokenizer: "whitespace".into(),
        stemmer: "none".into(),
        stopwords: "none".into(),
    };
    let words = TextPipeline::new(&config).unwrap().analyze("cat, dog");
    assert_eq!(words, vec!["cat,", "dog"]);
}

#[test]
fn wordpunct_tokenizer_splits_punctuation_out() {
    let config = TextConfig {
        tokenizer: "wordpunct".into(),
        stemmer: "none".into(),
        stopwords: "none".into(),
    };
    let words = TextPipeline::new(&config).unwrap().analyze("cat, dog");
    assert_eq!(words, vec!["cat", ",", "dog"]);
}

#[test]
fn ampersand_becomes_and() {
    let config = TextConfig { stopwords: "none".into(), ..Default::default() };
    let words = TextPipeline::new(&config).unwrap().analyze("salt & pepper");
    assert!(words.contains(&"and".to_string()));
}

#[test]
fn unsupported_names_fail_with_config_error() {
    let bad_stemmer = TextConfig { stemmer: "klingon".into(), ..Default::default() };
    assert!(matches!(
        TextPipeline::new(&bad_stemmer),
        Err(SearchError::Config(_))
    ));

    let bad_stopwords = TextConfig { stopwords: "klingon".into(), ..Default::default() };
    assert!(matches!(
        TextPipeline::new(&bad_stopwords),
        Err(SearchError::Config(_))
    ));

    let bad_tokenizer = TextConfig { tokenizer: "bigram".into(), ..Default::default() };
    assert!(matches!(
        TextPipeline::new(&bad_tokenizer),
        Err(SearchError::Config(_))
    ));
}
