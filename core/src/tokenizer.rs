use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::SearchError;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
    static ref WORDPUNCT_RE: Regex = Regex::new(r"\w+|[^\w\s]+").expect("valid regex");
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// The normalization contract the engine consumes: raw text in, ordered
/// token sequence out. Deterministic and side-effect free.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<String>;
}

/// Names the tokenizer, stemmer, and stopword set composed into a
/// [`TextPipeline`]. Unsupported names fail with [`SearchError::Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// One of "word", "whitespace", "wordpunct".
    pub tokenizer: String,
    /// A Snowball language name, or "none" to skip stemming.
    pub stemmer: String,
    /// A stopword-list language name, or "none" to keep every token.
    pub stopwords: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            tokenizer: "word".into(),
            stemmer: "english".into(),
            stopwords: "english".into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TokenizerKind {
    Word,
    Whitespace,
    WordPunct,
}

/// Configurable analysis pipeline: NFKC fold + lowercasing, ampersand and
/// diacritic normalization, tokenization, stopword removal, stemming.
pub struct TextPipeline {
    tokenizer: TokenizerKind,
    stemmer: Option<Stemmer>,
    stopwords: Option<&'static HashSet<&'static str>>,
}

impl TextPipeline {
    pub fn new(config: &TextConfig) -> Result<Self, SearchError> {
        Ok(Self {
            tokenizer: lookup_tokenizer(&config.tokenizer)?,
            stemmer: lookup_stemmer(&config.stemmer)?,
            stopwords: lookup_stopwords(&config.stopwords)?,
        })
    }

    fn split(&self, text: &str) -> Vec<String> {
        match self.tokenizer {
            TokenizerKind::Word => WORD_RE
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
            TokenizerKind::Whitespace => {
                text.split_whitespace().map(|s| s.to_string()).collect()
            }
            TokenizerKind::WordPunct => WORDPUNCT_RE
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}

impl Analyzer for TextPipeline {
    fn analyze(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        let folded = folded.replace('&', " and ");
        // NFKD then drop combining marks: "café" -> "cafe"
        let folded: String = folded.nfkd().filter(|c| !is_combining_mark(*c)).collect();

        let mut tokens = Vec::new();
        for token in self.split(&folded) {
            if let Some(stopwords) = self.stopwords {
                if stopwords.contains(token.as_str()) {
                    continue;
                }
            }
            let token = match &self.stemmer {
                Some(stemmer) => stemmer.stem(&token).to_string(),
                None => token,
            };
            if !token.is_empty() {
                tokens.push(token);
            }
        }
        tokens
    }
}

fn lookup_tokenizer(name: &str) -> Result<TokenizerKind, SearchError> {
    match name.to_lowercase().as_str() {
        "word" => Ok(TokenizerKind::Word),
        "whitespace" => Ok(TokenizerKind::Whitespace),
        "wordpunct" => Ok(TokenizerKind::WordPunct),
        other => Err(SearchError::Config(format!(
            "tokenizer {other:?} not supported"
        ))),
    }
}

fn lookup_stemmer(name: &str) -> Result<Option<Stemmer>, SearchError> {
    let algorithm = match name.to_lowercase().as_str() {
        "none" => return Ok(None),
        "english" => Algorithm::English,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "spanish" => Algorithm::Spanish,
        "russian" => Algorithm::Russian,
        "swedish" => Algorithm::Swedish,
        "turkish" => Algorithm::Turkish,
        other => {
            return Err(SearchError::Config(format!(
                "stemmer {other:?} not supported"
            )))
        }
    };
    Ok(Some(Stemmer::create(algorithm)))
}

fn lookup_stopwords(
    name: &str,
) -> Result<Option<&'static HashSet<&'static str>>, SearchError> {
    match name.to_lowercase().as_str() {
        "none" => Ok(None),
        "english" => Ok(Some(&ENGLISH_STOPWORDS)),
        other => Err(SearchError::Config(format!(
            "stopword language {other:?} not supported"
        ))),
    }
}
