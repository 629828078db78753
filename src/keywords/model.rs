//! Text embedding capability used to rank keyword candidates.

use anyhow::Result;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::keywords::stopwords::is_stop_word;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Lowercased tokens of two or more word characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| !is_stop_word(token))
        .collect()
}

/// Sparse feature vector. Similarity is cosine.
#[derive(Debug, Clone, Default)]
pub struct TermVector {
    weights: HashMap<String, f32>,
    norm: f32,
}

impl TermVector {
    pub fn from_weights(weights: HashMap<String, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        Self { weights, norm }
    }

    pub fn is_empty(&self) -> bool {
        self.norm == 0.0
    }

    pub fn cosine(&self, other: &TermVector) -> f32 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };
        let dot: f32 = small
            .iter()
            .filter_map(|(feature, w)| large.get(feature).map(|v| w * v))
            .sum();
        dot / (self.norm * other.norm)
    }
}

/// Turns a document or a candidate phrase into a comparable vector.
pub trait KeywordModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn embed(&self, text: &str) -> Result<TermVector>;
}

/// Bag of words plus character trigrams, so inflections of a word
/// (`model`, `models`, `modeling`) end up close to each other.
#[derive(Debug, Clone)]
pub struct LexicalModel {
    word_weight: f32,
    trigram_weight: f32,
}

impl Default for LexicalModel {
    fn default() -> Self {
        Self {
            word_weight: 1.0,
            trigram_weight: 0.3,
        }
    }
}

impl KeywordModel for LexicalModel {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn embed(&self, text: &str) -> Result<TermVector> {
        let mut weights: HashMap<String, f32> = HashMap::new();
        for token in tokenize(text) {
            let padded: Vec<char> = format!("^{token}$").chars().collect();
            for trigram in padded.windows(3) {
                *weights
                    .entry(format!("#{}", trigram.iter().collect::<String>()))
                    .or_default() += self.trigram_weight;
            }
            *weights.entry(token).or_default() += self.word_weight;
        }
        Ok(TermVector::from_weights(weights))
    }
}

type ModelInit = dyn Fn() -> Result<Arc<dyn KeywordModel>> + Send + Sync;

/// Process-wide keyword model, built on first use. Concurrent first callers
/// block on the same initialization; later callers share the result.
pub struct SharedKeywordModel {
    cell: OnceCell<Arc<dyn KeywordModel>>,
    init: Box<ModelInit>,
}

impl SharedKeywordModel {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn KeywordModel>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
        }
    }

    pub fn lexical() -> Self {
        Self::new(|| Ok(Arc::new(LexicalModel::default()) as Arc<dyn KeywordModel>))
    }

    pub fn get(&self) -> Result<Arc<dyn KeywordModel>> {
        self.cell
            .get_or_try_init(|| {
                info!("Loading keyword model...");
                let model = (self.init)()?;
                info!("Keyword model '{}' loaded successfully", model.name());
                Ok(model)
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for SharedKeywordModel {
    fn default() -> Self {
        Self::lexical()
    }
}
