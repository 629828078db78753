pub mod model;
pub mod stopwords;

pub use model::{KeywordModel, LexicalModel, SharedKeywordModel, TermVector};

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::extractor::language::{detect_language, is_english};

/// Texts shorter than this yield no keywords.
pub const MIN_TEXT_LENGTH: usize = 50;
pub const DEFAULT_DIVERSITY: f32 = 0.5;
/// Most frequent candidates kept for ranking.
const MAX_CANDIDATES: usize = 1000;

/// Keyword sets split by shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct KeywordCategories {
    pub single_words: Vec<String>,
    pub phrases: Vec<String>,
    pub all: Vec<String>,
}

/// Ranks candidate words and phrases by similarity to the whole text, with
/// maximal marginal relevance so near-duplicates do not crowd the top.
#[derive(Clone)]
pub struct KeywordExtractor {
    model: Arc<SharedKeywordModel>,
}

impl KeywordExtractor {
    pub fn new(model: Arc<SharedKeywordModel>) -> Self {
        Self { model }
    }

    /// `(keyword, score)` pairs, best first, at most `top_n`. Failures are
    /// logged and produce an empty list.
    pub fn extract_keywords(&self, text: &str, top_n: usize, use_ngrams: bool) -> Vec<(String, f32)> {
        if text.chars().count() < MIN_TEXT_LENGTH {
            warn!("Text too short for keyword extraction");
            return Vec::new();
        }

        let language = detect_language(text);
        if !is_english(language.as_deref()) {
            warn!(
                "Keyword extraction on non-English text ({}), stop-word filtering is English only",
                language.as_deref().unwrap_or("unknown")
            );
        }

        match self.rank(text, top_n, use_ngrams) {
            Ok(keywords) => {
                info!("Extracted {} keywords from text", keywords.len());
                keywords
            }
            Err(e) => {
                error!("Keyword extraction failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn extract_keywords_list(&self, text: &str, top_n: usize, use_ngrams: bool) -> Vec<String> {
        self.extract_keywords(text, top_n, use_ngrams)
            .into_iter()
            .map(|(keyword, _)| keyword)
            .collect()
    }

    pub fn extract_keywords_by_category(&self, text: &str) -> KeywordCategories {
        let all = self.extract_keywords_list(text, 15, true);
        let (phrases, single_words): (Vec<_>, Vec<_>) =
            all.iter().cloned().partition(|keyword| keyword.contains(' '));

        KeywordCategories {
            single_words: single_words.into_iter().take(8).collect(),
            phrases: phrases.into_iter().take(7).collect(),
            all: all.into_iter().take(10).collect(),
        }
    }

    fn rank(&self, text: &str, top_n: usize, use_ngrams: bool) -> Result<Vec<(String, f32)>> {
        let max_ngram = if use_ngrams { 3 } else { 1 };
        let candidates = candidates(text, max_ngram);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let model = self.model.get()?;
        let document = model.embed(text)?;
        let vectors = candidates
            .iter()
            .map(|candidate| model.embed(candidate))
            .collect::<Result<Vec<_>>>()?;
        let relevance: Vec<f32> = vectors.iter().map(|v| v.cosine(&document)).collect();

        let mut keywords: Vec<(String, f32)> = mmr(&relevance, &vectors, top_n, DEFAULT_DIVERSITY)
            .into_iter()
            .map(|i| (candidates[i].clone(), round4(relevance[i])))
            .collect();
        keywords.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(keywords)
    }
}

/// Distinct 1..=`max_ngram` token sequences, in alphabetical order, limited
/// to the most frequent ones.
fn candidates(text: &str, max_ngram: usize) -> Vec<String> {
    let tokens = model::tokenize(text);
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for n in 1..=max_ngram {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_default() += 1;
        }
    }

    if counts.len() > MAX_CANDIDATES {
        let mut by_frequency: Vec<_> = counts.into_iter().collect();
        // stable: equal counts stay alphabetical
        by_frequency.sort_by(|a, b| b.1.cmp(&a.1));
        by_frequency.truncate(MAX_CANDIDATES);
        let mut kept: Vec<String> = by_frequency.into_iter().map(|(c, _)| c).collect();
        kept.sort();
        return kept;
    }
    counts.into_keys().collect()
}

/// Indices picked by maximal marginal relevance, in selection order.
fn mmr(relevance: &[f32], vectors: &[TermVector], top_n: usize, diversity: f32) -> Vec<usize> {
    let Some(first) = argmax(relevance.iter().copied().enumerate()) else {
        return Vec::new();
    };

    let mut selected = vec![first];
    let mut remaining: Vec<usize> = (0..relevance.len()).filter(|&i| i != first).collect();
    // highest similarity of each candidate to anything already selected
    let mut redundancy: Vec<f32> = vectors.iter().map(|v| v.cosine(&vectors[first])).collect();

    while selected.len() < top_n && !remaining.is_empty() {
        let scores = remaining
            .iter()
            .map(|&i| (i, (1.0 - diversity) * relevance[i] - diversity * redundancy[i]));
        let Some(best) = argmax(scores) else {
            break;
        };

        selected.push(best);
        remaining.retain(|&i| i != best);
        for &i in &remaining {
            redundancy[i] = redundancy[i].max(vectors[i].cosine(&vectors[best]));
        }
    }
    selected
}

/// First index holding the maximum.
fn argmax(scores: impl Iterator<Item = (usize, f32)>) -> Option<usize> {
    scores
        .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((i, score)),
        })
        .map(|(i, _)| i)
}

fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ARTICLE: &str = "Rust is a systems programming language focused on memory safety. \
        The Rust compiler checks ownership and borrowing at compile time, so memory safety \
        does not need a garbage collector. Many teams adopt Rust for web services, command \
        line tools and embedded software because the compiler catches bugs early.";

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(SharedKeywordModel::lexical()))
    }

    fn vector(pairs: &[(&str, f32)]) -> TermVector {
        TermVector::from_weights(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn short_text_yields_nothing() {
        assert!(extractor().extract_keywords("Too short to rank.", 10, true).is_empty());
    }

    #[test]
    fn respects_top_n_and_orders_by_score() {
        let keywords = extractor().extract_keywords(ARTICLE, 5, true);
        assert_eq!(keywords.len(), 5);
        assert!(keywords.windows(2).all(|pair| pair[0].1 >= pair[1].1));

        let mut unique: Vec<_> = keywords.iter().map(|(k, _)| k.clone()).collect();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn rust_ranks_among_top_keywords() {
        let keywords = extractor().extract_keywords_list(ARTICLE, 5, false);
        assert!(keywords.iter().any(|k| k == "rust"), "{keywords:?}");
        assert!(keywords.iter().all(|k| !k.contains(' ')));
    }

    #[test]
    fn categories_split_on_whitespace() {
        let categories = extractor().extract_keywords_by_category(ARTICLE);
        assert!(categories.single_words.len() <= 8);
        assert!(categories.phrases.len() <= 7);
        assert!(categories.all.len() <= 10);
        assert!(categories.single_words.iter().all(|k| !k.contains(' ')));
        assert!(categories.phrases.iter().all(|k| k.contains(' ')));
    }

    #[test]
    fn failing_model_yields_empty_list() {
        let model = SharedKeywordModel::new(|| anyhow::bail!("no model"));
        let extractor = KeywordExtractor::new(Arc::new(model));
        assert!(extractor.extract_keywords(ARTICLE, 10, true).is_empty());
    }

    #[test]
    fn candidates_skip_stop_words_before_building_phrases() {
        let candidates = candidates("memory of safety", 2);
        assert_eq!(candidates, vec!["memory", "memory safety", "safety"]);
    }

    #[test]
    fn mmr_prefers_diverse_candidate_over_duplicate() {
        let a = vector(&[("x", 1.0)]);
        let a_copy = vector(&[("x", 1.0)]);
        let b = vector(&[("y", 1.0)]);
        let picked = mmr(&[0.9, 0.89, 0.5], &[a, a_copy, b], 2, 0.5);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn mmr_without_diversity_is_plain_relevance() {
        let vectors = vec![vector(&[("x", 1.0)]), vector(&[("x", 1.0)]), vector(&[("y", 1.0)])];
        let picked = mmr(&[0.9, 0.89, 0.5], &vectors, 2, 0.0);
        assert_eq!(picked, vec![0, 1]);
    }
}
