//! TF-IDF dominant-term extraction over conversation texts.
//!
//! Deterministic given the same input sequence and stop-word set: the
//! vocabulary is built in lexicographic order and every ranking tie breaks
//! lexicographically. Scores use the smoothed idf
//! `ln((1 + n) / (1 + df)) + 1` with per-document L2 normalization, averaged
//! across documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One dominant term with its mean TF-IDF score, rounded to 3 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Vocabulary sizing adapted to the corpus. Small corpora get fewer features
/// and no minimum document frequency so a handful of conversations still
/// produces terms.
const fn vocab_limits(n_docs: usize) -> (usize, usize) {
    if n_docs < 5 { (100, 1) } else { (300, 2) }
}

/// Extract the `top_k` dominant unigrams and bigrams across `texts`.
///
/// Fewer than two documents yields an empty result; a single conversation
/// has no corpus to weight against.
#[must_use]
pub fn dominant_terms(texts: &[&str], stopwords: &[&str], top_k: usize) -> Vec<TermScore> {
    let n_docs = texts.len();
    if n_docs < 2 {
        return Vec::new();
    }
    let (max_features, min_df) = vocab_limits(n_docs);

    let docs: Vec<Vec<String>> = texts.iter().map(|t| ngrams(t, stopwords)).collect();

    // Document frequency and corpus-wide count per term, in lexicographic
    // order via BTreeMap.
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for term in doc {
            *seen.entry(term).or_insert(0) += 1;
        }
        for (term, count) in seen {
            *df.entry(term).or_insert(0) += 1;
            *total.entry(term).or_insert(0) += count;
        }
    }

    let mut vocab: Vec<&str> = df
        .iter()
        .filter(|&(_, &d)| d >= min_df)
        .map(|(&term, _)| term)
        .collect();
    if vocab.len() > max_features {
        // Keep the most frequent terms; ties break lexicographically because
        // the input is already sorted.
        vocab.sort_by(|a, b| total[b].cmp(&total[a]).then_with(|| a.cmp(b)));
        vocab.truncate(max_features);
        vocab.sort_unstable();
    }
    if vocab.is_empty() {
        return Vec::new();
    }

    let index: BTreeMap<&str, usize> = vocab.iter().enumerate().map(|(i, &t)| (t, i)).collect();
    #[allow(clippy::cast_precision_loss)]
    let idf: Vec<f64> = vocab
        .iter()
        .map(|term| (((1 + n_docs) as f64) / ((1 + df[term]) as f64)).ln() + 1.0)
        .collect();

    let mut mean = vec![0.0f64; vocab.len()];
    for doc in &docs {
        let mut row = vec![0.0f64; vocab.len()];
        for term in doc {
            if let Some(&i) = index.get(term.as_str()) {
                row[i] += idf[i];
            }
        }
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (slot, value) in mean.iter_mut().zip(&row) {
                *slot += value / norm;
            }
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let n = n_docs as f64;

    let mut ranked: Vec<TermScore> = vocab
        .iter()
        .zip(&mean)
        .map(|(&term, score)| TermScore {
            term: term.to_string(),
            score: round3(score / n),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    ranked.truncate(top_k);
    ranked
}

/// Lowercased unigrams and adjacent bigrams, stop words removed, tokens
/// shorter than two characters dropped.
fn ngrams(text: &str, stopwords: &[&str]) -> Vec<String> {
    let tokens: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !stopwords.contains(t))
        .map(str::to_string)
        .collect();

    let mut grams = tokens.clone();
    grams.extend(tokens.windows(2).map(|pair| pair.join(" ")));
    grams
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
