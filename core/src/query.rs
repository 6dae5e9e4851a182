use crate::{Analyzer, InvertedIndex, HUB_URL};
use std::collections::HashMap;

/// Where a question lands when none of its nouns are indexed.
pub const DEFAULT_URL: &str = HUB_URL;

pub fn extract_nouns<A: Analyzer + ?Sized>(analyzer: &A, question: &str) -> Vec<String> {
    analyzer
        .sentence_terms(question)
        .into_iter()
        .filter(|t| t.is_noun())
        .map(|t| analyzer.noun_root(&t.text).to_lowercase())
        .filter(|root| !root.is_empty())
        .collect()
}

/// Sums the index weight of every noun per URL.
pub fn score(index: &InvertedIndex, nouns: &[String]) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    for noun in nouns {
        if let Some(postings) = index.postings(noun) {
            for (url, weight) in postings {
                *scores.entry(url.clone()).or_insert(0.0) += weight;
            }
        }
    }
    scores
}

/// Highest score wins; equal scores resolve to the lexicographically smallest URL.
pub fn top_match(scores: &HashMap<String, f64>) -> Option<&str> {
    scores
        .iter()
        .max_by(|(ua, sa), (ub, sb)| sa.total_cmp(sb).then_with(|| ub.cmp(ua)))
        .map(|(url, _)| url.as_str())
}

pub fn resolve<A: Analyzer + ?Sized>(index: &InvertedIndex, analyzer: &A, question: &str) -> String {
    let nouns = extract_nouns(analyzer, question);
    let scores = score(index, &nouns);
    let url = top_match(&scores).unwrap_or(DEFAULT_URL).to_string();
    tracing::debug!(?nouns, candidates = scores.len(), %url, "question resolved");
    url
}
