use crate::{Analyzer, Dataset};
use std::collections::HashMap;

/// Label under which a condition's own page is indexed.
pub const INTRODUCTION_LABEL: &str = "introduction";

/// term -> (url -> accumulated weight)
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    terms: HashMap<String, HashMap<String, f64>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Adds `weight` to the (term, url) posting; weights accumulate, they are never overwritten.
    pub fn add(&mut self, term: &str, url: &str, weight: f64) {
        *self
            .terms
            .entry(term.to_string())
            .or_default()
            .entry(url.to_string())
            .or_insert(0.0) += weight;
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<String, f64>> { self.terms.get(term) }

    pub fn weight(&self, term: &str, url: &str) -> f64 {
        self.terms.get(term).and_then(|p| p.get(url)).copied().unwrap_or(0.0)
    }

    pub fn num_terms(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

/// Builds the index over every condition (as "introduction") and every subpage (under its type label).
pub fn build_index<A: Analyzer + ?Sized>(dataset: &Dataset, analyzer: &A) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    let mut pages = 0usize;
    for condition in dataset.conditions() {
        index_entry(&mut index, analyzer, &condition.url, condition.keywords.as_deref(), &condition.text, INTRODUCTION_LABEL);
        pages += 1;
        for (label, subpage) in &condition.subpages {
            index_entry(&mut index, analyzer, &subpage.url, subpage.keywords.as_deref(), &subpage.text, label);
            pages += 1;
        }
    }
    tracing::info!(pages, terms = index.num_terms(), "inverted index built");
    index
}

/// Indexes one page: its keywords minus the leading category label, the page label
/// unless a keyword already names it, then the page text.
pub fn index_entry<A: Analyzer + ?Sized>(
    index: &mut InvertedIndex,
    analyzer: &A,
    url: &str,
    keywords: Option<&str>,
    text: &str,
    label: &str,
) {
    let mut label_seen = false;
    for keyword in keywords.unwrap_or_default().split(',').skip(1) {
        index_text(index, analyzer, keyword, url);
        if keyword.trim().eq_ignore_ascii_case(label) {
            label_seen = true;
        }
    }
    if !label_seen {
        index_text(index, analyzer, label, url);
    }
    index_text(index, analyzer, text, url);
}

/// Every noun root gets 1/N, where N is the token count of `text`; each of its
/// whitespace-separated parts additionally gets an equal share of 1/N.
pub fn index_text<A: Analyzer + ?Sized>(index: &mut InvertedIndex, analyzer: &A, text: &str, url: &str) {
    let terms = analyzer.terms(text);
    if terms.is_empty() {
        return;
    }
    let n = terms.len() as f64;
    for term in terms.iter().filter(|t| t.is_noun()) {
        let root = analyzer.noun_root(&term.text.to_lowercase()).to_lowercase();
        if root.is_empty() {
            continue;
        }
        index.add(&root, url, 1.0 / n);
        let parts: Vec<&str> = root.split_whitespace().collect();
        let share = 1.0 / n / parts.len() as f64;
        for part in parts {
            index.add(part, url, share);
        }
    }
}
