use nhs_core::index::{index_entry, index_text};
use nhs_core::query::{extract_nouns, score};
use nhs_core::{build_index, resolve, Analyzer, Condition, Dataset, InvertedIndex, LexiconAnalyzer, PartOfSpeech, Subpage, Term, DEFAULT_URL};
use std::collections::BTreeMap;

/// Analyzer that tags every token from a fixed script, for exact weight checks.
struct Scripted(Vec<Term>);

impl Analyzer for Scripted {
    fn terms(&self, _text: &str) -> Vec<Term> { self.0.clone() }
    fn noun_root(&self, noun: &str) -> String { noun.to_lowercase() }
}

fn term(text: &str, pos: PartOfSpeech) -> Term { Term { text: text.into(), pos } }

fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-12 }

#[test]
fn compound_root_spreads_weight_over_parts() {
    let mut script = vec![term("Ear infection", PartOfSpeech::Noun)];
    script.extend((0..9).map(|_| term("the", PartOfSpeech::Function)));
    let analyzer = Scripted(script);

    let mut index = InvertedIndex::new();
    index_text(&mut index, &analyzer, "ignored", "http://a");

    assert!(close(index.weight("ear infection", "http://a"), 0.1));
    assert!(close(index.weight("ear", "http://a"), 0.05));
    assert!(close(index.weight("infection", "http://a"), 0.05));
}

#[test]
fn weights_accumulate() {
    let mut index = InvertedIndex::new();
    index.add("asthma", "http://a", 0.25);
    index.add("asthma", "http://a", 0.5);
    assert!(close(index.weight("asthma", "http://a"), 0.75));
}

#[test]
fn single_word_root_counts_as_its_own_part() {
    let analyzer = Scripted(vec![term("gout", PartOfSpeech::Noun), term("hurts", PartOfSpeech::Verb)]);
    let mut index = InvertedIndex::new();
    index_text(&mut index, &analyzer, "ignored", "http://a");
    assert!(close(index.weight("gout", "http://a"), 1.0));
}

#[test]
fn label_is_indexed_once_when_keywords_lack_it() {
    let analyzer = LexiconAnalyzer::new();

    let mut without = InvertedIndex::new();
    index_entry(&mut without, &analyzer, "http://a", Some("Conditions,asthma"), "", "symptoms");
    assert!(without.weight("symptom", "http://a") > 0.0);

    // "Conditions" is the category label and is skipped.
    assert_eq!(without.weight("condition", "http://a"), 0.0);

    let mut with = InvertedIndex::new();
    index_entry(&mut with, &analyzer, "http://a", Some("Conditions,Symptoms"), "", "symptoms");
    // Once from the keyword only; 2 = root + its single part.
    assert!(close(with.weight("symptom", "http://a"), 2.0));
}

fn dataset() -> Dataset {
    let mut ds = Dataset::new();
    let mut subpages = BTreeMap::new();
    subpages.insert(
        "symptoms".to_string(),
        Subpage {
            url: "http://www.nhs.uk/Conditions/Asthma/Pages/Symptoms.aspx".into(),
            keywords: Some("Conditions,wheezing".into()),
            text: "The main symptoms are wheezing and coughing.".into(),
        },
    );
    ds.insert_condition(Condition {
        title: "Asthma".into(),
        url: "http://www.nhs.uk/Conditions/Asthma/Pages/Introduction.aspx".into(),
        keywords: Some("Conditions,asthma,lungs".into()),
        text: "Asthma is a long-term condition of the lungs.".into(),
        subpages,
    });
    ds.insert_condition(Condition {
        title: "Gout".into(),
        url: "http://www.nhs.uk/Conditions/Gout/Pages/Introduction.aspx".into(),
        keywords: None,
        text: "Gout is a type of arthritis in the joints.".into(),
        subpages: BTreeMap::new(),
    });
    ds
}

#[test]
fn resolves_to_best_page() {
    let analyzer = LexiconAnalyzer::new();
    let index = build_index(&dataset(), &analyzer);

    assert_eq!(
        resolve(&index, &analyzer, "what are the symptoms of asthma?"),
        "http://www.nhs.uk/Conditions/Asthma/Pages/Symptoms.aspx"
    );
    assert_eq!(resolve(&index, &analyzer, "gout"), "http://www.nhs.uk/Conditions/Gout/Pages/Introduction.aspx");
}

#[test]
fn unknown_or_empty_questions_fall_back() {
    let analyzer = LexiconAnalyzer::new();
    let index = build_index(&dataset(), &analyzer);
    assert_eq!(resolve(&index, &analyzer, ""), DEFAULT_URL);
    assert_eq!(resolve(&index, &analyzer, "zebras"), DEFAULT_URL);
    assert!(extract_nouns(&analyzer, "").is_empty());
}

#[test]
fn scores_sum_over_nouns() {
    let mut index = InvertedIndex::new();
    index.add("rash", "http://a", 0.2);
    index.add("fever", "http://a", 0.1);
    index.add("fever", "http://b", 0.25);
    let scores = score(&index, &["rash".to_string(), "fever".to_string(), "zebra".to_string()]);
    assert!(close(scores["http://a"], 0.3));
    assert!(close(scores["http://b"], 0.25));
    assert_eq!(scores.len(), 2);
}

#[test]
fn plural_text_matches_singular_question() {
    let analyzer = LexiconAnalyzer::new();
    let mut ds = Dataset::new();
    ds.insert_condition(Condition {
        title: "Flu".into(),
        url: "http://flu".into(),
        keywords: None,
        text: "Flu is caused by viruses.".into(),
        subpages: BTreeMap::new(),
    });
    let index = build_index(&ds, &analyzer);
    assert_eq!(resolve(&index, &analyzer, "virus"), "http://flu");
    assert_eq!(resolve(&index, &analyzer, "which viruses cause flu?"), "http://flu");
}
