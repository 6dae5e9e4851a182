use nhs_core::persist::{load_dataset, save_dataset};
use nhs_core::{Condition, Dataset, Error, Subpage};
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

fn sample() -> Dataset {
    let mut ds = Dataset::new();
    let mut subpages = BTreeMap::new();
    subpages.insert(
        "causes".to_string(),
        Subpage { url: "http://www.nhs.uk/Conditions/Gout/Pages/Causes.aspx".into(), keywords: None, text: "Uric acid. ".into() },
    );
    subpages.insert(
        "treatment".to_string(),
        Subpage {
            url: "http://www.nhs.uk/Conditions/Gout/Pages/Treatment.aspx".into(),
            keywords: Some("Conditions,treatment,ibuprofen".into()),
            text: "Anti-inflammatory painkillers — “NSAIDs”. ".into(),
        },
    );
    ds.insert_condition(Condition {
        title: "Gout".into(),
        url: "http://www.nhs.uk/Conditions/Gout/Pages/Introduction.aspx".into(),
        keywords: Some("Conditions,gout".into()),
        text: "Gout is a type of arthritis. ".into(),
        subpages,
    });
    ds.insert_condition(Condition {
        title: "http://www.nhs.uk/Service-Search/Pages/Results.aspx".into(),
        url: "http://www.nhs.uk/Service-Search/Pages/Results.aspx".into(),
        keywords: None,
        text: String::new(),
        subpages: BTreeMap::new(),
    });
    ds
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("nhs-conditions.json");
    let ds = sample();
    save_dataset(&path, &ds).unwrap();
    let loaded = load_dataset(&path).unwrap();
    assert_eq!(loaded, ds);
}

#[test]
fn loads_records_without_keywords() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{"Acne":{"title":"Acne","url":"http://www.nhs.uk/Conditions/Acne/Pages/Introduction.aspx","text":"Spots. ","subpages":{"causes":{"url":"http://www.nhs.uk/Conditions/Acne/Pages/Causes.aspx","text":""}}}}"#,
    )
    .unwrap();
    let ds = load_dataset(&path).unwrap();
    let acne = ds.get("Acne").unwrap();
    assert!(acne.keywords.is_none());
    assert!(acne.subpages["causes"].keywords.is_none());
}

#[test]
fn missing_and_malformed_files_are_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(load_dataset(&missing), Err(Error::Persistence { .. })));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"Acne\": [1, 2").unwrap();
    let err = load_dataset(&broken).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(!err.is_recoverable());
}
