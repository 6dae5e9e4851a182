use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nhs_core::persist::save_dataset;
use nhs_core::{Condition, Dataset, Subpage, DEFAULT_URL};
use std::collections::BTreeMap;
use tempfile::tempdir;
use tower::ServiceExt;

const GOUT: &str = "http://www.nhs.uk/Conditions/Gout/Pages/Introduction.aspx";
const GOUT_TREATMENT: &str = "http://www.nhs.uk/Conditions/Gout/Pages/Treatment.aspx";
const ACNE: &str = "http://www.nhs.uk/Conditions/Acne/Pages/Introduction.aspx";

fn tiny_dataset() -> Dataset {
    let mut ds = Dataset::new();
    let mut subpages = BTreeMap::new();
    subpages.insert(
        "treatment".to_string(),
        Subpage { url: GOUT_TREATMENT.into(), keywords: Some("Conditions,treatment".into()), text: "Painkillers ease a gout attack.".into() },
    );
    ds.insert_condition(Condition {
        title: "Gout".into(),
        url: GOUT.into(),
        keywords: Some("Conditions,gout,joints".into()),
        text: "Gout is a type of arthritis.".into(),
        subpages,
    });
    ds.insert_condition(Condition {
        title: "Acne".into(),
        url: ACNE.into(),
        keywords: Some("Conditions,acne,spots".into()),
        text: "Acne causes spots on the skin.".into(),
        subpages: BTreeMap::new(),
    });
    ds
}

fn app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nhs-conditions.json");
    save_dataset(&path, &tiny_dataset()).unwrap();
    server::build_app(&path).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let location = resp.headers().get(header::LOCATION).map(|v| v.to_str().unwrap().to_string());
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn question_redirects_to_best_page() {
    let (status, location, _) = call(app(), "/?q=how%20do%20I%20treat%20gout%3F").await;
    assert_eq!(status, StatusCode::FOUND);
    // "treat" is a verb; "gout" alone favours the introduction page.
    assert_eq!(location.as_deref(), Some(GOUT));

    let (status, location, _) = call(app(), "/?q=gout%20treatment").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some(GOUT_TREATMENT));

    let (_, location, _) = call(app(), "/?q=spots").await;
    assert_eq!(location.as_deref(), Some(ACNE));
}

#[tokio::test]
async fn unknown_question_redirects_to_hub() {
    let (status, location, _) = call(app(), "/?q=zebra").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some(DEFAULT_URL));
}

#[tokio::test]
async fn missing_question_returns_usage() {
    for uri in ["/", "/?lang=en", "/?q="] {
        let (status, location, body) = call(app(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(location.is_none());
        assert_eq!(body, server::USAGE_MESSAGE);
    }
}

#[test]
fn unreadable_dataset_is_fatal() {
    let dir = tempdir().unwrap();
    assert!(server::build_app(dir.path().join("missing.json")).is_err());
}
