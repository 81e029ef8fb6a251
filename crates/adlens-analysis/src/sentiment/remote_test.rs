use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

async fn oracle_for(server: &MockServer) -> RemoteSentimentOracle {
    RemoteSentimentOracle::new(
        &format!("{}/models/sentiment", server.uri()),
        "hf_test",
        5,
        LocalSentimentOracle::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn flat_response_picks_highest_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/sentiment"))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_json(serde_json::json!({ "inputs": "learn python" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "negative", "score": 0.1 },
            { "label": "positive", "score": 0.85 },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let reading = oracle_for(&server).await.classify("learn python").await;
    assert_eq!(reading.label, SentimentLabel::Positive);
    assert!((reading.score - 0.85).abs() < 1e-9);
}

#[tokio::test]
async fn nested_response_maps_numbered_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/sentiment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([[
            { "label": "LABEL_0", "score": 0.2 },
            { "label": "LABEL_1", "score": 0.7 },
            { "label": "LABEL_2", "score": 0.1 },
        ]])))
        .mount(&server)
        .await;

    let reading = oracle_for(&server).await.classify("an ad").await;
    assert_eq!(reading.label, SentimentLabel::Neutral);
    assert!((reading.score - 0.7).abs() < 1e-9);
}

#[tokio::test]
async fn server_error_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    // "best" and "expert" are both positive words locally
    let reading = oracle_for(&server).await.classify("best expert course").await;
    assert_eq!(reading.label, SentimentLabel::Positive);
    assert!((reading.score - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn unparsable_body_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("model is loading"))
        .mount(&server)
        .await;

    let reading = oracle_for(&server).await.classify("a hard problem").await;
    assert_eq!(reading.label, SentimentLabel::Negative);
}

#[tokio::test]
async fn empty_label_list_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let reading = oracle_for(&server).await.classify("plain text").await;
    assert_eq!(reading.label, SentimentLabel::Neutral);
    assert!((reading.score - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn empty_text_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let reading = oracle_for(&server).await.classify("  ").await;
    assert_eq!(reading.label, SentimentLabel::Neutral);
}

#[test]
fn label_mapping_is_case_insensitive() {
    assert_eq!(map_label("Positive"), SentimentLabel::Positive);
    assert_eq!(map_label("NEG"), SentimentLabel::Negative);
    assert_eq!(map_label("mixed"), SentimentLabel::Neutral);
}
