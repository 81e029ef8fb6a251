use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_client(base_url: &str, max_retries: u32) -> SerpApiClient {
    SerpApiClient::with_base_url("test-key", 5, max_retries, 0, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_uses_q_and_location_for_google() {
    let client = test_client("https://serpapi.com", 0);
    let search = PlatformSearch::new(SearchKind::GoogleAds, "python course");
    let url = client.build_url(&search, "India").expect("url");
    assert_eq!(
        url.as_str(),
        "https://serpapi.com/search.json?engine=google&q=python+course&location=India&api_key=test-key"
    );
}

#[test]
fn build_url_uses_search_query_for_youtube() {
    let client = test_client("https://serpapi.com/", 0);
    let search = PlatformSearch::new(SearchKind::YouTubeVideos, "rust");
    let url = client.build_url(&search, "India").expect("url");
    assert_eq!(
        url.as_str(),
        "https://serpapi.com/search.json?engine=youtube&search_query=rust&api_key=test-key"
    );
}

#[test]
fn redacted_url_drops_api_key() {
    let client = test_client("https://serpapi.com", 0);
    let search = PlatformSearch::new(SearchKind::BingAds, "x");
    let url = client.build_url(&search, "India").expect("url");
    assert!(!redact_key(&url).contains("test-key"));
}

#[tokio::test]
async fn fetch_normalizes_google_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ads": [{"title": "Learn Python", "snippet": "Enroll now", "position": 1}],
            "shopping_results": [{"title": "Course", "price": "$5"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let search = PlatformSearch::new(SearchKind::GoogleAds, "python");
    let ads = client.fetch(&search, "India").await.expect("fetch");
    assert_eq!(ads.len(), 2);
    assert_eq!(ads[0].title, "Learn Python");
    assert_eq!(ads[1].ad_type, "Shopping Ad");
}

#[tokio::test]
async fn api_error_field_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Invalid API key."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let search = PlatformSearch::new(SearchKind::BingAds, "python");
    let err = client.fetch(&search, "India").await.unwrap_err();
    assert!(matches!(err, SourceError::Api(ref m) if m == "Invalid API key."));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video_results": [{"title": "Rust tutorial", "views": "1M"}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 2);
    let search = PlatformSearch::new(SearchKind::YouTubeVideos, "rust");
    let ads = client.fetch(&search, "India").await.expect("fetch after retry");
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].views.as_deref(), Some("1M"));
}

#[tokio::test]
async fn fetch_all_skips_failing_platforms() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("engine", "bing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("engine", "youtube"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video_results": [{"title": "Video"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("engine", "google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ads": [{"title": "Ad"}],
            "organic_results": [{"title": "Post", "link": "https://linkedin.com/p/1"}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let outcome = client.fetch_all(&SearchPlan::default_for("India")).await;

    let platforms: Vec<Platform> = outcome.ads.iter().map(|a| a.platform.clone()).collect();
    assert_eq!(
        platforms,
        vec![Platform::Google, Platform::LinkedIn, Platform::YouTube]
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].platform, Platform::Bing);
}
