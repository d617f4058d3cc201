//! End-to-end tests running the pipeline against a mocked search API.

use harga_bekas::config::Config;
use harga_bekas::google::GoogleClient;
use harga_bekas::listing::ProductIdentity;
use harga_bekas::pipeline::{Pipeline, PipelineOutcome};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_config() -> Config {
    Config {
        api_key: Some("test-key".to_string()),
        search_engine_id: Some("test-cx".to_string()),
        delay_ms: 0,
        delay_jitter_ms: 0,
        ..Config::default()
    }
}

fn identity() -> ProductIdentity {
    ProductIdentity::new("iPhone", "14 Pro", Some("256GB".to_string()))
}

fn page_body(items: &[(&str, &str, &str)]) -> serde_json::Value {
    serde_json::json!({
        "items": items
            .iter()
            .map(|(title, snippet, link)| {
                serde_json::json!({"title": title, "snippet": snippet, "link": link})
            })
            .collect::<Vec<_>>()
    })
}

fn empty_body() -> serde_json::Value {
    serde_json::json!({"kind": "customsearch#search"})
}

#[tokio::test]
async fn test_search_to_report() {
    let mock_server = MockServer::start().await;

    let page1 = page_body(&[
        ("iPhone 14 Pro 256GB bekas mulus", "harga 15.000.000", "https://tokopedia.com/a"),
        ("Case iPhone 14 Pro", "bekas", "https://tokopedia.com/b"),
        ("iPhone 14 Pro 256GB BNIB", "segel resmi", "https://tokopedia.com/c"),
    ]);

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page1))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(&mock_server)
        .await;

    let config = make_config();
    let client = GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();
    let pipeline = Pipeline::new(config);

    let outcome = pipeline.run(&client, &identity()).await.unwrap();

    match outcome {
        PipelineOutcome::Report(report) => {
            assert_eq!(report.raw_count, 3);
            assert_eq!(report.qualified_count, 1);
            assert_eq!(report.cleaned_count, 1);
            assert_eq!(report.summary.mean, 15_000_000);
            assert_eq!(report.summary.median, 15_000_000);
            assert_eq!(report.summary.min, 15_000_000);
            assert_eq!(report.summary.max, 15_000_000);
            assert_eq!(report.listings.len(), 1);
            assert_eq!(report.listings[0].link, "https://tokopedia.com/a");
            assert!(report.query.contains("\"iPhone 14 Pro 256GB\""));
        }
        other => panic!("expected report, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_carries_site_scope_and_negatives() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(&mock_server)
        .await;

    let config = make_config();
    let client = GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();
    let pipeline = Pipeline::new(config);

    let outcome = pipeline.run(&client, &identity()).await.unwrap();

    match outcome {
        PipelineOutcome::NoResults { query } => {
            assert!(query.contains("(bekas|second|seken)"));
            assert!(query.contains("site:tokopedia.com OR site:shopee.co.id"));
            assert!(query.contains("-baru -kredit"));
            assert!(query.contains("-\"iPhone 13\""));
        }
        other => panic!("expected no results, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_on_later_page_still_reports() {
    let mock_server = MockServer::start().await;

    let page1 = page_body(&[(
        "iPhone 14 Pro 256GB second mulus",
        "Rp 14.500.000",
        "https://shopee.co.id/x",
    )]);

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page1))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = make_config();
    let client = GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();
    let pipeline = Pipeline::new(config);

    let outcome = pipeline.run(&client, &identity()).await.unwrap();

    match outcome {
        PipelineOutcome::Report(report) => {
            assert_eq!(report.raw_count, 1);
            assert_eq!(report.listings[0].price, 14_500_000);
        }
        other => panic!("expected report from fetched pages, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_on_first_page_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = make_config();
    let client = GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();
    let pipeline = Pipeline::new(config);

    let err = pipeline.run(&client, &identity()).await.unwrap_err();
    assert!(matches!(err, harga_bekas::Error::Transport(_)));
}

#[tokio::test]
async fn test_duplicate_links_across_pages() {
    let mock_server = MockServer::start().await;

    let page1 = page_body(&[(
        "iPhone 14 Pro 256GB bekas",
        "Rp 14.000.000",
        "https://tokopedia.com/same",
    )]);
    let page2 = page_body(&[(
        "iPhone 14 Pro 256GB seken",
        "Rp 13.000.000",
        "https://tokopedia.com/same",
    )]);

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page1))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page2))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(&mock_server)
        .await;

    let config = make_config();
    let client = GoogleClient::with_base_url(&config, Some(mock_server.uri())).unwrap();
    let pipeline = Pipeline::new(config);

    let outcome = pipeline.run(&client, &identity()).await.unwrap();

    match outcome {
        PipelineOutcome::Report(report) => {
            assert_eq!(report.raw_count, 2);
            // First occurrence wins.
            assert_eq!(report.qualified_count, 1);
            assert_eq!(report.listings[0].price, 14_000_000);
        }
        other => panic!("expected report, got {:?}", other),
    }
}
