//! Integration tests
//!
//! Test end-to-end functionality of the entire application

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use coinforge::config::{AppConfig, CompletionOptions, ProviderConfig, Settings};
use coinforge::handlers::{router_with_state, AppState};
use coinforge::services::metadata::PinataUploader;
use coinforge::services::{CompletionRouter, MemoryCoinStore, MetadataPublisher};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn provider(name: &str, base_url: &str, api_key: &str) -> ProviderConfig {
    ProviderConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        api_key: api_key.to_string(),
        api_key_env: None,
        model: "mistralai/mistral-7b-instruct-v0.2".to_string(),
        timeout_secs: None,
    }
}

/// Create the app around the given providers, an in-memory store and inline metadata
fn create_test_app(providers: Vec<ProviderConfig>) -> Router {
    create_test_app_with_metadata(providers, MetadataPublisher::new(None))
}

fn create_test_app_with_metadata(providers: Vec<ProviderConfig>, metadata: MetadataPublisher) -> Router {
    let app_config = AppConfig {
        providers,
        completion: CompletionOptions::default(),
    };
    let completions =
        CompletionRouter::from_config(&app_config, Duration::from_secs(5)).expect("Failed to build router");

    let state = AppState::new(
        Settings::default(),
        completions,
        Arc::new(MemoryCoinStore::new()),
        metadata,
    );
    router_with_state(Arc::new(state))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn completion_body(content: &str) -> Value {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}]})
}

#[tokio::test]
async fn test_generate_coin_name() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("a dog themed coin")
                .body_contains("Name|Symbol");
            then.status(200).json_body(completion_body("  DogWifCoin|DOGE\n"));
        })
        .await;

    let app = create_test_app(vec![provider("aimlapi", &server.url("/v1"), "test-key")]);
    let request = json_request("POST", "/api/ai", json!({"prompt": "a dog themed coin", "type": "coin"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"result": "DogWifCoin|DOGE"}));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_description_by_default() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("2-sentence");
            then.status(200)
                .json_body(completion_body("A coin for dogs. Much wow."));
        })
        .await;

    let app = create_test_app(vec![provider("groq", &server.url("/v1"), "test-key")]);
    let request = json_request("POST", "/api/ai", json!({"prompt": "dogs", "type": "banner"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["result"], "A coin for dogs. Much wow.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_without_credentials() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(completion_body("unused"));
        })
        .await;

    let app = create_test_app(vec![
        provider("aimlapi", &server.url("/a"), ""),
        provider("groq", &server.url("/b"), ""),
    ]);
    let request = json_request("POST", "/api/ai", json!({"prompt": "x", "type": "coin"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await, json!({"error": "AI API key not configured"}));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_generate_falls_back_to_next_provider() {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(POST).path("/primary/chat/completions");
            then.status(500).body("upstream exploded");
        })
        .await;
    let backup = server
        .mock_async(|when, then| {
            when.method(POST).path("/backup/chat/completions");
            then.status(200).json_body(completion_body("MoonCoin|MOON"));
        })
        .await;

    let app = create_test_app(vec![
        provider("primary", &server.url("/primary"), "k1"),
        provider("skipped", &server.url("/skipped"), ""),
        provider("backup", &server.url("/backup"), "k3"),
    ]);
    let request = json_request("POST", "/api/ai", json!({"prompt": "moon", "type": "coin"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["result"], "MoonCoin|MOON");
    failing.assert_hits_async(1).await;
    backup.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_generate_all_providers_failing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(502).body("bad gateway");
        })
        .await;

    let app = create_test_app(vec![
        provider("one", &server.url("/one"), "k1"),
        provider("two", &server.url("/two"), "k2"),
    ]);
    let request = json_request("POST", "/api/ai", json!({"prompt": "x", "type": "coin"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await, json!({"error": "Failed to generate content"}));
}

#[tokio::test]
async fn test_generate_rejects_unreadable_body() {
    let app = create_test_app(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_generate_without_content_type() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(completion_body("DogWifCoin|DOGE"));
        })
        .await;

    let app = create_test_app(vec![provider("aimlapi", &server.url("/v1"), "test-key")]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai")
        .body(Body::from(r#"{"prompt":"dog","type":"coin"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["result"], "DogWifCoin|DOGE");
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app(vec![provider("aimlapi", "https://api.aimlapi.com/v1", "k")]);

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = read_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "coinforge");
    assert!(health["version"].is_string());
    assert_eq!(health["details"]["providers"], json!(["aimlapi"]));
    assert_eq!(health["details"]["store"], "memory");
    assert_eq!(health["details"]["chain_id"], 84532);
    assert_eq!(health["details"]["chain"], "Base Sepolia");
}

#[tokio::test]
async fn test_readiness_without_providers() {
    let app = create_test_app(vec![provider("aimlapi", "https://api.aimlapi.com/v1", "")]);

    let response = app.oneshot(get_request("/health/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(read_json(response).await["status"], "not_ready");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = create_test_app(vec![]);

    let response = app.oneshot(get_request("/health/live")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "alive");
}

#[tokio::test]
async fn test_sync_then_list_coins() {
    let app = create_test_app(vec![]);

    let first = json_request(
        "POST",
        "/api/db/coins",
        json!({"address": "0xAAA", "name": "Doge Wif Hat", "creator": "0xC0FFEE"}),
    );
    let response = app.clone().oneshot(first).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let synced = read_json(response).await;
    assert_eq!(synced["success"], true);
    assert_eq!(synced["data"]["symbol"], "DWH");
    assert_eq!(synced["data"]["chain_id"], 84532);

    // distinct created_at ordering
    tokio::time::sleep(Duration::from_millis(5)).await;

    let second = json_request(
        "POST",
        "/api/db/coins",
        json!({"address": "0xBBB", "name": "Moon", "symbol": "moon", "chainId": 8453}),
    );
    let response = app.clone().oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/db/coins")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await;
    let coins = listed["coins"].as_array().unwrap();
    assert_eq!(coins.len(), 2);
    assert_eq!(coins[0]["symbol"], "MOON");
    assert_eq!(coins[0]["chain_id"], 8453);
    assert_eq!(coins[1]["address"], "0xAAA");
}

#[tokio::test]
async fn test_sync_rejects_long_symbol() {
    let app = create_test_app(vec![]);
    let request = json_request(
        "POST",
        "/api/db/coins",
        json!({"address": "0xAAA", "name": "Too Long", "symbol": "ABCDEFGHIJK"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Symbol must be 10 characters or less"})
    );
}

#[tokio::test]
async fn test_sync_requires_address() {
    let app = create_test_app(vec![]);
    let request = json_request("POST", "/api/db/coins", json!({"name": "No Address"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Token address is required");
}

#[tokio::test]
async fn test_feed_placeholder_when_empty() {
    let app = create_test_app(vec![]);

    let response = app.oneshot(get_request("/api/coins")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let feed = read_json(response).await;
    let coins = feed["coins"].as_array().unwrap();
    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0]["symbol"], "ZORA");
    assert_eq!(coins[0]["priceChange24h"], 4.2);
    assert!(feed["timestamp"].is_string());
}

#[tokio::test]
async fn test_feed_lists_synced_coins() {
    let app = create_test_app(vec![]);

    let sync = json_request("POST", "/api/db/coins", json!({"address": "0xAAA", "name": "Frog", "symbol": "FROG"}));
    let response = app.clone().oneshot(sync).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/coins")).await.unwrap();
    let feed = read_json(response).await;
    assert_eq!(feed["coins"][0]["symbol"], "FROG");
    assert_eq!(feed["coins"][0]["totalSupply"], "0");
}

#[tokio::test]
async fn test_feed_filtered_by_creator() {
    let app = create_test_app(vec![]);

    for (address, name, creator) in [("0xA1", "Alpha", "0xAlice"), ("0xB1", "Beta", "0xBob")] {
        let sync = json_request(
            "POST",
            "/api/db/coins",
            json!({"address": address, "name": name, "creator": creator}),
        );
        let response = app.clone().oneshot(sync).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get_request("/api/coins?creator=0xAlice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let feed = read_json(response).await;
    let creators: Vec<&str> = feed["coins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["creatorAddress"].as_str().unwrap())
        .collect();
    assert_eq!(creators, vec!["0xAlice"]);

    let response = app.oneshot(get_request("/api/coins?creator=0xCarol")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["coins"], json!([]));
}

#[tokio::test]
async fn test_metadata_inline_uri() {
    let app = create_test_app(vec![]);
    let request = json_request(
        "POST",
        "/api/metadata",
        json!({"name": "Doge Wif Hat", "symbol": "dwh", "description": "Much hat"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["uri"]
        .as_str()
        .unwrap()
        .starts_with("data:application/json;base64,"));
    assert_eq!(body["metadata"]["symbol"], "DWH");
    assert_eq!(body["metadata"]["version"], "0.1");
    assert!(body["metadata"]["image"].as_str().unwrap().contains("seed=DWH"));
}

#[tokio::test]
async fn test_metadata_pinned_to_ipfs() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pinning/pinJSONToIPFS")
                .header("authorization", "Bearer pinata-jwt")
                .body_contains(r#""symbol":"FROG""#);
            then.status(200)
                .json_body(json!({"IpfsHash": "QmFrog", "PinSize": 120, "Timestamp": "2024-01-01T00:00:00Z"}));
        })
        .await;

    let uploader = PinataUploader::new(&server.base_url(), "pinata-jwt", Duration::from_secs(5)).unwrap();
    let app = create_test_app_with_metadata(vec![], MetadataPublisher::new(Some(Arc::new(uploader))));
    let request = json_request(
        "POST",
        "/api/metadata",
        json!({"name": "Frog", "symbol": "FROG", "imageUrl": "https://example.com/frog.png"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["uri"], "ipfs://QmFrog");
    assert_eq!(body["metadata"]["image"], "https://example.com/frog.png");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_metadata_requires_name() {
    let app = create_test_app(vec![]);
    let request = json_request("POST", "/api/metadata", json!({"name": " ", "symbol": "X"}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Token name is required");
}

#[tokio::test]
async fn test_metadata_derives_blank_symbol() {
    let app = create_test_app(vec![]);
    let request = json_request("POST", "/api/metadata", json!({"name": "Doge Wif Hat", "symbol": ""}));

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["metadata"]["symbol"], "DWH");
    assert_eq!(body["metadata"]["name"], "Doge Wif Hat");
}

#[tokio::test]
async fn test_metadata_rejects_long_symbol() {
    let app = create_test_app(vec![]);
    let request = json_request(
        "POST",
        "/api/metadata",
        json!({"name": "Doge Wif Hat", "symbol": "ABCDEFGHIJKLMNOP"}),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({"error": "Symbol must be 10 characters or less"})
    );
}

#[tokio::test]
async fn test_cors_headers() {
    let app = create_test_app(vec![]);
    let request = Request::builder()
        .uri("/health/live")
        .header("origin", "https://app.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_invalid_endpoint() {
    let app = create_test_app(vec![]);

    let response = app.oneshot(get_request("/invalid/endpoint")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
