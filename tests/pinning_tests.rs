// tests/pinning_tests.rs
mod common;
mod support;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use license_document_vault::config::PinningConfig;
use license_document_vault::error::PinningError;
use license_document_vault::pinning::{ContentId, PinStore, PinataClient, TagValue};
use serde_json::json;
use support::serve;

const BLOB: &[u8] = b"\x01\x02ciphertext-bytes\xff";

fn config(upload_endpoint: String, gateways: Vec<String>) -> PinningConfig {
    PinningConfig {
        upload_endpoint,
        jwt: "test-jwt".into(),
        gateways,
        upload_timeout_secs: 5,
        gateway_timeout_secs: 1,
    }
}

async fn failing_gateway(status: StatusCode) -> String {
    let router = Router::new().route("/ipfs/{cid}", get(move || async move { status }));
    format!("{}/ipfs", serve(router).await)
}

async fn good_gateway() -> String {
    let router = Router::new().route(
        "/ipfs/{cid}",
        get(|Path(cid): Path<String>| async move {
            if cid == "bafygood" {
                (StatusCode::OK, BLOB.to_vec())
            } else {
                (StatusCode::NOT_FOUND, Vec::new())
            }
        }),
    );
    format!("{}/ipfs/", serve(router).await)
}

#[tokio::test]
async fn retrieve_falls_through_to_first_working_gateway() {
    common::setup();
    let gateways = vec![
        failing_gateway(StatusCode::INTERNAL_SERVER_ERROR).await,
        failing_gateway(StatusCode::TOO_MANY_REQUESTS).await,
        good_gateway().await,
    ];
    let client = PinataClient::new(&config("http://127.0.0.1:9/unused".into(), gateways));

    let bytes = client.retrieve(&ContentId::new("bafygood")).await.unwrap();
    assert_eq!(bytes, BLOB);
}

#[tokio::test]
async fn retrieve_reports_every_gateway_when_all_fail() {
    let gateways = vec![
        failing_gateway(StatusCode::BAD_GATEWAY).await,
        failing_gateway(StatusCode::NOT_FOUND).await,
        good_gateway().await, // does not know this cid
    ];
    let client = PinataClient::new(&config("http://127.0.0.1:9/unused".into(), gateways));

    let err = client
        .retrieve(&ContentId::new("bafymissing"))
        .await
        .unwrap_err();

    let PinningError::Retrieval { cid, attempted } = err else {
        panic!("expected retrieval error, got {err:?}");
    };
    assert_eq!(cid, "bafymissing");
    assert_eq!(attempted.len(), 3);
    assert!(attempted[0].contains("502"));
    assert!(attempted[1].contains("404"));
}

#[tokio::test]
async fn slow_gateway_times_out_and_next_one_answers() {
    let slow = Router::new().route(
        "/ipfs/{cid}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            (StatusCode::OK, b"too late".to_vec())
        }),
    );
    let gateways = vec![
        format!("{}/ipfs", serve(slow).await),
        good_gateway().await,
    ];
    let client = PinataClient::new(&config("http://127.0.0.1:9/unused".into(), gateways));

    let started = Instant::now();
    let bytes = client.retrieve(&ContentId::new("bafygood")).await.unwrap();

    assert_eq!(bytes, BLOB);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn gateway_urls_are_normalized() {
    let client = PinataClient::new(&config(
        "http://pin".into(),
        vec!["https://a.example/ipfs/".into(), "https://b.example/ipfs".into()],
    ));
    assert_eq!(
        client.gateways(),
        ["https://a.example/ipfs", "https://b.example/ipfs"]
    );
}

type Captured = Arc<Mutex<Option<(HeaderMap, Vec<u8>)>>>;

#[tokio::test]
async fn store_sends_bearer_token_and_metadata() {
    let captured: Captured = Arc::default();
    let router = Router::new()
        .route(
            "/pinning/pinFileToIPFS",
            post(
                |State(captured): State<Captured>, headers: HeaderMap, body: Bytes| async move {
                    *captured.lock().unwrap() = Some((headers, body.to_vec()));
                    Json(json!({
                        "IpfsHash": "bafyuploaded",
                        "PinSize": 42,
                        "Timestamp": "2025-01-01T00:00:00Z"
                    }))
                },
            ),
        )
        .with_state(captured.clone());
    let endpoint = format!("{}/pinning/pinFileToIPFS", serve(router).await);
    let client = PinataClient::new(&config(endpoint, vec![]));

    let mut tags = BTreeMap::new();
    tags.insert("applicationId".to_string(), TagValue::from("APP-7"));
    tags.insert("encrypted".to_string(), TagValue::from(true));

    let cid = client
        .store(BLOB.to_vec(), "licence.pdf", &tags)
        .await
        .unwrap();
    assert_eq!(cid, ContentId::new("bafyuploaded"));

    let (headers, body) = captured.lock().unwrap().take().expect("request seen");
    assert_eq!(headers["authorization"], "Bearer test-jwt");
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"licence.pdf\""));
    assert!(body.contains("name=\"pinataMetadata\""));
    assert!(body.contains(r#""keyvalues":{"applicationId":"APP-7","encrypted":true}"#));
    assert!(body.contains("ciphertext-bytes"));
}

#[tokio::test]
async fn store_surfaces_provider_error_message() {
    let router = Router::new().route(
        "/pin",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "reason": "INVALID_CREDENTIALS", "details": "Invalid API key" } })),
            )
        }),
    );
    let endpoint = format!("{}/pin", serve(router).await);
    let client = PinataClient::new(&config(endpoint, vec![]));

    let err = client
        .store(BLOB.to_vec(), "a.pdf", &BTreeMap::new())
        .await
        .unwrap_err();

    let PinningError::Upload(message) = err else {
        panic!("expected upload error, got {err:?}");
    };
    assert!(message.contains("401"));
    assert!(message.contains("Invalid API key"));
}

#[tokio::test]
async fn store_rejects_response_without_cid() {
    let router = Router::new().route("/pin", post(|| async { Json(json!({ "PinSize": 1 })) }));
    let endpoint = format!("{}/pin", serve(router).await);
    let client = PinataClient::new(&config(endpoint, vec![]));

    let err = client
        .store(BLOB.to_vec(), "a.pdf", &BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PinningError::InvalidResponse(_)));
}

#[tokio::test]
async fn store_reports_unreachable_provider() {
    let client = PinataClient::new(&config("http://127.0.0.1:9/pin".into(), vec![]));
    let err = client
        .store(BLOB.to_vec(), "a.pdf", &BTreeMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PinningError::Upload(_)));
}

#[test]
fn tag_values_serialize_as_plain_json() {
    let mut tags = BTreeMap::new();
    tags.insert("a".to_string(), TagValue::from("text"));
    tags.insert("b".to_string(), TagValue::from(3u64));
    tags.insert("c".to_string(), TagValue::from(false));

    let value = serde_json::to_value(&tags).unwrap();
    assert_eq!(value, json!({ "a": "text", "b": 3, "c": false }));
    assert_eq!(
        serde_json::to_string(&tags).unwrap(),
        r#"{"a":"text","b":3,"c":false}"#
    );
}

#[test]
fn integer_tags_keep_full_precision() {
    // 2^53 + 1 is the first integer an f64 cannot hold
    let big = 9_007_199_254_740_993u64;
    let json = serde_json::to_string(&TagValue::from(big)).unwrap();
    assert_eq!(json, "9007199254740993");
    assert_eq!(
        serde_json::from_str::<TagValue>(&json).unwrap(),
        TagValue::from(big)
    );

    assert_eq!(serde_json::to_string(&TagValue::from(-14i64)).unwrap(), "-14");
    assert_eq!(serde_json::to_string(&TagValue::from(2.5f64)).unwrap(), "2.5");
}

#[test]
fn non_finite_float_tags_fall_back_to_text() {
    assert_eq!(TagValue::from(f64::NAN), TagValue::from("NaN"));
    assert_eq!(TagValue::from(f64::INFINITY), TagValue::from("inf"));
}
