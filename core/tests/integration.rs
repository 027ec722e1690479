//! End-to-end tests against the live mock AIL server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the client over
//! real HTTP through the ureq transport: construction-time ping, item
//! import (compression and hash verified server-side), and the crawler
//! task/capture flow, plus the recoverable and fatal failure paths.

use ail_client::{AilClient, AilError, ApiResponse, Config, CrawlOptions};
use serde_json::json;
use uuid::Uuid;

/// Start the mock server on a random port and return its address.
fn start_mock() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn connect(addr: std::net::SocketAddr) -> AilClient {
    AilClient::connect(Config::new(format!("http://{addr}/"), mock_server::API_KEY)).unwrap()
}

#[test]
fn ingestion_lifecycle() {
    let addr = start_mock();
    let client = connect(addr);

    // Step 1: explicit ping after the construction-time one.
    let pong = client.ping().unwrap();
    assert_eq!(pong.as_json().unwrap()["status"], "pong");

    // Step 2: import an item; the mock decompresses the payload and checks
    // the hash, so a codec regression fails here.
    let result = client
        .feed_json_item(
            "user@example.com:hunter2",
            json!({"tags": ["infoleak:automatic-detection"]}),
            "integration-test",
            Uuid::new_v4(),
            "UTF-8",
        )
        .unwrap();
    let import = result.as_json().expect("import should return JSON");
    assert!(import["uuid"].is_string(), "envelope should be unwrapped");

    // Step 3: enqueue a crawl task.
    let result = client
        .crawl_url("http://example.onion/", &CrawlOptions::default())
        .unwrap();
    let task_uuid: Uuid = result.as_json().unwrap()["uuid"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    // Step 4: attach a capture to the task.
    let capture_uuid = Uuid::new_v4();
    let result = client
        .add_crawler_capture(
            task_uuid,
            capture_uuid,
            "http://example.onion/login",
            &CrawlOptions::default(),
        )
        .unwrap();
    assert_eq!(
        result.as_json().unwrap()["uuid"],
        json!(capture_uuid.to_string())
    );
}

#[test]
fn wrong_key_fails_construction() {
    let addr = start_mock();
    let err = AilClient::connect(Config::new(format!("http://{addr}/"), "wrong-key")).unwrap_err();
    assert!(matches!(err, AilError::Connection(_)), "got {err:?}");
}

#[test]
fn unreachable_instance_fails_construction() {
    // Nothing listens on the discard port.
    let err = AilClient::connect(Config::new("http://127.0.0.1:9/", "some-key")).unwrap_err();
    assert!(matches!(err, AilError::Connection(_)), "got {err:?}");
}

#[test]
fn rejected_input_comes_back_as_data() {
    let addr = start_mock();
    let client = connect(addr);

    // A capture for a task that was never submitted is a client fault, not
    // an error.
    let result = client
        .add_crawler_capture(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "http://example.onion/",
            &CrawlOptions::default(),
        )
        .unwrap();
    match result {
        ApiResponse::Errors { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body["reason"], "Unknown task_uuid");
        }
        other => panic!("expected Errors, got {other:?}"),
    }
}
