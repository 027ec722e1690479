//! Verify the response classifier against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each case describes a raw response (status, body, expects_json flag) and
//! the expected normalized outcome. Keeping the cases as data makes the
//! precedence table reviewable without reading Rust.

use ail_client::{classify, Outcome};

fn expected_outcome(expected: &serde_json::Value) -> Outcome {
    match expected["outcome"].as_str().unwrap() {
        "success" => Outcome::Success(expected["payload"].clone()),
        "text" => Outcome::Text(expected["text"].as_str().unwrap().to_string()),
        "client_error" => Outcome::ClientError {
            status: expected["status"].as_u64().unwrap() as u16,
            body: expected["body"].clone(),
        },
        "server_error" => Outcome::ServerError {
            status: expected["status"].as_u64().unwrap() as u16,
            text: expected["text"].as_str().unwrap().to_string(),
        },
        "empty" => Outcome::Empty,
        "unexpected" => Outcome::Unexpected(expected["text"].as_str().unwrap().to_string()),
        other => panic!("unknown expected outcome: {other}"),
    }
}

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = case["body"].as_str().unwrap();
        let expects_json = case["expects_json"].as_bool().unwrap();

        let outcome = classify(status, body, expects_json);
        assert_eq!(outcome, expected_outcome(&case["expected"]), "{name}");
    }
}
