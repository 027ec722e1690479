//! Response classification: raw HTTP response to a normalized outcome.
//!
//! # Design
//! [`classify`] is a pure function from `(status, body, expects_json)` to an
//! [`Outcome`], so the precedence rules are testable without a client or a
//! transport. The precedence is fixed:
//!
//! 1. status >= 500 → [`Outcome::ServerError`]
//! 2. 400..500 with a JSON body → [`Outcome::ClientError`]; with a non-JSON
//!    body (an HTML error page, a reverse-proxy banner) → the deployment is
//!    broken, [`Outcome::ServerError`]
//! 3. status < 400 → parse as JSON, unwrapping a non-null `response`
//!    envelope key; on parse failure `expects_json` selects between
//!    [`Outcome::Unexpected`], [`Outcome::Empty`] and [`Outcome::Text`]
//!
//! The `expects_json` flag only changes the failure branch of case 3, never
//! cases 1–2.

use serde_json::Value;

/// Normalized outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx/3xx with a JSON body, `response` envelope already unwrapped.
    Success(Value),
    /// 2xx/3xx with a non-empty non-JSON body, for calls that accept text.
    Text(String),
    /// 4xx with a structured JSON error body. Recoverable: surfaced to the
    /// caller as data, never raised.
    ClientError { status: u16, body: Value },
    /// 5xx, or a 4xx whose body is not JSON. Fatal for the call.
    ServerError { status: u16, text: String },
    /// 2xx/3xx with an empty body on a call that does not require JSON.
    Empty,
    /// Unparseable body on a call that declared it expects JSON.
    Unexpected(String),
}

/// Classify a raw response. Pure; performs no I/O and no logging.
pub fn classify(status: u16, body: &str, expects_json: bool) -> Outcome {
    if status >= 500 {
        return Outcome::ServerError {
            status,
            text: body.to_string(),
        };
    }

    if (400..500).contains(&status) {
        // The server normally returns a JSON message with the error details.
        return match serde_json::from_str::<Value>(body) {
            Ok(error_body) => Outcome::ClientError {
                status,
                body: error_body,
            },
            Err(_) => Outcome::ServerError {
                status,
                text: body.to_string(),
            },
        };
    }

    match serde_json::from_str::<Value>(body) {
        Ok(mut value) => {
            // The envelope is transport convention, not domain data.
            if let Some(inner) = value.get_mut("response").filter(|v| !v.is_null()) {
                return Outcome::Success(inner.take());
            }
            Outcome::Success(value)
        }
        Err(_) if expects_json => Outcome::Unexpected(body.to_string()),
        Err(_) if body.is_empty() => Outcome::Empty,
        Err(_) => Outcome::Text(body.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_500_is_a_server_error_with_raw_text() {
        let outcome = classify(500, "Internal Server Error", false);
        assert_eq!(
            outcome,
            Outcome::ServerError {
                status: 500,
                text: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn status_500_with_json_body_is_still_a_server_error() {
        // Server-error detection runs before any body inspection.
        let outcome = classify(503, r#"{"message":"maintenance"}"#, true);
        assert!(matches!(outcome, Outcome::ServerError { status: 503, .. }));
    }

    #[test]
    fn status_404_with_json_body_is_a_client_error() {
        let outcome = classify(404, r#"{"message":"not found"}"#, true);
        assert_eq!(
            outcome,
            Outcome::ClientError {
                status: 404,
                body: json!({"message": "not found"})
            }
        );
    }

    #[test]
    fn status_404_with_html_body_is_a_server_error() {
        let outcome = classify(404, "<html><body>Not Found</body></html>", false);
        assert!(matches!(outcome, Outcome::ServerError { status: 404, .. }));
    }

    #[test]
    fn envelope_is_unwrapped() {
        let outcome = classify(200, r#"{"response": {"uuid": "abc"}}"#, true);
        assert_eq!(outcome, Outcome::Success(json!({"uuid": "abc"})));
    }

    #[test]
    fn body_without_envelope_is_returned_as_is() {
        let outcome = classify(200, r#"{"uuid": "abc"}"#, true);
        assert_eq!(outcome, Outcome::Success(json!({"uuid": "abc"})));
    }

    #[test]
    fn null_envelope_value_is_not_unwrapped() {
        let outcome = classify(200, r#"{"response": null, "uuid": "abc"}"#, true);
        assert_eq!(
            outcome,
            Outcome::Success(json!({"response": null, "uuid": "abc"}))
        );
    }

    #[test]
    fn json_array_body_is_a_success() {
        let outcome = classify(200, r#"[1, 2, 3]"#, true);
        assert_eq!(outcome, Outcome::Success(json!([1, 2, 3])));
    }

    #[test]
    fn empty_body_without_expects_json_is_empty() {
        assert_eq!(classify(200, "", false), Outcome::Empty);
    }

    #[test]
    fn empty_body_with_expects_json_is_unexpected() {
        // expects_json wins over the empty-body check.
        assert_eq!(classify(200, "", true), Outcome::Unexpected(String::new()));
    }

    #[test]
    fn text_body_without_expects_json_is_returned_unchanged() {
        let outcome = classify(200, "plain text report", false);
        assert_eq!(outcome, Outcome::Text("plain text report".to_string()));
    }

    #[test]
    fn text_body_with_expects_json_is_unexpected() {
        let outcome = classify(200, "plain text report", true);
        assert_eq!(outcome, Outcome::Unexpected("plain text report".to_string()));
    }
}
