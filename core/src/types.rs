//! Caller-facing result type and crawl task options.
//!
//! # Design
//! `ApiResponse` mirrors the recoverable half of the response classifier:
//! client errors and empty bodies are data the caller can branch on, while
//! fatal conditions are [`AilError`](crate::error::AilError) variants.
//!
//! The crawl option enums serialize to the scalar tags the service expects
//! (`force_tor`, `daily`, ...); `Frequency::Custom` serializes as a mapping.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Normalized result of a successful call to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Parsed JSON success payload, `response` envelope already unwrapped.
    Json(Value),
    /// Raw non-JSON body from a call that does not require JSON.
    Text(String),
    /// The service rejected the input: 4xx with a structured error body.
    Errors { status: u16, body: Value },
    /// The service returned a 2xx with no body.
    Empty,
}

impl ApiResponse {
    /// The success payload, if this is a JSON result.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_errors(&self) -> bool {
        matches!(self, ApiResponse::Errors { .. })
    }
}

/// Proxy selection for a crawl task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlProxy {
    Web,
    Onion,
    Tor,
    ForceTor,
}

/// Custom crawl schedule. All fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CustomSchedule {
    pub minutes: u32,
    pub hours: u32,
    pub days: u32,
    pub weeks: u32,
    pub months: u32,
}

/// Recurrence of a crawl task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Custom(CustomSchedule),
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Frequency::Monthly => serializer.serialize_str("monthly"),
            Frequency::Weekly => serializer.serialize_str("weekly"),
            Frequency::Daily => serializer.serialize_str("daily"),
            Frequency::Hourly => serializer.serialize_str("hourly"),
            Frequency::Custom(schedule) => schedule.serialize(serializer),
        }
    }
}

/// Options for `crawl_url` and `add_crawler_capture`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Record an HTTP Archive of the capture.
    pub har: bool,
    /// Take a screenshot of the rendered page.
    pub screenshot: bool,
    pub depth_limit: u32,
    /// Name of a cookiejar already registered on the instance.
    pub cookiejar: Option<String>,
    pub proxy: Option<CrawlProxy>,
    pub frequency: Option<Frequency>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            har: false,
            screenshot: false,
            depth_limit: 1,
            cookiejar: None,
            proxy: Some(CrawlProxy::ForceTor),
            frequency: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn crawl_proxy_serializes_to_scalar_tag() {
        assert_eq!(serde_json::to_value(CrawlProxy::ForceTor).unwrap(), json!("force_tor"));
        assert_eq!(serde_json::to_value(CrawlProxy::Web).unwrap(), json!("web"));
    }

    #[test]
    fn named_frequency_serializes_to_scalar_tag() {
        assert_eq!(serde_json::to_value(Frequency::Daily).unwrap(), json!("daily"));
        assert_eq!(serde_json::to_value(Frequency::Monthly).unwrap(), json!("monthly"));
    }

    #[test]
    fn custom_frequency_serializes_to_mapping() {
        let frequency = Frequency::Custom(CustomSchedule {
            hours: 6,
            ..CustomSchedule::default()
        });
        assert_eq!(
            serde_json::to_value(frequency).unwrap(),
            json!({"minutes": 0, "hours": 6, "days": 0, "weeks": 0, "months": 0})
        );
    }

    #[test]
    fn crawl_options_defaults_match_the_service() {
        let options = CrawlOptions::default();
        assert!(!options.har);
        assert!(!options.screenshot);
        assert_eq!(options.depth_limit, 1);
        assert_eq!(options.proxy, Some(CrawlProxy::ForceTor));
        assert!(options.frequency.is_none());
    }
}
