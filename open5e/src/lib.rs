//! Minimal Open5e rules API client.
//!
//! This crate provides a focused client for the Open5e REST API with:
//! - Search endpoints for spells, conditions, and weapons
//! - Loosely-typed records that tolerate schema drift between documents
//! - Distinct errors for network, API, and decode failures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const API_BASE: &str = "https://api.open5e.com";

/// Errors that can occur when querying the rules API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Open5e API client.
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client against the public Open5e API.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: API_BASE.to_string(),
        }
    }

    /// Override the base URL (primarily for tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search spells by free-text query.
    pub async fn search_spells(&self, query: &str) -> Result<Vec<Record>, Error> {
        self.search("spells", query).await
    }

    /// Search conditions by free-text query.
    pub async fn search_conditions(&self, query: &str) -> Result<Vec<Record>, Error> {
        self.search("conditions", query).await
    }

    /// Search weapons by free-text query.
    pub async fn search_weapons(&self, query: &str) -> Result<Vec<Record>, Error> {
        self.search("weapons", query).await
    }

    async fn search(&self, endpoint: &str, query: &str) -> Result<Vec<Record>, Error> {
        let url = format!("{}/{}/", self.base_url, endpoint);

        let response = self
            .client
            .get(url)
            .query(&[("search", query)])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let envelope: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(envelope.results)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Paginated search envelope returned by every Open5e list endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Record>,
}

/// A single rules record returned by the API.
///
/// Open5e payloads vary across source documents, so a record keeps the raw
/// JSON object and exposes typed accessors for the fields callers read.
/// Missing and null fields read as absent rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a raw JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's display name, if present.
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// A string field. Null and non-string values read as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// A boolean field. Missing, null, and non-boolean values read as false.
    pub fn flag(&self, field: &str) -> bool {
        self.0
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// An integer field. Null and non-integer values read as absent.
    pub fn int(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    /// A list-of-strings field. Missing or malformed entries are skipped.
    pub fn text_list(&self, field: &str) -> Vec<&str> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Raw access to the underlying object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_accessors() {
        let r = record(json!({
            "name": "Fireball",
            "level": 3,
            "concentration": false,
            "ritual": null,
            "damage_types": ["fire", null, "force"],
        }));

        assert_eq!(r.name(), Some("Fireball"));
        assert_eq!(r.int("level"), Some(3));
        assert!(!r.flag("concentration"));
        assert!(!r.flag("ritual"));
        assert!(!r.flag("missing"));
        assert_eq!(r.text_list("damage_types"), vec!["fire", "force"]);
        assert_eq!(r.text("level"), None);
    }

    #[tokio::test]
    async fn test_search_spells() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/spells/")
                .query_param("search", "fireball");
            then.status(200).json_body(json!({
                "count": 1,
                "results": [{"name": "Fireball", "level": 3}],
            }));
        });

        let client = Client::new().with_base_url(server.base_url());
        let results = client.search_spells("fireball").await.unwrap();

        mock.assert();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), Some("Fireball"));
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conditions/");
            then.status(200).json_body(json!({"count": 0, "results": []}));
        });

        let client = Client::new().with_base_url(server.base_url());
        let results = client.search_conditions("no such thing").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/weapons/");
            then.status(503).body("upstream unavailable");
        });

        let client = Client::new().with_base_url(server.base_url());
        let err = client.search_weapons("longsword").await.unwrap_err();

        match err {
            Error::Api { status, .. } => assert_eq!(status, 503),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/spells/");
            then.status(200).body("not json");
        });

        let client = Client::new().with_base_url(server.base_url());
        let err = client.search_spells("fireball").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
