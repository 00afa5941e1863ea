pub mod query;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GraphQL request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GraphQL endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("response is missing the `data` field")]
    MissingData,

    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),
}

/// Transport seam for the GraphQL API. One implementation talks to GitHub;
/// tests swap in a replay transport with canned pages.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// POST a query document and return the parsed response body. Any
    /// non-success status or GraphQL-level error is fatal; there are no
    /// retries, re-running the tool is the recovery mechanism.
    async fn execute(&self, query: &str) -> Result<Value, GithubError>;
}

pub struct GithubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            token,
        }
    }
}

#[async_trait]
impl GraphqlTransport for GithubClient {
    async fn execute(&self, query: &str) -> Result<Value, GithubError> {
        debug!(bytes = query.len(), "posting GraphQL query");
        let response = self
            .http
            .post(&self.endpoint)
            .header("User-Agent", "keep-contributions")
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        if let Some(errors) = value.get("errors").and_then(Value::as_array) {
            let message = errors
                .first()
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("unknown GraphQL error");
            return Err(GithubError::Graphql(message.to_string()));
        }
        Ok(value)
    }
}

/// Pull the typed payload out of a response envelope. A missing key anywhere
/// is fatal: the tool trusts schema stability and surfaces drift instead of
/// guessing.
pub fn response_data<T: DeserializeOwned>(mut value: Value) -> Result<T, GithubError> {
    let data = value
        .get_mut("data")
        .map(Value::take)
        .ok_or(GithubError::MissingData)?;
    Ok(serde_json::from_value(data)?)
}

/// Replay transport for tests: hands out canned responses in order and
/// records every query document it was sent.
#[cfg(test)]
pub mod testing {
    use super::{GithubError, GraphqlTransport};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    pub struct ReplayTransport {
        responses: Mutex<Vec<Value>>,
        pub queries: Mutex<Vec<String>>,
    }

    impl ReplayTransport {
        pub fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn sent_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphqlTransport for ReplayTransport {
        async fn execute(&self, query: &str) -> Result<Value, GithubError> {
            self.queries.lock().unwrap().push(query.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(GithubError::Graphql(
                    "replay transport ran out of responses".to_string(),
                ));
            }
            Ok(responses.remove(0))
        }
    }

    /// Transport that always fails with the given HTTP status.
    pub struct FailingTransport(pub u16);

    #[async_trait]
    impl GraphqlTransport for FailingTransport {
        async fn execute(&self, _query: &str) -> Result<Value, GithubError> {
            Err(GithubError::Status {
                status: self.0,
                body: "boom".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(serde::Deserialize)]
    struct Payload {
        answer: u32,
    }

    #[test]
    fn test_response_data_extracts_payload() {
        let payload: Payload = response_data(json!({"data": {"answer": 42}})).unwrap();
        assert_eq!(payload.answer, 42);
    }

    #[test]
    fn test_response_without_data_is_fatal() {
        let result: Result<Payload, _> = response_data(json!({"errors": []}));
        assert!(matches!(result, Err(GithubError::MissingData)));
    }

    #[test]
    fn test_response_with_wrong_shape_is_fatal() {
        let result: Result<Payload, _> = response_data(json!({"data": {"other": 1}}));
        assert!(matches!(result, Err(GithubError::Shape(_))));
    }

    #[tokio::test]
    async fn test_replay_transport_records_queries() {
        let transport = testing::ReplayTransport::new(vec![json!({"data": {}})]);
        let value = transport.execute("{ viewer { login } }").await.unwrap();
        assert_eq!(value, json!({"data": {}}));
        assert_eq!(transport.sent_queries(), vec!["{ viewer { login } }"]);
        assert!(transport.execute("{}").await.is_err());
    }
}
