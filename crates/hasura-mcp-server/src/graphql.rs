//! Execute GraphQL operations from an MCP tool

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::RequestError;
use crate::hasura::Operation;

/// The configured GraphQL endpoint together with the default headers sent on
/// every request. Built once at startup and cloned into each handler; there is
/// no ambient global configuration.
#[derive(Clone)]
pub struct Endpoint {
    url: Url,
    headers: HeaderMap,
}

impl Endpoint {
    pub fn new(url: Url, headers: HeaderMap) -> Self {
        let headers = {
            let mut headers = headers.clone();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers
        };
        Self { url, headers }
    }

    /// Send one operation as a single HTTP POST and decode the response
    /// envelope. No retries. The `variables` key is omitted from the request
    /// body when the operation has none.
    pub async fn execute(&self, operation: Operation) -> Result<Value, RequestError> {
        debug!(document = %operation.document, "Executing GraphQL operation");
        let mut request_body = serde_json::json!({ "query": operation.document });
        if let (Some(variables), Some(body)) = (operation.variables, request_body.as_object_mut()) {
            body.insert("variables".to_string(), variables);
        }

        let response = reqwest::Client::new()
            .post(self.url.clone())
            .headers(self.headers.clone())
            .body(request_body.to_string())
            .send()
            .await
            .map_err(RequestError::Send)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }

        response.json::<Value>().await.map_err(RequestError::Decode)
    }
}

/// Render the outcome of a tool invocation as a single text result.
///
/// Success is exactly the pretty-printed response envelope, including any
/// GraphQL `errors` the endpoint reported inside a 2xx response. Failure is
/// one diagnostic line naming the operation that failed. Every invocation
/// terminates in a text result; the caller has no structured error channel.
pub fn render(outcome: Result<Value, RequestError>, context: &str) -> CallToolResult {
    match outcome {
        Ok(envelope) => {
            let is_error = envelope
                .get("errors")
                .filter(|value| !matches!(value, Value::Null))
                .is_some()
                && envelope
                    .get("data")
                    .filter(|value| !matches!(value, Value::Null))
                    .is_none();
            let text = serde_json::to_string_pretty(&envelope)
                .unwrap_or_else(|_| envelope.to_string());
            CallToolResult {
                content: vec![Content::text(text)],
                is_error: Some(is_error),
            }
        }
        Err(error) => CallToolResult {
            content: vec![Content::text(format!("Error {context}: {error}"))],
            is_error: Some(true),
        },
    }
}
