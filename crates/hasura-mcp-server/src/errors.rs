use reqwest::StatusCode;
use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use tokio::task::JoinError;

/// A failure within a single tool invocation.
///
/// Each variant renders with a distinct prefix so callers can classify
/// failures by text pattern even though the tool return channel is a single
/// string. GraphQL-level errors are not represented here; the endpoint reports
/// those inside a successful response body and they pass through untouched.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid input: {0}")]
    Input(serde_json::Error),

    #[error("Invalid JSON in `{name}`: {source}")]
    InvalidJson {
        name: &'static str,
        source: serde_json::Error,
    },

    #[error("Invalid table name {name:?}: expected a plain identifier")]
    InvalidTableName { name: String },

    #[error("Failed to send GraphQL request: {0}")]
    Send(reqwest::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode GraphQL response body: {0}")]
    Decode(reqwest::Error),
}

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("invalid header: {0}")]
    Header(String),

    #[error("could not bind to the transport address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Failed to start server")]
    StartupError(#[from] JoinError),

    #[error("failed to initialize the server: {0}")]
    Initialize(#[from] rmcp::service::ServerInitializeError<std::io::Error>),
}

/// An MCP tool error
pub type McpError = rmcp::model::ErrorData;
