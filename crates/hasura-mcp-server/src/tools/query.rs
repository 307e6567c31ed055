use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RequestError;
use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to execute an ad hoc GraphQL operation
pub const QUERY_TOOL_NAME: &str = "query";

#[derive(Clone)]
pub struct Query {
    pub tool: Tool,
}

/// Input for the query tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// The GraphQL query or mutation document
    query: String,

    /// The variable values, as a JSON string
    #[serde(default)]
    variables: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                QUERY_TOOL_NAME,
                "Execute a GraphQL operation against the Hasura endpoint. Use the `list_tables` and `describe_table` tools to learn the schema first - do not guess field names.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Value, endpoint: &Endpoint) -> CallToolResult {
        const CONTEXT: &str = "executing GraphQL query";
        let input = match serde_json::from_value::<Input>(input) {
            Ok(input) => input,
            Err(error) => return graphql::render(Err(RequestError::Input(error)), CONTEXT),
        };
        let operation = match hasura::raw(&input.query, input.variables.as_deref()) {
            Ok(operation) => operation,
            Err(error) => return graphql::render(Err(error), CONTEXT),
        };
        graphql::render(endpoint.execute(operation).await, CONTEXT)
    }
}
