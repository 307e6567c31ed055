use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to list the tables tracked by Hasura
pub const LIST_TABLES_TOOL_NAME: &str = "list_tables";

#[derive(Clone)]
pub struct ListTables {
    pub tool: Tool,
}

/// Input for the list_tables tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {}

impl ListTables {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                LIST_TABLES_TOOL_NAME,
                "List all tables available in the Hasura schema. Each tracked table appears as a root query field.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, _input: Value, endpoint: &Endpoint) -> CallToolResult {
        graphql::render(
            endpoint.execute(hasura::list_tables()).await,
            "listing tables",
        )
    }
}
