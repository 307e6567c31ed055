use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RequestError;
use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to introspect a single table's structure
pub const DESCRIBE_TABLE_TOOL_NAME: &str = "describe_table";

#[derive(Clone)]
pub struct DescribeTable {
    pub tool: Tool,
}

/// Input for the describe_table tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// Name of the table to describe
    table_name: String,
}

impl DescribeTable {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                DESCRIBE_TABLE_TOOL_NAME,
                "Get the schema of a specific table: column names, types, and nullability.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Value, endpoint: &Endpoint) -> CallToolResult {
        let input = match serde_json::from_value::<Input>(input) {
            Ok(input) => input,
            Err(error) => {
                return graphql::render(Err(RequestError::Input(error)), "describing table");
            }
        };
        let context = format!("describing table {}", input.table_name);
        let operation = match hasura::describe_table(&input.table_name) {
            Ok(operation) => operation,
            Err(error) => return graphql::render(Err(error), &context),
        };
        graphql::render(endpoint.execute(operation).await, &context)
    }
}
