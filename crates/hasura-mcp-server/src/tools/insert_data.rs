use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RequestError;
use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to insert rows into a table
pub const INSERT_DATA_TOOL_NAME: &str = "insert_data";

#[derive(Clone)]
pub struct InsertData {
    pub tool: Tool,
}

/// Input for the insert_data tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// Name of the table to insert into
    table_name: String,

    /// The row to insert, or an array of rows, as a JSON string
    data: String,
}

impl InsertData {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                INSERT_DATA_TOOL_NAME,
                "Insert rows into a table. `data` is a JSON object for one row, or a JSON array for several. Use `describe_table` to learn the column names first.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Value, endpoint: &Endpoint) -> CallToolResult {
        let input = match serde_json::from_value::<Input>(input) {
            Ok(input) => input,
            Err(error) => {
                return graphql::render(Err(RequestError::Input(error)), "inserting data");
            }
        };
        let context = format!("inserting data into {}", input.table_name);
        let operation = match hasura::insert(&input.table_name, &input.data) {
            Ok(operation) => operation,
            Err(error) => return graphql::render(Err(error), &context),
        };
        graphql::render(endpoint.execute(operation).await, &context)
    }
}
