use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RequestError;
use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to delete rows from a table
pub const DELETE_DATA_TOOL_NAME: &str = "delete_data";

#[derive(Clone)]
pub struct DeleteData {
    pub tool: Tool,
}

/// Input for the delete_data tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// Name of the table to delete from
    table_name: String,

    /// The Hasura boolean expression selecting rows, as a JSON string, e.g. {"id": {"_eq": 1}}
    where_clause: String,
}

impl DeleteData {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                DELETE_DATA_TOOL_NAME,
                "Delete rows from a table. `where_clause` selects the rows with a Hasura boolean expression. There is no undo.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Value, endpoint: &Endpoint) -> CallToolResult {
        let input = match serde_json::from_value::<Input>(input) {
            Ok(input) => input,
            Err(error) => {
                return graphql::render(Err(RequestError::Input(error)), "deleting data");
            }
        };
        let context = format!("deleting data from {}", input.table_name);
        let operation = match hasura::delete(&input.table_name, &input.where_clause) {
            Ok(operation) => operation,
            Err(error) => return graphql::render(Err(error), &context),
        };
        graphql::render(endpoint.execute(operation).await, &context)
    }
}
