use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RequestError;
use crate::graphql::{self, Endpoint};
use crate::hasura;
use crate::schema_from_type;

/// The name of the tool to update rows in a table
pub const UPDATE_DATA_TOOL_NAME: &str = "update_data";

#[derive(Clone)]
pub struct UpdateData {
    pub tool: Tool,
}

/// Input for the update_data tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// Name of the table to update
    table_name: String,

    /// The Hasura boolean expression selecting rows, as a JSON string, e.g. {"id": {"_eq": 1}}
    where_clause: String,

    /// The column values to set, as a JSON string
    set_data: String,
}

impl UpdateData {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                UPDATE_DATA_TOOL_NAME,
                "Update rows in a table. `where_clause` selects the rows with a Hasura boolean expression; `set_data` holds the new column values.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Value, endpoint: &Endpoint) -> CallToolResult {
        let input = match serde_json::from_value::<Input>(input) {
            Ok(input) => input,
            Err(error) => {
                return graphql::render(Err(RequestError::Input(error)), "updating data");
            }
        };
        let context = format!("updating data in {}", input.table_name);
        let operation = match hasura::update(&input.table_name, &input.where_clause, &input.set_data)
        {
            Ok(operation) => operation,
            Err(error) => return graphql::render(Err(error), &context),
        };
        graphql::render(endpoint.execute(operation).await, &context)
    }
}
