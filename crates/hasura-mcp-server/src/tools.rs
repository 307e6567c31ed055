//! MCP tools exposing a Hasura GraphQL endpoint.
//!
//! Each tool owns its MCP [`Tool`](rmcp::model::Tool) declaration and an
//! `execute` method that always terminates in a [`CallToolResult`] text
//! payload; failures are rendered, never propagated.

mod delete_data;
mod describe_table;
mod insert_data;
mod list_tables;
mod mutation_mode;
mod query;
mod update_data;

pub use delete_data::{DELETE_DATA_TOOL_NAME, DeleteData};
pub use describe_table::{DESCRIBE_TABLE_TOOL_NAME, DescribeTable};
pub use insert_data::{INSERT_DATA_TOOL_NAME, InsertData};
pub use list_tables::{LIST_TABLES_TOOL_NAME, ListTables};
pub use mutation_mode::MutationMode;
pub use query::{QUERY_TOOL_NAME, Query};
pub use update_data::{UPDATE_DATA_TOOL_NAME, UpdateData};

#[cfg(test)]
use rmcp::model::CallToolResult;

/// Test helper: collapse a tool result to its text payload.
#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> String {
    use std::ops::Deref;
    result
        .content
        .iter()
        .filter_map(|content| match content.deref() {
            rmcp::model::RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect::<Vec<String>>()
        .join("\n")
}
