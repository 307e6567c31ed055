use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether the mutation tools (`insert_data`, `update_data`, `delete_data`)
/// are registered. The `query` tool is always available, so this gates the
/// tool set rather than inspecting ad hoc operations.
#[derive(Clone, Default, Debug, Deserialize, Serialize, PartialEq, Copy, JsonSchema, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MutationMode {
    /// Don't expose any mutation tools
    #[default]
    None,
    /// Expose the insert, update, and delete tools
    All,
}
