//! The MCP server exposing the Hasura tool set

use std::net::{IpAddr, SocketAddr};

use bon::bon;
use reqwest::header::HeaderMap;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorCode, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::transport::sse_server::SseServerConfig;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{SseServer, StreamableHttpServerConfig, StreamableHttpService};
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use url::Url;

use crate::errors::{McpError, ServerError};
use crate::graphql::Endpoint;
use crate::tools::{
    DELETE_DATA_TOOL_NAME, DESCRIBE_TABLE_TOOL_NAME, DeleteData, DescribeTable,
    INSERT_DATA_TOOL_NAME, InsertData, LIST_TABLES_TOOL_NAME, ListTables, MutationMode,
    QUERY_TOOL_NAME, Query, UPDATE_DATA_TOOL_NAME, UpdateData,
};

/// A Hasura MCP Server
pub struct Server {
    transport: Transport,
    endpoint: Url,
    headers: HeaderMap,
    mutation_mode: MutationMode,
}

#[derive(Clone)]
pub enum Transport {
    Stdio,
    SSE { address: IpAddr, port: u16 },
    StreamableHttp { address: IpAddr, port: u16 },
}

#[bon]
impl Server {
    #[builder]
    pub fn new(
        transport: Transport,
        endpoint: Url,
        headers: HeaderMap,
        mutation_mode: MutationMode,
    ) -> Self {
        Self {
            transport,
            endpoint,
            headers,
            mutation_mode,
        }
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let running = Running::new(
            Endpoint::new(self.endpoint, self.headers),
            self.mutation_mode,
        );

        match self.transport {
            Transport::StreamableHttp { address, port } => {
                info!(port = ?port, address = ?address, "Starting MCP server in Streamable HTTP mode");
                let listen_address = SocketAddr::new(address, port);
                let service = StreamableHttpService::new(
                    move || Ok(running.clone()),
                    LocalSessionManager::default().into(),
                    StreamableHttpServerConfig {
                        sse_keep_alive: None,
                        stateful_mode: true,
                    },
                );
                let router = axum::Router::new().nest_service("/mcp", service);
                let tcp_listener = tokio::net::TcpListener::bind(listen_address).await?;
                axum::serve(tcp_listener, router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
            Transport::SSE { address, port } => {
                info!(port = ?port, address = ?address, "Starting MCP server in SSE mode");
                let listen_address = SocketAddr::new(address, port);
                let cancellation_token = CancellationToken::new();
                SseServer::serve_with_config(SseServerConfig {
                    bind: listen_address,
                    sse_path: "/sse".to_string(),
                    post_path: "/message".to_string(),
                    ct: cancellation_token.clone(),
                    sse_keep_alive: None,
                })
                .await?
                .with_service(move || running.clone());
                shutdown_signal().await;
                cancellation_token.cancel();
            }
            Transport::Stdio => {
                info!("Starting MCP server in stdio mode");
                let service = running.serve(stdio()).await.inspect_err(|e| {
                    error!("serving error: {:?}", e);
                })?;
                service.waiting().await.map_err(ServerError::StartupError)?;
            }
        }

        Ok(())
    }
}

/// The running tool set. Handlers are stateless; everything here is read-only
/// after construction and cloned per session.
#[derive(Clone)]
struct Running {
    endpoint: Endpoint,
    query_tool: Query,
    list_tables_tool: ListTables,
    describe_table_tool: DescribeTable,
    mutation_tools: Option<MutationTools>,
}

#[derive(Clone)]
struct MutationTools {
    insert: InsertData,
    update: UpdateData,
    delete: DeleteData,
}

impl Running {
    fn new(endpoint: Endpoint, mutation_mode: MutationMode) -> Self {
        Self {
            endpoint,
            query_tool: Query::new(),
            list_tables_tool: ListTables::new(),
            describe_table_tool: DescribeTable::new(),
            mutation_tools: matches!(mutation_mode, MutationMode::All).then(|| MutationTools {
                insert: InsertData::new(),
                update: UpdateData::new(),
                delete: DeleteData::new(),
            }),
        }
    }

    fn tools(&self) -> Vec<Tool> {
        let mut tools = vec![
            self.query_tool.tool.clone(),
            self.list_tables_tool.tool.clone(),
            self.describe_table_tool.tool.clone(),
        ];
        if let Some(mutation_tools) = &self.mutation_tools {
            tools.extend([
                mutation_tools.insert.tool.clone(),
                mutation_tools.update.tool.clone(),
                mutation_tools.delete.tool.clone(),
            ]);
        }
        tools
    }
}

impl ServerHandler for Running {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let input = Value::from(request.arguments.clone());
        match request.name.as_ref() {
            QUERY_TOOL_NAME => Ok(self.query_tool.execute(input, &self.endpoint).await),
            LIST_TABLES_TOOL_NAME => Ok(self.list_tables_tool.execute(input, &self.endpoint).await),
            DESCRIBE_TABLE_TOOL_NAME => Ok(self
                .describe_table_tool
                .execute(input, &self.endpoint)
                .await),
            INSERT_DATA_TOOL_NAME => Ok(self
                .mutation_tools
                .as_ref()
                .ok_or(tool_not_found(&request.name))?
                .insert
                .execute(input, &self.endpoint)
                .await),
            UPDATE_DATA_TOOL_NAME => Ok(self
                .mutation_tools
                .as_ref()
                .ok_or(tool_not_found(&request.name))?
                .update
                .execute(input, &self.endpoint)
                .await),
            DELETE_DATA_TOOL_NAME => Ok(self
                .mutation_tools
                .as_ref()
                .ok_or(tool_not_found(&request.name))?
                .delete
                .execute(input, &self.endpoint)
                .await),
            _ => Err(tool_not_found(&request.name)),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Query and modify a Hasura-backed database over GraphQL. \
                 Start with `list_tables` and `describe_table` to learn the schema, \
                 then use `query` for ad hoc operations."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {} not found", name),
        None,
    )
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::new(
            "http://localhost:8080/v1/graphql".parse().unwrap(),
            HeaderMap::new(),
        )
    }

    #[test]
    fn read_only_tool_set_by_default() {
        let running = Running::new(endpoint(), MutationMode::None);
        let tools = running.tools();
        let names: Vec<&str> = tools
            .iter()
            .map(|tool| tool.name.as_ref())
            .collect();
        assert_eq!(names, vec!["query", "list_tables", "describe_table"]);
    }

    #[test]
    fn mutation_mode_all_exposes_the_full_tool_set() {
        let running = Running::new(endpoint(), MutationMode::All);
        let tools = running.tools();
        let names: Vec<&str> = tools
            .iter()
            .map(|tool| tool.name.as_ref())
            .collect();
        assert_eq!(
            names,
            vec![
                "query",
                "list_tables",
                "describe_table",
                "insert_data",
                "update_data",
                "delete_data",
            ]
        );
    }
}
