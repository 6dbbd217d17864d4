//! MCP server exposing the symbol index as tools.

use crate::state::IndexState;
use crate::tools::lookup::{LookupRequest, handle_lookup};
use crate::tools::search::{SearchRequest, handle_search};
use crate::tools::stats::handle_stats;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation symbol queries
#[derive(Clone)]
pub struct SymbolServer {
    /// Shared index state (built lazily on first use)
    state: Arc<IndexState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SymbolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SymbolServer {
    pub fn new(state: Arc<IndexState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared IndexState.
    pub fn index_state(&self) -> &Arc<IndexState> {
        &self.state
    }

    #[tool(
        description = "Search the API reference for symbols (functions, classes, members, files) whose name contains the query, case-insensitively. Exact name matches rank first, then names starting with the query, then other matches; shorter names rank before longer ones."
    )]
    async fn search_symbols(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Look up every documented target for an exact symbol name, e.g. all overloads of 'insert'. Case-insensitive."
    )]
    async fn lookup_symbol(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        handle_lookup(&self.state, request).await
    }

    #[tool(description = "Show where the symbol index was loaded from and how many symbols it holds.")]
    async fn index_stats(&self) -> std::result::Result<String, String> {
        handle_stats(&self.state).await
    }
}

#[tool_handler]
impl ServerHandler for SymbolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "doxsearch: symbol search over a generated API reference. \
                 Use search_symbols with part of a name, then lookup_symbol for all targets of an exact name."
                    .to_string(),
            )
    }
}
