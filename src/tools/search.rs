//! Ranked symbol search handler.

use crate::format::{format_matches, format_no_results};
use crate::search::suggest;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

/// How many "did you mean" keys to offer when nothing matches.
const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Name fragment to search for (case-insensitive substring)
    pub query: String,
    /// Maximum number of results to return (default from config)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Search the index, returning ranked matches rendered as text.
pub async fn handle_search(state: &Arc<IndexState>, request: SearchRequest) -> Result<String, String> {
    if request.query.trim().is_empty() {
        return Err("Search query is empty. Provide part of a symbol name.".to_string());
    }

    let loaded = state
        .index()
        .await
        .map_err(|e| format!("Failed to load symbol index: {:#}", e))?;

    let limit = request.limit.unwrap_or(state.config().limit);
    let matches: Vec<_> = loaded.index.query(&request.query).take(limit).collect();
    tracing::debug!("Search '{}': {} results (limit {})", request.query, matches.len(), limit);

    if matches.is_empty() {
        let suggestions = suggest(&loaded.index, &request.query, SUGGESTION_LIMIT);
        return Ok(format_no_results(&request.query, &suggestions));
    }

    Ok(format_matches(&matches, &request.query, &state.config().base_url))
}
