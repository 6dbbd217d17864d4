//! Exact key lookup handler.

use crate::format::{format_lookup, format_no_results};
use crate::search::suggest;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    /// Exact symbol key, e.g. `insert` or `wait_queue.h` (case-insensitive)
    pub key: String,
}

/// All entries for one key, overloads in their original order.
pub async fn handle_lookup(state: &Arc<IndexState>, request: LookupRequest) -> Result<String, String> {
    let loaded = state
        .index()
        .await
        .map_err(|e| format!("Failed to load symbol index: {:#}", e))?;

    let entries = loaded.index.lookup(&request.key);
    if entries.is_empty() {
        let suggestions = suggest(&loaded.index, &request.key, 5);
        return Ok(format_no_results(&request.key, &suggestions));
    }

    Ok(format_lookup(entries, &request.key, &state.config().base_url))
}
