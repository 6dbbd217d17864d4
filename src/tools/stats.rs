//! Index statistics handler.

use crate::state::IndexState;
use std::sync::Arc;

/// Summarize the loaded index: source, entry and key counts.
pub async fn handle_stats(state: &Arc<IndexState>) -> Result<String, String> {
    let loaded = state
        .index()
        .await
        .map_err(|e| format!("Failed to load symbol index: {:#}", e))?;

    let index = &loaded.index;
    let overloaded = index.keys().filter(|key| index.lookup(key).len() > 1).count();

    Ok(format!(
        "Symbol index for {}\n\n\
         • Shards: {}\n\
         • Entries: {}\n\
         • Distinct keys: {}\n\
         • Keys with several targets: {}\n",
        loaded.root.display(),
        loaded.shard_count,
        index.len(),
        index.key_count(),
        overloaded
    ))
}
