use anyhow::{Context, bail};
use clap::Parser;
use doxsearch::cli::{Cli, Commands};
use doxsearch::tools::lookup::{LookupRequest, handle_lookup};
use doxsearch::tools::search::{SearchRequest, handle_search};
use doxsearch::tools::stats::handle_stats;
use doxsearch::{Config, IndexState, SymbolServer};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the MCP protocol on stdout
    doxsearch::tracing::init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(docs) = cli.docs {
        config.docs_dir = docs;
    }
    if cli.no_cache {
        config.cache = false;
    }
    let state = Arc::new(IndexState::new(config));

    match cli.command {
        Commands::Serve => serve(state).await,
        Commands::Query {
            fragment,
            limit,
            json: true,
        } => {
            let loaded = state.index().await?;
            let limit = limit.unwrap_or(state.config().limit);
            let matches: Vec<_> = loaded.index.query(&fragment).take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&matches)?);
            Ok(())
        }
        Commands::Query {
            fragment, limit, ..
        } => print_tool(
            handle_search(
                &state,
                SearchRequest {
                    query: fragment,
                    limit,
                },
            )
            .await,
        ),
        Commands::Lookup { key, json: true } => {
            let loaded = state.index().await?;
            println!("{}", serde_json::to_string_pretty(loaded.index.lookup(&key))?);
            Ok(())
        }
        Commands::Lookup { key, .. } => {
            print_tool(handle_lookup(&state, LookupRequest { key }).await)
        }
        Commands::Stats => print_tool(handle_stats(&state).await),
    }
}

fn print_tool(result: Result<String, String>) -> anyhow::Result<()> {
    match result {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(message) => bail!(message),
    }
}

async fn serve(state: Arc<IndexState>) -> anyhow::Result<()> {
    tracing::info!("Starting doxsearch MCP server");

    // Build the index in the background so the first tool call doesn't pay for it
    let warm = state.clone();
    tokio::spawn(async move {
        if let Err(e) = warm.index().await {
            tracing::warn!("Symbol index not available yet: {:#}", e);
        }
    });

    let server = SymbolServer::new(state);
    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("Error serving MCP server: {:?}", e);
        })
        .context("Failed to start MCP server")?;

    service.waiting().await?;
    Ok(())
}
