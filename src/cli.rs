use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doxsearch")]
#[command(about = "Search the symbol index of a generated API reference", long_about = None)]
pub struct Cli {
    /// Config file (default: ./doxsearch.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Documentation root, overriding `docs_dir` from the config
    #[arg(short, long, global = true)]
    pub docs: Option<PathBuf>,

    /// Bypass the index snapshot cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// Ranked substring search
    Query {
        fragment: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exact key lookup
    Lookup {
        key: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Index statistics
    Stats,
}
