//! Tool handlers shared by the MCP server and the command line.

pub mod lookup;
pub mod search;
pub mod stats;
