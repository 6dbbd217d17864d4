//! Reading the documentation generator's client-side search tables.

pub(crate) mod entities;
pub(crate) mod parse;
pub(crate) mod shards;

pub use entities::decode_entities;
pub use parse::{KeyFormat, parse_search_data};
pub use shards::{SEARCH_DIR, ShardName, discover_shards, load_shards};
