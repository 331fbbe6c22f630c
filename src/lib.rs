//! Language-aware file maps: compact outlines of the definitions in source and markup
//! files, cheap enough to hand to a language model in place of the files themselves.
//!
//! ```no_run
//! use filemap::{map_file, CancellationToken};
//!
//! let map = map_file(&CancellationToken::new(), "lib.rs", b"pub fn run() {}").unwrap();
//! assert_eq!(map.to_string(), "pub fn run()\n");
//! ```

pub mod bulk;
pub mod classify;
pub mod config;
pub mod dockerfile;
pub mod error;
pub mod language;
pub mod mapper;
pub mod markdown;
pub mod markup;
pub mod node_tables;
pub mod queue;
pub mod render;
pub mod scanner;
pub mod signature;
pub mod svelte;
pub mod types;
pub mod walker;

pub use bulk::{combined_trees, map_batch, map_trees};
pub use error::{MapError, Result};
pub use language::{has_map_support, Language};
pub use mapper::map_file;
pub use queue::{MapJob, MapQueue, QueueStats};
pub use render::{combined as combined_map, render};
pub use tokio_util::sync::CancellationToken;
pub use types::{Definition, FileMap, FileMapBodies, MapTrees, NO_MAP, NO_MAP_TOO_LARGE};
