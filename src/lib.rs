//! # zets
//!
//! Fuzzy search over a zettelkasten kept as plain directories on disk.
//!
//! ## Layout
//!
//! Notes live three levels below the root: `<root>/<topic>/<year>/<note>/`.
//! Every non-hidden file directly inside a note directory is searched line by
//! line; topic and year directories only organise the notes.
//!
//! ## Features
//!
//! - Fresh directory tree on every query, no index to keep in sync
//! - Hidden entries and excluded directories (`node_modules`) are skipped
//! - Pluggable line matching: typo-tolerant subsequence or nucleo fuzzy
//! - Static HTML index of the tree
//! - Both library and CLI interfaces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zets::{SubsequenceMatcher, ZetQueryEngine, ZetsConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Defaults, ~/.config/zets/config.json, then $ZETS_DIR
//! let config = ZetsConfig::resolve(None)?;
//!
//! let mut engine = ZetQueryEngine::new(config.walk_options(), SubsequenceMatcher::new());
//! let results = engine.query(&config.root, &["fuzzy", "search"])?;
//!
//! for result in &results {
//!     println!("{}", result.path);
//!     for line in &result.components {
//!         println!("    {}", line);
//!     }
//! }
//!
//! // Or pick the matcher from configuration
//! let mut engine = ZetQueryEngine::new(config.walk_options(), config.matcher.build());
//! let results = engine.query(&config.root, &["cache"])?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub use traits::{LineMatcher, QueryResult, QueryResultSet};

pub mod config;
pub use config::{ZetDirs, ZetsConfig};

pub mod tree;
pub use tree::{DirectoryNode, DirectoryWalker, FileEntry, WalkOptions};

pub mod lines;
pub use lines::{LineReader, read_lines};

pub mod matchers;
pub use matchers::{MatcherKind, NucleoMatcher, SubsequenceMatcher};

pub mod engines;
pub use engines::ZetQueryEngine;

pub mod index_page;
