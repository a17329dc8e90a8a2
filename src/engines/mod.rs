pub mod notes;
pub use notes::{ZetQueryEngine, join_terms, note_files};
