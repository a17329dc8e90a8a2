pub mod notes;
pub use notes::{clone_repository, create_note, open_in_editor};
