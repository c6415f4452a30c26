pub mod document;
pub mod note_file;

pub use document::{Document, Node, NodeId, NodeKind};
pub use note_file::NoteFile;

pub(crate) use document::NodeArena;
