pub mod io;
pub mod markup;
pub mod models;
pub mod resolve;

// Re-export key types for easier usage
pub use markup::{ParseError, parse_note};
pub use models::{Document, Node, NodeId, NodeKind, NoteFile};
pub use resolve::{TitleIndex, TitleResolver};
