use relative_path::{RelativePath, RelativePathBuf};

/// A note file addressed by its identifier under the notes root.
///
/// Identifiers are the file names the original corpus uses for notes; the
/// relative path keeps lookups rooted without touching absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    relative_path: RelativePathBuf,
    id: String,
}

impl NoteFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let id = relative_path.file_name().unwrap_or("").to_string();
        Self { relative_path, id }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// The note identifier used in cross-references and fetches.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<RelativePathBuf> for NoteFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for NoteFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}
