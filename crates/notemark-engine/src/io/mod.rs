use std::fs;
use std::path::{Path, PathBuf};

use relative_path::RelativePath;
use tracing::debug;

use crate::markup::{Cursor, TokenKind};
use crate::models::NoteFile;
use crate::resolve::TitleIndex;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("note not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Read a note's raw text by identifier (its file name under the notes root).
pub fn read_note(id: &str, notes_root: &Path) -> Result<String, IoError> {
    let path = RelativePath::new(id).to_path(notes_root);
    if !path.exists() {
        return Err(IoError::NotFound(path));
    }
    fs::read_to_string(&path).map_err(IoError::Io)
}

/// Every note file directly under the notes root, sorted by identifier.
pub fn scan_note_files(notes_root: &Path) -> Result<Vec<NoteFile>, IoError> {
    if !notes_root.exists() {
        return Err(IoError::InvalidNotesDir(
            "notes directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(notes_root).map_err(IoError::Io)? {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();
        if path.is_file()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            files.push(NoteFile::from_relative_str(name));
        }
    }
    files.sort_by(|a, b| a.id().cmp(b.id()));
    Ok(files)
}

/// Build the title → identifier index by reading the leading `#` heading of
/// every note under the root. Notes without one are skipped.
pub fn build_title_index(notes_root: &Path) -> Result<TitleIndex, IoError> {
    let mut index = TitleIndex::new();
    for file in scan_note_files(notes_root)? {
        let text = read_note(file.id(), notes_root)?;
        if let Some(title) = leading_title(&text) {
            index.insert(title, file.id().to_string());
        }
    }
    debug!("title index holds {} entries", index.len());
    Ok(index)
}

/// First heading of a note, if the text starts with one.
fn leading_title(text: &str) -> Option<String> {
    let mut cur = Cursor::new(text);
    let tok = cur.advance();
    if tok.kind == TokenKind::Title {
        tok.value.clone()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::resolve::TitleResolver;

    use super::*;

    fn create_note(dir: &TempDir, id: &str, content: &str) {
        fs::write(dir.path().join(id), content).unwrap();
    }

    #[test]
    fn scan_finds_notes_sorted() {
        let dir = TempDir::new().unwrap();
        create_note(&dir, "zulu", "# Zulu");
        create_note(&dir, "alpha", "# Alpha");

        let files = scan_note_files(dir.path()).unwrap();
        let ids: Vec<_> = files.iter().map(NoteFile::id).collect();
        assert_eq!(ids, vec!["alpha", "zulu"]);
    }

    #[test]
    fn scan_rejects_missing_directory() {
        let result = scan_note_files(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
    }

    #[test]
    fn read_note_returns_content() {
        let dir = TempDir::new().unwrap();
        create_note(&dir, "todo", "# Todo\n\nitems");

        let text = read_note("todo", dir.path()).unwrap();
        assert_eq!(text, "# Todo\n\nitems");
    }

    #[test]
    fn read_note_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_note("ghost", dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn title_index_maps_headings_to_ids() {
        let dir = TempDir::new().unwrap();
        create_note(&dir, "linux", "# Linux Commands\n\nls and friends");
        create_note(&dir, "vim", "# Vim Tricks\n\n- macros");
        create_note(&dir, "raw", "no heading at all");

        let index = build_title_index(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("Linux Commands"), Some("linux".to_string()));
        assert_eq!(index.resolve("Vim Tricks"), Some("vim".to_string()));
        assert_eq!(index.resolve("no heading at all"), None);
    }
}
