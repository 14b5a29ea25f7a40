//! JSON-lines guestbook file.
//!
//! Layout:
//! ```text
//! {"guestbook_schema_version":1}      - header line
//! {"author":"...","message":"...","unix_time_ms":...}
//! {"author":"...","message":"...","unix_time_ms":...}
//! ```

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Current schema version.
const STORE_SCHEMA_VERSION: u32 = 1;

/// Errors from guestbook persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("missing store header")]
    MissingHeader,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreHeader {
    guestbook_schema_version: u32,
}

/// One signed guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub author: String,
    pub message: String,
    pub unix_time_ms: u64,
}

/// File-backed ordered guestbook with a schema-version header.
#[derive(Debug)]
pub struct GuestbookStore {
    path: PathBuf,
}

impl GuestbookStore {
    /// Open or create the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if path.exists() {
            let store = Self { path };
            store.read_header()?;
            Ok(store)
        } else {
            let mut file = std::fs::File::create(&path)?;
            serde_json::to_writer(
                &mut file,
                &StoreHeader {
                    guestbook_schema_version: STORE_SCHEMA_VERSION,
                },
            )?;
            file.write_all(b"\n")?;
            tracing::debug!(?path, "guestbook store created");
            Ok(Self { path })
        }
    }

    fn read_header(&self) -> Result<(), StoreError> {
        let file = std::fs::File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut first_line = String::new();
        reader.read_line(&mut first_line)?;
        if first_line.trim().is_empty() {
            return Err(StoreError::MissingHeader);
        }
        let header: StoreHeader =
            serde_json::from_str(first_line.trim()).map_err(|_| StoreError::MissingHeader)?;
        if header.guestbook_schema_version != STORE_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: header.guestbook_schema_version,
                expected_version: STORE_SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    /// Append one entry to the end of the list.
    ///
    /// If the file ends mid-line (a torn previous write), the new entry
    /// starts on a fresh line so it stays readable.
    pub fn append(&mut self, entry: &GuestbookEntry) -> Result<(), StoreError> {
        let needs_terminator = {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = std::fs::File::open(&self.path)?;
            let len = file.metadata()?.len();
            if len == 0 {
                false
            } else {
                file.seek(SeekFrom::End(-1))?;
                let mut last = [0u8; 1];
                file.read_exact(&mut last)?;
                last[0] != b'\n'
            }
        };

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if needs_terminator {
            file.write_all(b"\n")?;
        }
        let line = serde_json::to_string(entry)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        tracing::debug!(author = %entry.author, "guestbook entry appended");
        Ok(())
    }

    /// Load all entries in insertion order.
    ///
    /// A line that fails to parse (typically a torn final write) is
    /// skipped with a warning; the rest of the book still loads.
    pub fn load(&self) -> Result<Vec<GuestbookEntry>, StoreError> {
        self.read_header()?;
        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for (line_number, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<GuestbookEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!(line_number, %err, "skipping unreadable guestbook line");
                }
            }
        }
        Ok(entries)
    }

    /// Number of readable entries.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(author: &str, message: &str, t: u64) -> GuestbookEntry {
        GuestbookEntry {
            author: author.into(),
            message: message.into(),
            unix_time_ms: t,
        }
    }

    #[test]
    fn open_creates_store_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guestbook.jsonl");
        let store = GuestbookStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn entries_roundtrip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GuestbookStore::open(dir.path().join("gb.jsonl")).unwrap();
        for i in 0..5 {
            store
                .append(&entry(&format!("visitor_{i}"), "hello!", 1000 + i))
                .unwrap();
        }
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 5);
        assert_eq!(loaded[0].author, "visitor_0");
        assert_eq!(loaded[4].author, "visitor_4");
        assert!(loaded.windows(2).all(|w| w[0].unix_time_ms <= w[1].unix_time_ms));
    }

    #[test]
    fn reopen_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gb.jsonl");
        {
            let mut store = GuestbookStore::open(&path).unwrap();
            store.append(&entry("ada", "lovely site", 1)).unwrap();
        }
        let store = GuestbookStore::open(&path).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].message, "lovely site");
    }

    #[test]
    fn torn_final_line_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gb.jsonl");
        let mut store = GuestbookStore::open(&path).unwrap();
        store.append(&entry("ada", "first", 1)).unwrap();

        // Simulate a torn write: half a JSON object at the end.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"author\":\"bob\",\"mess").unwrap();
        drop(file);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].author, "ada");

        // Appending after recovery still works.
        store.append(&entry("eve", "second", 2)).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn wrong_schema_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gb.jsonl");
        std::fs::write(&path, "{\"guestbook_schema_version\":99}\n").unwrap();
        let err = GuestbookStore::open(&path).unwrap_err();
        assert!(matches!(
            err,
            StoreError::SchemaMismatch {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn garbage_header_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gb.jsonl");
        std::fs::write(&path, "not json\n").unwrap();
        assert!(matches!(
            GuestbookStore::open(&path).unwrap_err(),
            StoreError::MissingHeader
        ));
    }
}
