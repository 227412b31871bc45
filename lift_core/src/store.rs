//! Session persistence with file locking.
//!
//! The full session list is stored as a single JSON array. Readers take a
//! shared lock; writers build the new file beside the old one and rename it
//! into place, so a reader sees either the previous or the new contents.

use crate::{Error, Result, Session};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the session store inside the data directory
pub const STORE_FILE_NAME: &str = "workouts.json";

/// Load/save contract for the session collection
pub trait SessionStore {
    /// All persisted sessions, in logged order. Empty when nothing is stored.
    fn load(&self) -> Result<Vec<Session>>;

    /// Replace the stored collection
    fn save(&mut self, sessions: &[Session]) -> Result<()>;

    /// Append one session and persist the result
    fn append(&mut self, session: Session) -> Result<Vec<Session>> {
        let mut sessions = self.load()?;
        sessions.push(session);
        self.save(&sessions)?;
        Ok(sessions)
    }
}

/// JSON-file session store
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    /// Exclusive writer lock on `workouts.json.lock`, released on unlock or drop
    fn lock_writer(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// Write the full collection via temp file + rename. Caller holds the writer lock.
    fn write_atomic(&self, sessions: &[Session]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(&parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, sessions)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        // Atomically replace old store file
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} sessions to {:?}", sessions.len(), self.path);
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Session>> {
        if !self.path.exists() {
            tracing::info!("No session store at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sessions: Vec<Session> = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded {} sessions from {:?}", sessions.len(), self.path);
        Ok(sessions)
    }

    fn save(&mut self, sessions: &[Session]) -> Result<()> {
        let lock = self.lock_writer()?;
        let saved = self.write_atomic(sessions);
        lock.unlock()?;
        saved
    }

    fn append(&mut self, session: Session) -> Result<Vec<Session>> {
        // Hold the writer lock across the read-modify-write so concurrent
        // appends and saves can't drop each other's sessions.
        let lock = self.lock_writer()?;

        let loaded = self.load();
        let saved = loaded.and_then(|mut sessions| {
            sessions.push(session);
            self.write_atomic(&sessions).map(|()| sessions)
        });

        lock.unlock()?;
        let sessions = saved?;

        if let Some(last) = sessions.last() {
            tracing::info!("Appended session {} ({} total)", last.id, sessions.len());
        }
        Ok(sessions)
    }
}
