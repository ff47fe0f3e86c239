//! Save file storage.
//!
//! [`SaveStore`] owns the save location and layout. Writes go to a sibling
//! temp file which is flushed and then renamed over the target, so a crash
//! mid-save leaves either the old file or the new one, never a truncated
//! mix. Writes through clones of one store are serialized, since they share
//! the temp file. All methods here block; the engine calls them from
//! [`tokio::task::spawn_blocking`].

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use life_grid::{DecodeError, GridError, SaveFormat};
use tracing::{debug, warn};

/// Errors raised while saving or loading the grid.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The save file could not be opened, read, written, or renamed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The save file was read but its contents are not a valid grid.
    #[error("save file is corrupt: {source}")]
    Decode {
        /// The underlying decode error.
        #[from]
        source: DecodeError,
    },

    /// Decoded cells did not fit the grid.
    #[error("grid rejected loaded cells: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },

    /// The blocking I/O task panicked or was cancelled.
    #[error("persistence task failed: {source}")]
    Task {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Location and layout of the save file.
///
/// Clones share one write lock.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
    format: SaveFormat,
    write_lock: Arc<Mutex<()>>,
}

impl SaveStore {
    /// Create a store writing `format` to `path`.
    pub fn new(path: impl Into<PathBuf>, format: SaveFormat) -> Self {
        Self {
            path: path.into(),
            format,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The save file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The layout written on save.
    pub const fn format(&self) -> SaveFormat {
        self.format
    }

    /// Atomically replace the save file with `text`.
    ///
    /// Missing parent directories are created. Concurrent writes through
    /// this store or its clones run one at a time; the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] naming the file that failed. The
    /// previous save, if any, is left intact.
    pub fn write(&self, text: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let tmp = self.temp_path();
        let result = write_synced(&tmp, text).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(|source| PersistenceError::Io {
                path: self.path.clone(),
                source,
            })
        });
        if result.is_err() && tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                warn!(path = %tmp.display(), error = %e, "Failed to remove temp save file");
            }
        }
        result?;

        debug!(path = %self.path.display(), bytes = text.len(), "Save file written");
        Ok(())
    }

    /// Read the whole save file as raw bytes.
    ///
    /// Text validation is left to [`life_grid::decode_bytes`], so a file
    /// with non-UTF-8 content is a decode failure rather than an I/O one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file is missing or unreadable.
    pub fn read(&self) -> Result<Vec<u8>, PersistenceError> {
        let bytes = fs::read(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Save file read");
        Ok(bytes)
    }

    /// Sibling path used while writing: `<file name>.tmp`.
    fn temp_path(&self) -> PathBuf {
        match self.path.file_name() {
            Some(name) => {
                let mut tmp = name.to_os_string();
                tmp.push(".tmp");
                self.path.with_file_name(tmp)
            }
            None => self.path.with_extension("tmp"),
        }
    }
}

fn write_synced(path: &Path, text: &str) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    Ok(())
}
