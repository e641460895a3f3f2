//! A library opened over a data directory.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pagemark_core::{Clock, IdGenerator, Library, SystemClock, UuidIds};
use pagemark_storage::FileStorage;

/// File-backed [`Library`] plus the storage handle needed to notice writes
/// made by other `pagemark` processes.
#[derive(Debug)]
pub struct Session {
    storage: Arc<FileStorage>,
    library: Library,
}

impl Session {
    /// Open the data directory with the wall clock and random ids.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::open_with(data_dir, Arc::new(SystemClock), Arc::new(UuidIds))
    }

    pub fn open_with(
        data_dir: &Path,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(data_dir));
        let library = Library::open(storage.clone(), clock, ids)
            .with_context(|| format!("open reading data in {}", data_dir.display()))?;
        tracing::debug!(data_dir = %data_dir.display(), "session opened");
        Ok(Self { storage, library })
    }

    pub fn data_dir(&self) -> &Path {
        self.storage.dir()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut Library {
        &mut self.library
    }

    /// Pick up files rewritten by other processes since they were read.
    pub fn refresh(&mut self) -> Result<usize> {
        self.storage
            .poll_external_changes()
            .context("check data files for external changes")?;
        let applied = self
            .library
            .sync_external_changes()
            .context("apply external changes")?;
        Ok(applied)
    }
}
