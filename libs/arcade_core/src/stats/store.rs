use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::{fs, io};

use serde::Serialize as _;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::StatsRoot;
use crate::error::Result;

/// Loads and saves the whole stats document.
pub trait Persistence: Send + Sync {
    /// Loads the stored document, or `None` if nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the storage cannot be read or holds invalid data.
    fn load(&self) -> Result<Option<StatsRoot>>;

    /// Overwrites the stored document.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the storage cannot be written.
    fn save(&self, root: &StatsRoot) -> Result;
}

/// Stores the stats as a single indented JSON file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Option<StatsRoot>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(why) if why.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why.into()),
        }
    }

    fn save(&self, root: &StatsRoot) -> Result {
        let mut buf = Vec::with_capacity(4096);
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        root.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;
        Ok(())
    }
}

/// The shared stats root plus where to persist it.
///
/// Every mutation through [`StatsStore::update`] is followed by a full save.
pub struct StatsStore {
    root: Mutex<StatsRoot>,
    persistence: Box<dyn Persistence>,
}

impl StatsStore {
    /// Opens the store, loading the existing document or starting empty.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the existing document cannot be loaded.
    pub fn open(persistence: Box<dyn Persistence>) -> Result<Self> {
        let root = persistence.load()?.unwrap_or_default();
        Ok(Self {
            root: Mutex::new(root),
            persistence,
        })
    }

    fn lock(&self) -> MutexGuard<'_, StatsRoot> {
        // the root is only ever mutated in one step, so a poisoned lock still
        // holds a consistent document
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutates the root and then persists it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if saving fails. The mutation itself is kept in memory.
    pub fn update<R>(&self, f: impl FnOnce(&mut StatsRoot) -> R) -> Result<R> {
        let mut root = self.lock();
        let value = f(&mut root);
        self.persistence.save(&root)?;
        Ok(value)
    }

    /// Gives access to the root without persisting afterwards.
    ///
    /// Lazily created defaults are kept and saved with the next update.
    pub fn inspect<R>(&self, f: impl FnOnce(&mut StatsRoot) -> R) -> R {
        f(&mut self.lock())
    }
}

impl std::fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsStore").finish_non_exhaustive()
    }
}
