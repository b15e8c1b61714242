//! Output sinks for generated units.
//!
//! Every generation step writes through a single shared [`Emitter`], so output
//! identity and duplicate detection live in one place. Writing the same name
//! twice with identical content is a no-op; writing it with different content
//! is an error.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use eyre::{Result, bail, eyre};
use indexmap::IndexMap;
use tracing::debug;

use crate::{QualifiedName, WriteResult, file::write_file};

/// Shared handle to the emitter used by all steps of a coordinator.
pub type SharedEmitter = Arc<dyn Emitter>;

/// Sink for generated compilation units.
pub trait Emitter: Send + Sync {
    /// Materialize `content` as the unit named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit was already written with different
    /// content, or if the underlying sink fails.
    fn write(&self, name: &QualifiedName, content: &str) -> Result<WriteResult>;
}

/// Tracks what has been emitted so far, in emission order.
#[derive(Debug, Default)]
struct Ledger {
    units: Mutex<IndexMap<QualifiedName, String>>,
}

impl Ledger {
    /// Record `content` under `name`.
    ///
    /// Returns `false` when identical content was already recorded.
    fn record(&self, name: &QualifiedName, content: &str) -> Result<bool> {
        let mut units = self
            .units
            .lock()
            .map_err(|_| eyre!("emitter ledger lock poisoned"))?;

        match units.get(name) {
            Some(existing) if existing == content => Ok(false),
            Some(_) => bail!("'{}' was already generated with different content", name),
            None => {
                units.insert(name.clone(), content.to_string());
                Ok(true)
            }
        }
    }

    /// Drop the record for `name` after its write failed.
    fn forget(&self, name: &QualifiedName) {
        if let Ok(mut units) = self.units.lock() {
            units.shift_remove(name);
        }
    }

    fn snapshot(&self) -> Vec<(QualifiedName, String)> {
        self.units
            .lock()
            .map(|units| {
                units
                    .iter()
                    .map(|(name, content)| (name.clone(), content.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Emitter that keeps generated units in memory.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    ledger: Ledger,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All generated units in emission order.
    pub fn units(&self) -> Vec<(QualifiedName, String)> {
        self.ledger.snapshot()
    }

    /// Content of the unit with the given dotted name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.units()
            .into_iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, content)| content)
    }

    pub fn len(&self) -> usize {
        self.units().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Emitter for MemoryEmitter {
    fn write(&self, name: &QualifiedName, content: &str) -> Result<WriteResult> {
        if self.ledger.record(name, content)? {
            debug!(unit = %name, "buffered generated unit");
            Ok(WriteResult::Written)
        } else {
            Ok(WriteResult::Skipped)
        }
    }
}

/// Emitter that writes each unit to a source file under a root directory.
///
/// `com.example.BR` lands at `<root>/com/example/BR.java`.
#[derive(Debug)]
pub struct FileEmitter {
    root: PathBuf,
    extension: String,
    ledger: Ledger,
}

impl FileEmitter {
    /// Create an emitter writing `.java` sources under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "java".to_string(),
            ledger: Ledger::default(),
        }
    }

    /// Use a different file extension for generated sources.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the file a unit is written to.
    pub fn path_for(&self, name: &QualifiedName) -> PathBuf {
        self.root.join(name.to_path(&self.extension))
    }

    /// Paths of every file written so far, in emission order.
    pub fn written(&self) -> Vec<PathBuf> {
        self.ledger
            .snapshot()
            .iter()
            .map(|(name, _)| self.path_for(name))
            .collect()
    }
}

impl Emitter for FileEmitter {
    fn write(&self, name: &QualifiedName, content: &str) -> Result<WriteResult> {
        if !self.ledger.record(name, content)? {
            return Ok(WriteResult::Skipped);
        }

        let path = self.path_for(name);
        if let Err(e) = write_file(&path, content) {
            self.ledger.forget(name);
            return Err(e);
        }
        debug!(unit = %name, path = %path.display(), "wrote generated unit");
        Ok(WriteResult::Written)
    }
}
