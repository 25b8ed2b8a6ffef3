//! Project collaborators: the file index and import resolution.
//!
//! Both are external concerns; the engine only defines the traits it
//! consumes and two ready-made indexes. A missing collaborator always
//! degrades to an empty result, never an error that escapes a query.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::base::{FileId, Location};

/// Failures at the project boundary. Callers log and degrade; these
/// never propagate past a single file's analysis.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("unknown file: {}", .0.display())]
    UnknownFile(PathBuf),
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Enumerates the project's candidate files and serves their text.
/// The analysis host interns the paths into its own `FileId` space.
pub trait FileIndex {
    /// All candidate files, in a stable order.
    fn files(&self) -> Vec<PathBuf>;

    /// The current text of a file.
    fn text(&self, path: &Path) -> Result<Arc<str>, ProjectError>;
}

/// Resolves an import path to the location of the imported file.
/// Configured by the caller; absent means import queries return empty.
pub trait ImportResolver {
    fn resolve_import(&self, import_path: &str, from: FileId) -> Option<Location>;
}

/// In-memory file index, the common case for an editor session where the
/// document manager owns the text.
#[derive(Debug, Default)]
pub struct InMemoryFileIndex {
    texts: FxHashMap<PathBuf, Arc<str>>,
    order: Vec<PathBuf>,
}

impl InMemoryFileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<Arc<str>>) {
        let path = path.into();
        if !self.texts.contains_key(&path) {
            self.order.push(path.clone());
        }
        self.texts.insert(path, text.into());
    }

    pub fn remove(&mut self, path: &Path) {
        self.texts.remove(path);
        self.order.retain(|p| p != path);
    }
}

impl FileIndex for InMemoryFileIndex {
    fn files(&self) -> Vec<PathBuf> {
        self.order.clone()
    }

    fn text(&self, path: &Path) -> Result<Arc<str>, ProjectError> {
        self.texts
            .get(path)
            .cloned()
            .ok_or_else(|| ProjectError::UnknownFile(path.to_path_buf()))
    }
}

/// Filesystem-backed index: walks a root directory once for `.sol` files
/// and reads them on demand. Unreadable entries are logged and skipped
/// so one broken file never blocks the rest of the project.
#[derive(Debug)]
pub struct FsFileIndex {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FsFileIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut files = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.path().extension().is_some_and(|ext| ext == "sol") => {
                    files.push(entry.path().to_path_buf());
                }
                Ok(_) => {}
                Err(error) => debug!(%error, "skipping unreadable directory entry"),
            }
        }
        debug!(root = %root.display(), count = files.len(), "indexed solidity files");
        Self { root, files }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileIndex for FsFileIndex {
    fn files(&self) -> Vec<PathBuf> {
        self.files.clone()
    }

    fn text(&self, path: &Path) -> Result<Arc<str>, ProjectError> {
        std::fs::read_to_string(path)
            .map(Arc::from)
            .map_err(|source| ProjectError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
