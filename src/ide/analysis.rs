//! AnalysisHost and Analysis — the query surface the transport layer calls.
//!
//! The host owns one analysis unit per file (text, AST, syntax errors,
//! external diagnostics) plus the library index, and invalidates a
//! file's derived state as a unit whenever its text changes. Queries go
//! through an [`Analysis`] snapshot; if anything changed since the last
//! snapshot, the derived caches are rebuilt first, so a query never sees
//! a stale generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{goto, references};
use crate::base::{FileId, Location, Position};
use crate::project::{FileIndex, ImportResolver};
use crate::resolver::LibraryIndex;
use crate::semantic::{Diagnostic, ExternalDiagnostic, analyze, merge_diagnostics};
use crate::syntax::{self, ParseNode, SourceUnit};

/// Everything the engine holds for one file.
#[derive(Debug)]
pub(crate) struct FileAnalysis {
    pub(crate) path: PathBuf,
    pub(crate) text: Arc<str>,
    /// Built from the external parse tree; absent until one is supplied
    /// for the current text generation.
    pub(crate) ast: Option<SourceUnit>,
    /// From the external parser's error listener.
    pub(crate) syntax_errors: Vec<Diagnostic>,
    /// Pre-converted external build/lint records.
    pub(crate) external: Vec<Diagnostic>,
}

/// Owns all mutable analysis state.
///
/// Apply changes via `set_file_content` / `set_parse_tree` / the
/// diagnostic setters, then get a consistent snapshot via `analysis()`.
#[derive(Default)]
pub struct AnalysisHost {
    files: IndexMap<FileId, FileAnalysis>,
    path_map: FxHashMap<PathBuf, FileId>,
    next_file: u32,
    lib_index: LibraryIndex,
    file_index: Option<Box<dyn FileIndex>>,
    import_resolver: Option<Box<dyn ImportResolver>>,
    /// Text of every known file (open documents + project candidates),
    /// rebuilt per generation for the cross-file scans.
    project_texts: Vec<(FileId, Arc<str>)>,
    dirty: bool,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a path, assigning a `FileId` on first sight.
    pub fn file_id(&mut self, path: impl AsRef<Path>) -> FileId {
        let path = path.as_ref();
        if let Some(&file) = self.path_map.get(path) {
            return file;
        }
        let file = FileId::new(self.next_file);
        self.next_file += 1;
        self.path_map.insert(path.to_path_buf(), file);
        file
    }

    /// The id of an already-known path.
    pub fn lookup_file(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.path_map.get(path.as_ref()).copied()
    }

    /// Set a document's text. This starts a new generation for the
    /// file: the old AST and its library-info entry become stale and
    /// are dropped before the next query.
    pub fn set_file_content(&mut self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> FileId {
        let path = path.as_ref().to_path_buf();
        let file = self.file_id(&path);
        self.files.insert(
            file,
            FileAnalysis {
                path,
                text: text.into(),
                ast: None,
                syntax_errors: Vec::new(),
                external: Vec::new(),
            },
        );
        self.dirty = true;
        file
    }

    /// Supply the external parse tree for a file's current text; the
    /// AST builder runs here. `None` yields an empty tree.
    pub fn set_parse_tree(&mut self, file: FileId, tree: Option<&ParseNode>) {
        if let Some(doc) = self.files.get_mut(&file) {
            doc.ast = Some(syntax::build(tree, file));
            self.dirty = true;
        }
    }

    /// Syntax-error diagnostics from the parser's error listener.
    pub fn set_syntax_errors(&mut self, file: FileId, errors: Vec<Diagnostic>) {
        if let Some(doc) = self.files.get_mut(&file) {
            doc.syntax_errors = errors;
        }
    }

    /// External build/lint records for a file (already normalized).
    pub fn set_external_diagnostics(&mut self, file: FileId, records: Vec<ExternalDiagnostic>) {
        if let Some(doc) = self.files.get_mut(&file) {
            doc.external = records
                .into_iter()
                .map(|record| record.into_diagnostic(file))
                .collect();
        }
    }

    pub fn remove_file(&mut self, file: FileId) {
        if let Some(doc) = self.files.shift_remove(&file) {
            self.path_map.remove(&doc.path);
        }
        self.dirty = true;
    }

    /// Configure the project-wide file index collaborator.
    pub fn set_file_index(&mut self, index: Box<dyn FileIndex>) {
        self.file_index = Some(index);
        self.dirty = true;
    }

    /// Configure the import-resolution collaborator.
    pub fn set_import_resolver(&mut self, resolver: Box<dyn ImportResolver>) {
        self.import_resolver = Some(resolver);
    }

    /// Get a consistent snapshot for querying, rebuilding derived state
    /// first if any file changed.
    pub fn analysis(&mut self) -> Analysis<'_> {
        if self.dirty {
            self.rebuild();
        }
        Analysis { host: self }
    }

    /// Re-derive the library index and the project text set. This is the
    /// generation boundary: every per-file cache entry is rebuilt from
    /// current text, never read across it.
    fn rebuild(&mut self) {
        self.lib_index.clear();
        self.project_texts.clear();

        // Open documents first, AST-grounded where a tree was supplied.
        let open: Vec<FileId> = self.files.keys().copied().collect();
        for file in open {
            if let Some(doc) = self.files.get(&file) {
                self.lib_index
                    .parse_file(file, &doc.text, doc.ast.as_ref());
                self.project_texts.push((file, doc.text.clone()));
            }
        }

        // Project candidates from the file-index collaborator. Failures
        // are logged and skipped; one unreadable file never blocks the
        // rest.
        if let Some(index) = self.file_index.as_deref() {
            let mut interned = Vec::new();
            for path in index.files() {
                let file = match self.path_map.get(&path) {
                    Some(&file) => file,
                    None => {
                        let file = FileId::new(self.next_file);
                        self.next_file += 1;
                        self.path_map.insert(path.clone(), file);
                        file
                    }
                };
                match index.text(&path) {
                    Ok(text) => interned.push((file, text)),
                    Err(error) => debug!(%error, "skipping unreadable project file"),
                }
            }
            for (file, text) in interned {
                self.lib_index.parse_file(file, &text, None);
                if !self.project_texts.iter().any(|(f, _)| *f == file) {
                    self.project_texts.push((file, text));
                }
            }
        }

        self.dirty = false;
    }
}

/// A read-only snapshot over the host's state.
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
}

impl Analysis<'_> {
    /// Merged diagnostics for a file: syntax errors, then semantic
    /// analysis, then external tool records, in that order.
    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        let Some(doc) = self.document(file) else {
            return Vec::new();
        };
        let semantic = doc
            .ast
            .as_ref()
            .map(analyze)
            .unwrap_or_default();
        merge_diagnostics(doc.syntax_errors.clone(), semantic, doc.external.clone())
    }

    /// Go-to-definition.
    pub fn definitions(&self, file: FileId, position: Position) -> Vec<Location> {
        goto::definitions(self, file, position)
    }

    /// Go-to-declaration: definitions, extended with interface
    /// declarations when the symbol implements one.
    pub fn declarations(&self, file: FileId, position: Position) -> Vec<Location> {
        goto::declarations(self, file, position)
    }

    /// Go-to-type-definition.
    pub fn type_definitions(&self, file: FileId, position: Position) -> Vec<Location> {
        goto::type_definitions(self, file, position)
    }

    /// Go-to-implementation.
    pub fn implementations(&self, file: FileId, position: Position) -> Vec<Location> {
        goto::implementations(self, file, position)
    }

    /// Find references, deduplicated and sorted by (file, line, column).
    pub fn find_references(
        &self,
        file: FileId,
        position: Position,
        include_declaration: bool,
    ) -> Vec<Location> {
        references::find_references(self, file, position, include_declaration)
    }

    // -- internals shared with the goto/references modules --

    pub(crate) fn document(&self, file: FileId) -> Option<&FileAnalysis> {
        self.host.files.get(&file)
    }

    pub(crate) fn documents(&self) -> impl Iterator<Item = (FileId, &FileAnalysis)> {
        self.host.files.iter().map(|(&file, doc)| (file, doc))
    }

    pub(crate) fn lib_index(&self) -> &LibraryIndex {
        &self.host.lib_index
    }

    pub(crate) fn project_texts(&self) -> &[(FileId, Arc<str>)] {
        &self.host.project_texts
    }

    pub(crate) fn import_resolver(&self) -> Option<&dyn ImportResolver> {
        self.host.import_resolver.as_deref()
    }
}
