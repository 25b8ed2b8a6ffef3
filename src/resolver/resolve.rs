//! The library method resolution index.
//!
//! Owns the per-file [`FileLibraryInfo`] caches and answers the central
//! question: which concrete library function does `receiver.method(...)`
//! call? Matching is first-match-wins in directive order, then function
//! declaration order; there is no "most specific" ranking.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use regex::Regex;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::library::{LibraryFunction, MethodCallContext, UsingDirectiveInfo};
use super::scan::{self, FileLibraryInfo};
use crate::base::{FileId, Location, Span};
use crate::syntax::SourceUnit;

/// Per-file library knowledge, keyed by file identity.
///
/// Entries are created by [`parse_file`](Self::parse_file) (idempotent:
/// a file already parsed is skipped) and must be dropped with
/// [`invalidate_file`](Self::invalidate_file) before resolving against
/// changed text; otherwise resolution silently uses stale data.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    files: IndexMap<FileId, FileLibraryInfo>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parse-once guard.
    pub fn is_parsed(&self, file: FileId) -> bool {
        self.files.contains_key(&file)
    }

    /// Scan a file for libraries, using directives and variable types.
    /// Grounded on the AST when one is given, text patterns otherwise.
    /// A second call for the same file is a no-op.
    pub fn parse_file(&mut self, file: FileId, content: &str, ast: Option<&SourceUnit>) {
        if self.is_parsed(file) {
            return;
        }
        let info = match ast {
            Some(unit) => scan::scan_ast(unit),
            None => scan::scan_text(file, content),
        };
        trace!(
            %file,
            libraries = info.libraries.len(),
            directives = info.using_directives.len(),
            "parsed file for library info"
        );
        self.files.insert(file, info);
    }

    /// Drop one file's entry (call before re-parsing changed content).
    pub fn invalidate_file(&mut self, file: FileId) {
        self.files.shift_remove(&file);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Using directives of one file, in declaration order.
    pub fn directives_for_file(&self, file: FileId) -> &[UsingDirectiveInfo] {
        self.files
            .get(&file)
            .map(|info| info.using_directives.as_slice())
            .unwrap_or(&[])
    }

    /// All functions of a library, across files, in parse-then-declaration order.
    pub fn functions_of(&self, library: &str) -> impl Iterator<Item = &LibraryFunction> {
        self.files
            .values()
            .filter_map(move |info| info.libraries.get(library))
            .flatten()
    }

    /// Whether any parsed library defines a function with this name.
    pub fn is_library_function(&self, name: &str) -> bool {
        self.files
            .values()
            .flat_map(|info| info.libraries.values())
            .flatten()
            .any(|function| function.name == name)
    }

    /// The libraries defining a function with this name, in parse order.
    pub fn libraries_defining(&self, name: &str) -> Vec<SmolStr> {
        let mut libraries = Vec::new();
        for info in self.files.values() {
            for (library, functions) in &info.libraries {
                if functions.iter().any(|f| f.name == name) && !libraries.contains(library) {
                    libraries.push(library.clone());
                }
            }
        }
        libraries
    }

    /// Cached variable type, no text fallback.
    pub fn variable_type(&self, file: FileId, name: &str) -> Option<SmolStr> {
        self.files
            .get(&file)?
            .variable_types
            .get(name)
            .cloned()
    }

    /// Infer a receiver's type: cached map first, then the documented
    /// text patterns. `None` means resolution will fail softly.
    pub fn infer_variable_type(&self, name: &str, file: FileId, content: &str) -> Option<SmolStr> {
        if let Some(ty) = self.variable_type(file, name) {
            return Some(ty);
        }
        scan::infer_type_from_text(name, content)
    }

    /// Resolve a method-style call to the concrete library function.
    ///
    /// 1. Keep the file's directives whose target is `*`, equal, or
    ///    compatible with the receiver type.
    /// 2. In directive order, scan each library's functions for a name
    ///    match whose first parameter accepts the receiver type.
    /// 3. First match wins.
    pub fn resolve(&self, context: &MethodCallContext, file: FileId) -> Option<&LibraryFunction> {
        for directive in self.directives_for_file(file) {
            if !directive.applies_to(&context.receiver_type) {
                continue;
            }
            // Selective directives can rename; map the call-site name to
            // the declared one (or skip the directive entirely).
            let Some(wanted) = directive.declared_name_for(&context.method_name) else {
                continue;
            };
            for function in self.functions_of(&directive.library_name) {
                if function.name == wanted
                    && type_accepts(&function.first_param_type, &context.receiver_type)
                {
                    trace!(
                        method = %context.method_name,
                        receiver_type = %context.receiver_type,
                        library = %function.library_name,
                        "resolved library method call"
                    );
                    return Some(function);
                }
            }
        }
        None
    }

    /// Every library function attachable to `type_name` in this file, in
    /// directive-then-declaration order.
    pub fn methods_for_type(&self, type_name: &str, file: FileId) -> Vec<&LibraryFunction> {
        let mut methods = Vec::new();
        for directive in self.directives_for_file(file) {
            if !directive.applies_to(type_name) {
                continue;
            }
            for function in self.functions_of(&directive.library_name) {
                let selected = directive.specific_functions.is_empty()
                    || directive
                        .specific_functions
                        .iter()
                        .any(|attached| attached.name == function.name);
                if selected && type_accepts(&function.first_param_type, type_name) {
                    methods.push(function);
                }
            }
        }
        methods
    }

    /// Find every call site across the project that resolves to
    /// `library_name::method_name`.
    ///
    /// Phase one parses any file not yet in the index (sequential, the
    /// guard makes it idempotent). Phase two scans the candidate files in
    /// parallel over read-only state; the final sort restores a
    /// deterministic order. A syntactic occurrence alone is not enough:
    /// the call site is kept only when resolution lands on the requested
    /// library.
    pub fn find_all_references(
        &mut self,
        method_name: &str,
        library_name: &str,
        project_files: &[(FileId, Arc<str>)],
    ) -> Vec<Location> {
        for (file, content) in project_files {
            self.parse_file(*file, content, None);
        }
        self.find_references_in(method_name, library_name, project_files)
    }

    /// The read-only scan phase of [`find_all_references`], usable on
    /// its own when every candidate file is already parsed.
    pub fn find_references_in(
        &self,
        method_name: &str,
        library_name: &str,
        project_files: &[(FileId, Arc<str>)],
    ) -> Vec<Location> {
        let call_re = match Regex::new(&format!(r"(\w+)\.{}\s*\(", regex::escape(method_name))) {
            Ok(re) => re,
            Err(error) => {
                debug!(%error, "invalid method name for reference search");
                return Vec::new();
            }
        };

        let index: &Self = self;
        let mut references: Vec<Location> = project_files
            .par_iter()
            .flat_map_iter(|(file, content)| {
                index.call_sites_in_file(*file, content, method_name, library_name, &call_re)
            })
            .collect();

        references.sort();
        references
    }

    fn call_sites_in_file(
        &self,
        file: FileId,
        content: &str,
        method_name: &str,
        library_name: &str,
        call_re: &Regex,
    ) -> Vec<Location> {
        let mut found = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            for captures in call_re.captures_iter(line) {
                let whole = match captures.get(0) {
                    Some(m) => m,
                    None => continue,
                };
                let receiver_name = &captures[1];

                let Some(receiver_type) = self.infer_variable_type(receiver_name, file, content)
                else {
                    continue;
                };

                let call_location = Location::new(
                    file,
                    Span::from_coords(line_num, whole.start(), line_num, whole.end()),
                );
                let context = MethodCallContext {
                    receiver_name: SmolStr::new(receiver_name),
                    receiver_type,
                    method_name: SmolStr::new(method_name),
                    call_location,
                };

                if let Some(resolved) = self.resolve(&context, file) {
                    if resolved.library_name == library_name {
                        found.push(call_location);
                    }
                }
            }
        }
        found
    }
}

/// First-parameter acceptance: wildcard, exact, or compatible.
fn type_accepts(first_param_type: &str, receiver_type: &str) -> bool {
    first_param_type == "*"
        || first_param_type == receiver_type
        || super::library::types_compatible(first_param_type, receiver_type)
}
