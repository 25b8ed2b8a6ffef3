//! Find-references.
//!
//! The interesting case is a library function: the same function may be
//! invoked directly (`Lib.fn(x)`) or through an attached receiver
//! (`x.fn()`), so both searches run and their results are unioned.
//! Results are deduplicated and sorted by `(file, line, column)`.

use regex::Regex;
use tracing::trace;

use super::analysis::Analysis;
use super::classify::{PositionContext, classify};
use super::goto;
use crate::base::{FileId, Location, Position, Span};
use crate::resolver::MethodCallContext;

pub(crate) fn find_references(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
    include_declaration: bool,
) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };
    let context = classify(&doc.text, position, file, analysis.lib_index());

    let mut references = match &context {
        Some(PositionContext::LibraryMethodCall {
            word,
            word_span,
            receiver_name,
            receiver_type,
        }) => {
            // Resolve first so the search is pinned to one library.
            let call = MethodCallContext {
                receiver_name: receiver_name.clone(),
                receiver_type: receiver_type.clone(),
                method_name: word.clone(),
                call_location: Location::new(file, *word_span),
            };
            match analysis.lib_index().resolve(&call, file) {
                Some(function) => {
                    let library = function.library_name.clone();
                    analysis
                        .lib_index()
                        .find_references_in(word, &library, analysis.project_texts())
                }
                None => Vec::new(),
            }
        }
        Some(PositionContext::Identifier { word, .. })
            if analysis.lib_index().is_library_function(word) =>
        {
            // The cursor is on a library function name itself: union
            // direct call sites with attached call sites.
            let mut found = Vec::new();
            for library in analysis.lib_index().libraries_defining(word) {
                found.extend(direct_call_sites(analysis, &library, word));
                found.extend(analysis.lib_index().find_references_in(
                    word,
                    &library,
                    analysis.project_texts(),
                ));
            }
            trace!(function = %word, count = found.len(), "library function references");
            found
        }
        Some(PositionContext::Identifier { word, .. }) => {
            identifier_occurrences(file, &doc.text, word)
        }
        _ => Vec::new(),
    };

    if include_declaration {
        references.extend(goto::definitions(analysis, file, position));
    }

    dedup_and_sort(references)
}

/// Textual `Lib.fn(` call sites across the project.
fn direct_call_sites(analysis: &Analysis<'_>, library: &str, function: &str) -> Vec<Location> {
    let Ok(re) = Regex::new(&format!(
        r"\b{}\s*\.\s*{}\s*\(",
        regex::escape(library),
        regex::escape(function)
    )) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for (file, text) in analysis.project_texts() {
        for (line_num, line) in text.lines().enumerate() {
            for m in re.find_iter(line) {
                results.push(Location::new(
                    *file,
                    Span::from_coords(line_num, m.start(), line_num, m.end()),
                ));
            }
        }
    }
    results
}

/// Word-boundary occurrences of a plain identifier in one document.
fn identifier_occurrences(file: FileId, content: &str, word: &str) -> Vec<Location> {
    let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(word))) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        for m in re.find_iter(line) {
            results.push(Location::new(
                file,
                Span::from_coords(line_num, m.start(), line_num, m.end()),
            ));
        }
    }
    results
}

/// Deduplicate by `(file, line, column)` and sort the same way.
pub(crate) fn dedup_and_sort(mut locations: Vec<Location>) -> Vec<Location> {
    locations.sort();
    locations.dedup_by_key(|location| location.sort_key());
    locations
}
