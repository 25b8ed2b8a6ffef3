//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod tree;

use solva::FileId;
use solva::ide::AnalysisHost;

/// Build a host from `(path, text)` pairs; text-only (no parse trees).
pub fn host_from_sources(sources: &[(&str, &str)]) -> (AnalysisHost, Vec<FileId>) {
    let mut host = AnalysisHost::new();
    let files = sources
        .iter()
        .map(|(path, text)| host.set_file_content(path, *text))
        .collect();
    (host, files)
}
