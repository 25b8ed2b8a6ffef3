//! Diagnostic types, stable codes, and the per-file merge.

use smol_str::SmolStr;

use crate::base::{FileId, Location, Position, Span};

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to the editor-protocol severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub location: Location,
    pub severity: Severity,
    /// Stable code (e.g. "E0001").
    pub code: Option<SmolStr>,
    pub message: String,
    /// Which stage produced this ("parser", "semantic", or the external
    /// tool's own name).
    pub source: SmolStr,
}

impl Diagnostic {
    pub fn error(file: FileId, span: Span, message: impl Into<String>) -> Self {
        Self {
            location: Location::new(file, span),
            severity: Severity::Error,
            code: None,
            message: message.into(),
            source: SmolStr::new("semantic"),
        }
    }

    pub fn warning(file: FileId, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(file, span, message)
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(SmolStr::new_static(code));
        self
    }

    pub fn with_source(mut self, source: impl Into<SmolStr>) -> Self {
        self.source = source.into();
        self
    }
}

/// Stable diagnostic codes.
///
/// - **E00xx**: semantic errors
/// - **W00xx**: warnings
pub mod codes {
    /// A name defined twice in the same scope.
    pub const DUPLICATE_SYMBOL: &str = "E0001";
    /// Identifier that resolves to nothing.
    pub const UNDEFINED_IDENTIFIER: &str = "E0002";
    /// Initializer type incompatible with the declared type.
    pub const TYPE_MISMATCH: &str = "E0003";
    /// `pure` function reading state, or `view` function modifying it.
    pub const MUTABILITY_VIOLATION: &str = "E0004";
    /// Function without an explicit visibility.
    pub const MISSING_VISIBILITY: &str = "W0001";
}

/// Collects diagnostics during analysis.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn duplicate_symbol(&mut self, file: FileId, span: Span, name: &str) {
        self.add(
            Diagnostic::error(file, span, format!("'{name}' is already defined in this scope"))
                .with_code(codes::DUPLICATE_SYMBOL),
        );
    }

    pub fn undefined_identifier(&mut self, file: FileId, span: Span, name: &str) {
        self.add(
            Diagnostic::error(file, span, format!("undefined identifier '{name}'"))
                .with_code(codes::UNDEFINED_IDENTIFIER),
        );
    }

    pub fn type_mismatch(&mut self, file: FileId, span: Span, expected: &str, found: &str) {
        self.add(
            Diagnostic::error(
                file,
                span,
                format!("type mismatch: expected {expected}, got {found}"),
            )
            .with_code(codes::TYPE_MISMATCH),
        );
    }

    pub fn mutability_violation(&mut self, file: FileId, span: Span, message: impl Into<String>) {
        self.add(Diagnostic::error(file, span, message).with_code(codes::MUTABILITY_VIOLATION));
    }

    pub fn missing_visibility(&mut self, file: FileId, span: Span, name: &str) {
        self.add(
            Diagnostic::warning(file, span, format!("function '{name}' must specify visibility"))
                .with_code(codes::MISSING_VISIBILITY),
        );
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A record from the external build/lint tool, already normalized by the
/// excluded integration layer. The engine merges these; it never parses
/// tool output itself.
#[derive(Clone, Debug)]
pub struct ExternalDiagnostic {
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
    pub code: Option<SmolStr>,
    pub source: SmolStr,
    pub help_url: Option<String>,
}

impl ExternalDiagnostic {
    /// Convert into an engine diagnostic once the host has mapped the
    /// tool's file path to a `FileId`.
    pub fn into_diagnostic(self, file: FileId) -> Diagnostic {
        let position = Position::new(self.line, self.column);
        let message = match &self.help_url {
            Some(url) => format!("{} ({url})", self.message),
            None => self.message,
        };
        Diagnostic {
            location: Location::new(file, Span::new(position, position)),
            severity: self.severity,
            code: self.code,
            message,
            source: self.source,
        }
    }
}

/// Merge the diagnostics for one file: syntax errors first (from the
/// parser's error listener), then the analyzer's, then the external
/// tool's, each group keeping its original order.
pub fn merge_diagnostics(
    syntax: Vec<Diagnostic>,
    semantic: Vec<Diagnostic>,
    external: Vec<Diagnostic>,
) -> Vec<Diagnostic> {
    let mut merged = syntax;
    merged.extend(semantic);
    merged.extend(external);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(message: &str) -> Diagnostic {
        Diagnostic::error(FileId::new(0), Span::from_coords(0, 0, 0, 1), message)
    }

    #[test]
    fn test_merge_preserves_group_order() {
        let merged = merge_diagnostics(
            vec![diag("syntax 1"), diag("syntax 2")],
            vec![diag("semantic 1")],
            vec![diag("lint 1"), diag("lint 2")],
        );
        let messages: Vec<_> = merged.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["syntax 1", "syntax 2", "semantic 1", "lint 1", "lint 2"]
        );
    }

    #[test]
    fn test_severity_to_lsp() {
        assert_eq!(Severity::Error.to_lsp(), 1);
        assert_eq!(Severity::Warning.to_lsp(), 2);
        assert_eq!(Severity::Info.to_lsp(), 3);
        assert_eq!(Severity::Hint.to_lsp(), 4);
    }

    #[test]
    fn test_external_record_conversion() {
        let record = ExternalDiagnostic {
            file_path: "src/Token.sol".into(),
            line: 7,
            column: 2,
            message: "unused import".into(),
            severity: Severity::Info,
            code: Some(SmolStr::new("unused-import")),
            source: SmolStr::new("forge-lint"),
            help_url: Some("https://example.org/lints#unused-import".into()),
        };
        let diag = record.into_diagnostic(FileId::new(4));
        assert_eq!(diag.location.file, FileId::new(4));
        assert_eq!(diag.location.span.start.line, 7);
        assert_eq!(diag.source, "forge-lint");
        assert!(diag.message.contains("https://example.org"));
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.add(diag("a"));
        collector.add(Diagnostic::warning(
            FileId::new(0),
            Span::from_coords(0, 0, 0, 1),
            "b",
        ));
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
    }
}
