//! End-to-end: parse tree in, navigation and diagnostics out.

mod helpers;

use helpers::fixtures::{MATH_UTILS_SOURCE, math_utils_host};
use solva::base::{Location, Position, Span};
use solva::semantic::codes;

#[test]
fn test_definition_of_attached_call_lands_on_library_declaration() {
    let (mut host, file) = math_utils_host();
    let analysis = host.analysis();

    // Cursor on `square` in `n.square()` (line 12 of the fixture).
    let definitions = analysis.definitions(file, Position::new(11, 17));

    // Exactly one location: the `square` declaration inside MathUtils.
    let expected = Location::new(file, Span::from_coords(1, 4, 3, 5));
    assert_eq!(definitions, vec![expected]);
}

#[test]
fn test_fixture_has_no_duplicate_or_undefined_diagnostics() {
    let (mut host, file) = math_utils_host();
    let analysis = host.analysis();

    let diagnostics = analysis.diagnostics(file);

    assert!(
        diagnostics
            .iter()
            .all(|d| d.code.as_deref() != Some(codes::DUPLICATE_SYMBOL)),
        "unexpected duplicate-symbol diagnostics: {diagnostics:?}"
    );
    assert!(
        diagnostics
            .iter()
            .all(|d| d.code.as_deref() != Some(codes::UNDEFINED_IDENTIFIER)),
        "unexpected undefined-identifier diagnostics: {diagnostics:?}"
    );
}

#[test]
fn test_fixture_is_fully_clean() {
    let (mut host, file) = math_utils_host();
    let analysis = host.analysis();
    let diagnostics = analysis.diagnostics(file);
    assert!(diagnostics.is_empty(), "got: {diagnostics:?}");
}

#[test]
fn test_references_of_attached_call() {
    let (mut host, file) = math_utils_host();
    let analysis = host.analysis();

    let without_declaration = analysis.find_references(file, Position::new(11, 17), false);
    assert_eq!(without_declaration.len(), 1);
    assert_eq!(without_declaration[0].span.start, Position::new(11, 15));

    let with_declaration = analysis.find_references(file, Position::new(11, 17), true);
    assert_eq!(with_declaration.len(), 2);
    // Sorted: declaration (line 1) before the call site (line 11).
    assert_eq!(with_declaration[0].span.start.line, 1);
    assert_eq!(with_declaration[1].span.start.line, 11);
}

#[test]
fn test_queries_are_stable_across_snapshots() {
    let (mut host, file) = math_utils_host();

    let first = host
        .analysis()
        .find_references(file, Position::new(11, 17), true);
    let second = host
        .analysis()
        .find_references(file, Position::new(11, 17), true);

    // No duplicate cache entries across snapshots of the same
    // generation.
    assert_eq!(first, second);
}

#[test]
fn test_edit_starts_a_new_generation() {
    let (mut host, file) = math_utils_host();

    {
        let analysis = host.analysis();
        assert_eq!(
            analysis.definitions(file, Position::new(11, 17)).len(),
            1
        );
    }

    // Replace the file with content that no longer declares the library.
    host.set_file_content("MathUtils.sol", "contract Empty {}\n");
    let analysis = host.analysis();

    // Stale library info must not survive the edit.
    assert!(analysis.definitions(file, Position::new(11, 17)).is_empty());
    assert!(analysis.diagnostics(file).is_empty());

    // And restoring the original content brings resolution back.
    host.set_file_content("MathUtils.sol", MATH_UTILS_SOURCE);
    let analysis = host.analysis();
    assert_eq!(analysis.definitions(file, Position::new(11, 17)).len(), 1);
}
