//! Navigation-provider tests: classification routing, definitions,
//! declarations, implementations, references.

mod helpers;

use helpers::fixtures;
use helpers::host_from_sources;
use solva::base::{Location, Position, Span};
use solva::FileId;
use solva::project::ImportResolver;

const CALCULATOR: &str = "\
library MathUtils {
    function square(uint256 self) internal pure returns (uint256) {
        return self * self;
    }
}

contract Calculator {
    using MathUtils for uint256;
    uint256 public n = 5;

    function f() public view returns (uint256) {
        return n.square();
    }
}
";

#[test]
fn test_definition_of_library_method_call() {
    let (mut host, files) = host_from_sources(&[("Calculator.sol", CALCULATOR)]);
    let analysis = host.analysis();

    // Cursor on `square` in `n.square()` (line 12, col 17).
    let definitions = analysis.definitions(files[0], Position::new(11, 17));

    assert_eq!(definitions.len(), 1);
    // The text scan anchors the definition at `function square`.
    assert_eq!(definitions[0].span.start, solva::Position::new(1, 4));
}

#[test]
fn test_direct_method_call_through_this() {
    let source = "\
contract C {
    function f() public {
        this.g();
    }
    function g() public {}
}
";
    let (mut host, files) = host_from_sources(&[("C.sol", source)]);
    let analysis = host.analysis();

    // Cursor on `g` in `this.g()` (line 2, col 13).
    let definitions = analysis.definitions(files[0], Position::new(2, 13));

    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].span.start.line, 4);
}

#[test]
fn test_builtin_type_has_no_definition() {
    let (mut host, files) = host_from_sources(&[("Calculator.sol", CALCULATOR)]);
    let analysis = host.analysis();

    // Cursor on `uint256` in the state variable declaration (line 8).
    let definitions = analysis.definitions(files[0], Position::new(8, 6));
    assert!(definitions.is_empty());
}

#[test]
fn test_custom_type_resolves_to_declaration() {
    let source = "\
struct Point {
    uint256 x;
}

contract Board {
    Point public origin;
}
";
    let (mut host, files) = host_from_sources(&[("Board.sol", source)]);
    let analysis = host.analysis();

    // Cursor on `Point` in `Point public origin;` (line 5, col 5).
    let definitions = analysis.definitions(files[0], Position::new(5, 5));

    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].span.start.line, 0);
}

#[test]
fn test_import_path_without_resolver_is_empty() {
    let source = "import \"./MathUtils.sol\";\n";
    let (mut host, files) = host_from_sources(&[("App.sol", source)]);
    let analysis = host.analysis();

    let definitions = analysis.definitions(files[0], Position::new(0, 12));
    assert!(definitions.is_empty());
}

#[test]
fn test_import_path_with_resolver() {
    struct Fixed(Location);
    impl ImportResolver for Fixed {
        fn resolve_import(&self, _path: &str, _from: FileId) -> Option<Location> {
            Some(self.0)
        }
    }

    let target = Location::new(FileId::new(7), Span::from_coords(0, 0, 0, 1));
    let source = "import \"./MathUtils.sol\";\n";
    let (mut host, files) = host_from_sources(&[("App.sol", source)]);
    host.set_import_resolver(Box::new(Fixed(target)));

    let analysis = host.analysis();
    let definitions = analysis.definitions(files[0], Position::new(0, 12));
    assert_eq!(definitions, vec![target]);
}

#[test]
fn test_identifier_resolves_variable_first() {
    let source = "\
contract Registry {
    address public owner;

    function touch() public {
        emit Touched(owner);
    }
}
";
    let (mut host, files) = host_from_sources(&[("Registry.sol", source)]);
    let analysis = host.analysis();

    // Cursor on `owner` in the emit argument (line 4, col 22).
    let definitions = analysis.definitions(files[0], Position::new(4, 22));

    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].span.start.line, 1);
}

#[test]
fn test_references_for_library_function_name_union() {
    let library_file = "\
library MathUtils {
    function square(uint256 self) internal pure returns (uint256) {
        return self * self;
    }
}
";
    let caller_file = "\
contract A {
    using MathUtils for uint256;
    uint256 public x;

    function attached() public view returns (uint256) {
        return x.square();
    }

    function direct() public pure returns (uint256) {
        return MathUtils.square(4);
    }
}
";
    let (mut host, files) =
        host_from_sources(&[("MathUtils.sol", library_file), ("A.sol", caller_file)]);
    let analysis = host.analysis();

    // Cursor on `square` in the library declaration itself (file 0,
    // line 1, col 13).
    let references = analysis.find_references(files[0], Position::new(1, 14), false);

    // Both invocation styles are found: the attached call `x.square()`
    // and the direct call `MathUtils.square(4)`.
    assert_eq!(references.len(), 2);
    assert!(references.iter().all(|r| r.file == files[1]));
    let lines: Vec<usize> = references.iter().map(|r| r.span.start.line).collect();
    assert_eq!(lines, vec![5, 9]);
}

#[test]
fn test_references_are_deduplicated_and_sorted() {
    let (mut host, files) = host_from_sources(&[("Calculator.sol", CALCULATOR)]);
    let analysis = host.analysis();

    let references = analysis.find_references(files[0], Position::new(11, 17), true);

    let mut sorted = references.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(references, sorted);
}

#[test]
fn test_queries_off_document_are_empty() {
    let (mut host, files) = host_from_sources(&[("Calculator.sol", CALCULATOR)]);
    let analysis = host.analysis();

    let position = Position::new(999, 0);
    assert!(analysis.definitions(files[0], position).is_empty());
    assert!(analysis.declarations(files[0], position).is_empty());
    assert!(analysis.type_definitions(files[0], position).is_empty());
    assert!(analysis.implementations(files[0], position).is_empty());
    assert!(analysis.find_references(files[0], position, true).is_empty());
}

#[test]
fn test_declarations_include_interface_member() {
    let (mut host, file) = fixtures::token_host();
    let analysis = host.analysis();

    // Cursor on `transfer` in the implementing contract (line 5, col 13).
    let declarations = analysis.declarations(file, Position::new(5, 15));

    // The interface declaration at line 1 is included.
    assert!(
        declarations.iter().any(|d| d.span.start.line == 1),
        "expected the IERC20.transfer declaration, got: {declarations:?}"
    );
}

#[test]
fn test_implementations_of_interface() {
    let (mut host, file) = fixtures::token_host();
    let analysis = host.analysis();

    // Cursor on `IERC20` in `interface IERC20` (line 0, col 11).
    let implementations = analysis.implementations(file, Position::new(0, 11));

    assert_eq!(implementations.len(), 1);
    assert_eq!(implementations[0].span.start.line, 4);
}

#[test]
fn test_implementations_of_interface_function() {
    let (mut host, file) = fixtures::token_host();
    let analysis = host.analysis();

    // Cursor on `transfer` in the interface declaration (line 1, col 13).
    let implementations = analysis.implementations(file, Position::new(1, 15));

    assert_eq!(implementations.len(), 1);
    assert_eq!(implementations[0].span.start.line, 5);
}
