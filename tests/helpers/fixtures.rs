//! Source fixtures and their parse trees.
//!
//! The trees mirror what the external grammar adapter would hand the
//! engine for the same source text: 1-based token lines, 0-based columns.

use solva::FileId;
use solva::ide::AnalysisHost;
use solva::syntax::{ParseKind, ParseNode};

use super::tree::*;

// ---------------------------------------------------------------------------
// MathUtils / Calculator
// ---------------------------------------------------------------------------

pub const MATH_UTILS_SOURCE: &str = "\
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

pub fn math_utils_tree() -> ParseNode {
    let square = node(
        ParseKind::Function,
        "function square(uint256 self) internal pure returns (uint256) { return self * self; }",
        tok(2, 4, "function"),
        tok(4, 4, "}"),
    )
    .with_children(vec![
        ident(2, 13, "square"),
        parameter(2, 20, "uint256", "self"),
        visibility(2, 34, "internal"),
        mutability(2, 43, "pure"),
        return_parameter(2, 57, "uint256"),
        node(ParseKind::Block, "{ return self * self; }", tok(2, 66, "{"), tok(4, 4, "}"))
            .with_children(vec![
                node(
                    ParseKind::ReturnStatement,
                    "return self * self;",
                    tok(3, 8, "return"),
                    tok(3, 26, ";"),
                )
                .with_children(vec![binary_expr(
                    "*",
                    3,
                    20,
                    ident_expr(3, 15, "self"),
                    ident_expr(3, 22, "self"),
                )]),
            ]),
    ]);

    let library = node(
        ParseKind::Library,
        "library MathUtils { ... }",
        tok(1, 0, "library"),
        tok(5, 0, "}"),
    )
    .with_children(vec![ident(1, 8, "MathUtils"), square]);

    let using = node(
        ParseKind::Using,
        "using MathUtils for uint256;",
        tok(8, 4, "using"),
        tok(8, 31, ";"),
    )
    .with_children(vec![ident(8, 10, "MathUtils"), type_name(8, 24, "uint256")]);

    let state_var = node(
        ParseKind::StateVariable,
        "uint256 public n = 5;",
        tok(9, 4, "uint256"),
        tok(9, 24, ";"),
    )
    .with_children(vec![
        type_name(9, 4, "uint256"),
        visibility(9, 12, "public"),
        ident(9, 19, "n"),
        literal_expr(9, 23, "5"),
    ]);

    let f = node(
        ParseKind::Function,
        "function f() public view returns (uint256) { return n.square(); }",
        tok(11, 4, "function"),
        tok(13, 4, "}"),
    )
    .with_children(vec![
        ident(11, 13, "f"),
        visibility(11, 17, "public"),
        mutability(11, 24, "view"),
        return_parameter(11, 38, "uint256"),
        node(ParseKind::Block, "{ return n.square(); }", tok(11, 47, "{"), tok(13, 4, "}"))
            .with_children(vec![
                node(
                    ParseKind::ReturnStatement,
                    "return n.square();",
                    tok(12, 8, "return"),
                    tok(12, 25, ";"),
                )
                .with_children(vec![opaque_expr(12, 15, "n.square()")]),
            ]),
    ]);

    let contract = node(
        ParseKind::Contract,
        "contract Calculator { ... }",
        tok(7, 0, "contract"),
        tok(14, 0, "}"),
    )
    .with_children(vec![ident(7, 9, "Calculator"), using, state_var, f]);

    node(
        ParseKind::SourceUnit,
        MATH_UTILS_SOURCE,
        tok(1, 0, "library"),
        tok(14, 0, "}"),
    )
    .with_children(vec![library, contract])
}

/// Host with the MathUtils fixture fully loaded: text plus parse tree.
pub fn math_utils_host() -> (AnalysisHost, FileId) {
    let mut host = AnalysisHost::new();
    let file = host.set_file_content("MathUtils.sol", MATH_UTILS_SOURCE);
    let tree = math_utils_tree();
    host.set_parse_tree(file, Some(&tree));
    (host, file)
}

// ---------------------------------------------------------------------------
// IERC20 / Token (interface + implementation)
// ---------------------------------------------------------------------------

pub const TOKEN_SOURCE: &str = "\
interface IERC20 {
    function transfer(address to) external;
}

contract Token is IERC20 {
    function transfer(address to) public {}
}
";

pub fn token_tree() -> ParseNode {
    let declaration = node(
        ParseKind::Function,
        "function transfer(address to) external;",
        tok(2, 4, "function"),
        tok(2, 42, ";"),
    )
    .with_children(vec![
        ident(2, 13, "transfer"),
        parameter(2, 22, "address", "to"),
        visibility(2, 34, "external"),
    ]);

    let interface = node(
        ParseKind::Interface,
        "interface IERC20 { ... }",
        tok(1, 0, "interface"),
        tok(3, 0, "}"),
    )
    .with_children(vec![ident(1, 10, "IERC20"), declaration]);

    let implementation = node(
        ParseKind::Function,
        "function transfer(address to) public {}",
        tok(6, 4, "function"),
        tok(6, 42, "}"),
    )
    .with_children(vec![
        ident(6, 13, "transfer"),
        parameter(6, 22, "address", "to"),
        visibility(6, 34, "public"),
        node(ParseKind::Block, "{}", tok(6, 41, "{"), tok(6, 42, "}")),
    ]);

    let contract = node(
        ParseKind::Contract,
        "contract Token is IERC20 { ... }",
        tok(5, 0, "contract"),
        tok(7, 0, "}"),
    )
    .with_children(vec![
        ident(5, 9, "Token"),
        leaf(ParseKind::InheritanceSpecifier, 5, 18, "IERC20"),
        implementation,
    ]);

    node(
        ParseKind::SourceUnit,
        TOKEN_SOURCE,
        tok(1, 0, "interface"),
        tok(7, 0, "}"),
    )
    .with_children(vec![interface, contract])
}

pub fn token_host() -> (AnalysisHost, FileId) {
    let mut host = AnalysisHost::new();
    let file = host.set_file_content("Token.sol", TOKEN_SOURCE);
    let tree = token_tree();
    host.set_parse_tree(file, Some(&tree));
    (host, file)
}
