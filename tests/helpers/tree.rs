//! Small builders for external parse trees, standing in for the
//! grammar-generated parser adapter.

use solva::syntax::{ParseKind, ParseNode, ParseToken};

pub fn tok(line: usize, col: usize, text: &str) -> ParseToken {
    ParseToken::new(line, col, text)
}

pub fn node(kind: ParseKind, text: &str, start: ParseToken, end: ParseToken) -> ParseNode {
    ParseNode::new(kind, text, start, end)
}

pub fn leaf(kind: ParseKind, line: usize, col: usize, text: &str) -> ParseNode {
    ParseNode::new(kind, text, tok(line, col, text), tok(line, col, text))
}

pub fn ident(line: usize, col: usize, name: &str) -> ParseNode {
    leaf(ParseKind::Identifier, line, col, name)
}

pub fn type_name(line: usize, col: usize, text: &str) -> ParseNode {
    leaf(ParseKind::TypeName, line, col, text)
}

pub fn visibility(line: usize, col: usize, text: &str) -> ParseNode {
    leaf(ParseKind::Visibility, line, col, text)
}

pub fn mutability(line: usize, col: usize, text: &str) -> ParseNode {
    leaf(ParseKind::Mutability, line, col, text)
}

/// `TypeName [storage] Identifier` parameter node.
pub fn parameter(line: usize, col: usize, ty: &str, name: &str) -> ParseNode {
    let name_col = col + ty.len() + 1;
    node(
        ParseKind::Parameter,
        &format!("{ty} {name}"),
        tok(line, col, ty),
        tok(line, name_col, name),
    )
    .with_children(vec![type_name(line, col, ty), ident(line, name_col, name)])
}

pub fn return_parameter(line: usize, col: usize, ty: &str) -> ParseNode {
    node(ParseKind::ReturnParameter, ty, tok(line, col, ty), tok(line, col, ty))
        .with_children(vec![type_name(line, col, ty)])
}

/// An identifier-only expression.
pub fn ident_expr(line: usize, col: usize, name: &str) -> ParseNode {
    node(ParseKind::Expression, name, tok(line, col, name), tok(line, col, name))
        .with_children(vec![ident(line, col, name)])
}

/// A literal-only expression.
pub fn literal_expr(line: usize, col: usize, text: &str) -> ParseNode {
    node(ParseKind::Expression, text, tok(line, col, text), tok(line, col, text))
        .with_children(vec![leaf(ParseKind::Literal, line, col, text)])
}

/// A binary expression from two operand expressions.
pub fn binary_expr(op: &str, op_line: usize, op_col: usize, lhs: ParseNode, rhs: ParseNode) -> ParseNode {
    let start = lhs.start.clone();
    let end = rhs.end.clone();
    let text = format!("{} {} {}", lhs.text, op, rhs.text);
    node(ParseKind::Expression, &text, start, end).with_children(vec![
        lhs,
        leaf(ParseKind::Operator, op_line, op_col, op),
        rhs,
    ])
}

/// An opaque expression the AST does not model (member calls etc.).
pub fn opaque_expr(line: usize, col: usize, text: &str) -> ParseNode {
    node(ParseKind::Expression, text, tok(line, col, text), tok(line, col, text))
}

// ---------------------------------------------------------------------------
// declaration-level builders (synthetic but consistent coordinates)
// ---------------------------------------------------------------------------

pub fn state_var(
    line: usize,
    ty: &str,
    name: &str,
    vis: Option<&str>,
    initializer: Option<ParseNode>,
) -> ParseNode {
    let mut col = 4 + ty.len() + 1;
    let mut children = vec![type_name(line, 4, ty)];
    if let Some(vis_text) = vis {
        children.push(visibility(line, col, vis_text));
        col += vis_text.len() + 1;
    }
    children.push(ident(line, col, name));
    if let Some(init) = initializer {
        children.push(init);
    }
    node(
        ParseKind::StateVariable,
        &format!("{ty} {name};"),
        tok(line, 4, ty),
        tok(line, col + name.len(), ";"),
    )
    .with_children(children)
}

pub fn block(start_line: usize, end_line: usize, statements: Vec<ParseNode>) -> ParseNode {
    node(ParseKind::Block, "{ ... }", tok(start_line, 0, "{"), tok(end_line, 4, "}"))
        .with_children(statements)
}

pub fn return_stmt(line: usize, expr: ParseNode) -> ParseNode {
    node(
        ParseKind::ReturnStatement,
        &format!("return {};", expr.text),
        tok(line, 8, "return"),
        tok(line, 8 + 7 + expr.text.len(), ";"),
    )
    .with_children(vec![expr])
}

pub fn expr_stmt(line: usize, expr: ParseNode) -> ParseNode {
    let text = format!("{};", expr.text);
    let end = tok(line, 8 + expr.text.len(), ";");
    let start = expr.start.clone();
    node(ParseKind::ExpressionStatement, &text, start, end).with_children(vec![expr])
}

pub fn function_decl(
    start_line: usize,
    end_line: usize,
    name: &str,
    vis: Option<&str>,
    mutability_text: Option<&str>,
    params: Vec<ParseNode>,
    body: Option<ParseNode>,
) -> ParseNode {
    let mut children = vec![ident(start_line, 13, name)];
    children.extend(params);
    let mut col = 30;
    if let Some(vis_text) = vis {
        children.push(visibility(start_line, col, vis_text));
        col += vis_text.len() + 1;
    }
    if let Some(mut_text) = mutability_text {
        children.push(mutability(start_line, col, mut_text));
    }
    if let Some(body_node) = body {
        children.push(body_node);
    }
    node(
        ParseKind::Function,
        &format!("function {name}(...)"),
        tok(start_line, 4, "function"),
        tok(end_line, 4, "}"),
    )
    .with_children(children)
}

pub fn contract_decl(
    kind: ParseKind,
    start_line: usize,
    end_line: usize,
    name: &str,
    members: Vec<ParseNode>,
) -> ParseNode {
    let keyword = match kind {
        ParseKind::Interface => "interface",
        ParseKind::Library => "library",
        _ => "contract",
    };
    let mut children = vec![ident(start_line, keyword.len() + 1, name)];
    children.extend(members);
    node(
        kind,
        &format!("{keyword} {name} {{ ... }}"),
        tok(start_line, 0, keyword),
        tok(end_line, 0, "}"),
    )
    .with_children(children)
}

pub fn source_unit(end_line: usize, children: Vec<ParseNode>) -> ParseNode {
    node(
        ParseKind::SourceUnit,
        "",
        tok(1, 0, ""),
        tok(end_line, 0, "}"),
    )
    .with_children(children)
}
