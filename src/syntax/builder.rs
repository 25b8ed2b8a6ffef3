//! Parse tree → AST conversion.
//!
//! One structural pass: every recognized production becomes the matching
//! AST variant, container nodes thread their children into typed
//! sub-lists, and unrecognized productions are skipped without failing
//! the file. The builder makes no semantic decisions.

use smol_str::SmolStr;

use super::ast::{
    ContractData, ContractKind, ExprKind, FunctionData, FunctionKind, NodeData, NodeId,
    ParameterData, SourceUnit, StateMutability, StmtKind, StorageLocation, UsingData, VariableData,
    Visibility,
};
use super::parse_tree::{ParseKind, ParseNode};
use crate::base::{FileId, Span};

/// Build the AST for one file.
///
/// Returns an empty [`SourceUnit`] when no parse tree is available;
/// malformed-but-parseable trees degrade to partial ASTs.
pub fn build(tree: Option<&ParseNode>, file: FileId) -> SourceUnit {
    let mut unit = SourceUnit::empty(file);
    let Some(tree) = tree else {
        return unit;
    };

    unit.node_mut(NodeId::new(0)).span = span_of(tree);
    let root = unit.root();
    for child in &tree.children {
        build_top_level(&mut unit, root, child);
    }
    unit
}

/// Convert the external 1-based-line tokens to a 0-based span.
fn span_of(node: &ParseNode) -> Span {
    let start_line = node.start.line.saturating_sub(1);
    let end_line = node.end.line.saturating_sub(1);
    let end_col = node.end.column + node.end.text.chars().count();
    Span::from_coords(start_line, node.start.column, end_line, end_col)
}

fn identifier_text(node: &ParseNode) -> Option<SmolStr> {
    node.child(ParseKind::Identifier).map(|c| c.text.clone())
}

fn build_top_level(unit: &mut SourceUnit, root: NodeId, node: &ParseNode) {
    match node.kind {
        ParseKind::Pragma => {
            let id = build_pragma(unit, node);
            unit.add_child(root, id);
            if let NodeData::Unit(data) = &mut unit.node_mut(root).data {
                data.pragmas.push(id);
            }
        }
        ParseKind::Import => {
            let id = build_import(unit, node);
            unit.add_child(root, id);
            if let NodeData::Unit(data) = &mut unit.node_mut(root).data {
                data.imports.push(id);
            }
        }
        ParseKind::Contract | ParseKind::Interface | ParseKind::Library => {
            let id = build_contract(unit, node);
            unit.add_child(root, id);
            if let NodeData::Unit(data) = &mut unit.node_mut(root).data {
                data.contracts.push(id);
            }
        }
        ParseKind::Using => {
            let id = build_using(unit, node);
            unit.add_child(root, id);
            if let NodeData::Unit(data) = &mut unit.node_mut(root).data {
                data.using_directives.push(id);
            }
        }
        // Unknown production: skip, degrade to a partial tree.
        _ => {}
    }
}

fn build_pragma(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let name = node
        .child(ParseKind::PragmaName)
        .map(|c| c.text.clone())
        .unwrap_or_default();
    let value = node
        .child(ParseKind::PragmaValue)
        .map(|c| c.text.clone())
        .unwrap_or_default();
    unit.alloc(span_of(node), NodeData::Pragma { name, value })
}

fn build_import(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let path = node
        .child(ParseKind::ImportPath)
        .map(|c| SmolStr::new(c.text.trim_matches(|q| q == '"' || q == '\'')))
        .unwrap_or_default();
    let symbols = node
        .children_of(ParseKind::Identifier)
        .map(|c| c.text.clone())
        .collect();
    let alias = node.child(ParseKind::ImportAlias).map(|c| c.text.clone());
    unit.alloc(
        span_of(node),
        NodeData::Import {
            path,
            symbols,
            alias,
        },
    )
}

fn build_contract(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let kind = match node.kind {
        ParseKind::Interface => ContractKind::Interface,
        ParseKind::Library => ContractKind::Library,
        _ => ContractKind::Contract,
    };
    let mut data = ContractData::new(identifier_text(node).unwrap_or_default(), kind);
    data.inheritance = node
        .children_of(ParseKind::InheritanceSpecifier)
        .map(|c| c.text.clone())
        .collect();

    let id = unit.alloc(span_of(node), NodeData::Contract(data));

    for child in &node.children {
        let built = match child.kind {
            ParseKind::Function
            | ParseKind::Constructor
            | ParseKind::Fallback
            | ParseKind::Receive => Some((build_function(unit, child), Member::Function)),
            ParseKind::StateVariable => Some((build_variable(unit, child, true), Member::Variable)),
            ParseKind::Struct => Some((build_struct(unit, child), Member::Struct)),
            ParseKind::Enum => Some((build_enum(unit, child), Member::Enum)),
            ParseKind::Event => Some((build_event(unit, child), Member::Event)),
            ParseKind::Modifier => Some((build_modifier(unit, child), Member::Modifier)),
            ParseKind::Using => Some((build_using(unit, child), Member::Using)),
            _ => None,
        };
        if let Some((member_id, member)) = built {
            unit.add_child(id, member_id);
            if let NodeData::Contract(data) = &mut unit.node_mut(id).data {
                match member {
                    Member::Function => data.functions.push(member_id),
                    Member::Variable => data.variables.push(member_id),
                    Member::Struct => data.structs.push(member_id),
                    Member::Enum => data.enums.push(member_id),
                    Member::Event => data.events.push(member_id),
                    Member::Modifier => data.modifiers.push(member_id),
                    Member::Using => data.using_directives.push(member_id),
                }
            }
        }
    }

    id
}

enum Member {
    Function,
    Variable,
    Struct,
    Enum,
    Event,
    Modifier,
    Using,
}

fn build_function(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let (kind, name) = match node.kind {
        ParseKind::Constructor => (FunctionKind::Constructor, SmolStr::new("constructor")),
        ParseKind::Fallback => (FunctionKind::Fallback, SmolStr::new("fallback")),
        ParseKind::Receive => (FunctionKind::Receive, SmolStr::new("receive")),
        _ => (
            FunctionKind::Regular,
            identifier_text(node).unwrap_or_default(),
        ),
    };

    let visibility = node
        .child(ParseKind::Visibility)
        .and_then(|c| Visibility::parse(&c.text));
    let mutability = node
        .child(ParseKind::Mutability)
        .map(|c| StateMutability::parse(&c.text));
    let modifiers = node
        .children_of(ParseKind::ModifierInvocation)
        .map(|c| c.text.clone())
        .collect();

    let id = unit.alloc(
        span_of(node),
        NodeData::Function(FunctionData {
            name,
            kind,
            visibility,
            mutability,
            modifiers,
            parameters: Vec::new(),
            returns: Vec::new(),
            body: None,
        }),
    );

    for child in &node.children {
        match child.kind {
            ParseKind::Parameter => {
                let param = build_parameter(unit, child);
                unit.add_child(id, param);
                if let NodeData::Function(data) = &mut unit.node_mut(id).data {
                    data.parameters.push(param);
                }
            }
            ParseKind::ReturnParameter => {
                let param = build_parameter(unit, child);
                unit.add_child(id, param);
                if let NodeData::Function(data) = &mut unit.node_mut(id).data {
                    data.returns.push(param);
                }
            }
            ParseKind::Block => {
                let body = build_statement(unit, child);
                unit.add_child(id, body);
                if let NodeData::Function(data) = &mut unit.node_mut(id).data {
                    data.body = Some(body);
                }
            }
            _ => {}
        }
    }

    id
}

fn build_modifier(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let id = unit.alloc(
        span_of(node),
        NodeData::Modifier {
            name: identifier_text(node).unwrap_or_default(),
            parameters: Vec::new(),
            body: None,
        },
    );
    for child in &node.children {
        match child.kind {
            ParseKind::Parameter => {
                let param = build_parameter(unit, child);
                unit.add_child(id, param);
                if let NodeData::Modifier { parameters, .. } = &mut unit.node_mut(id).data {
                    parameters.push(param);
                }
            }
            ParseKind::Block => {
                let block = build_statement(unit, child);
                unit.add_child(id, block);
                if let NodeData::Modifier { body, .. } = &mut unit.node_mut(id).data {
                    *body = Some(block);
                }
            }
            _ => {}
        }
    }
    id
}

fn build_event(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let anonymous = node.text.contains("anonymous");
    let id = unit.alloc(
        span_of(node),
        NodeData::Event {
            name: identifier_text(node).unwrap_or_default(),
            parameters: Vec::new(),
            anonymous,
        },
    );
    for child in node.children_of(ParseKind::EventParameter) {
        let param = build_parameter(unit, child);
        unit.add_child(id, param);
        if let NodeData::Event { parameters, .. } = &mut unit.node_mut(id).data {
            parameters.push(param);
        }
    }
    id
}

fn build_struct(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let id = unit.alloc(
        span_of(node),
        NodeData::Struct {
            name: identifier_text(node).unwrap_or_default(),
            members: Vec::new(),
        },
    );
    for child in node.children_of(ParseKind::VariableDeclaration) {
        let member = build_variable(unit, child, false);
        unit.add_child(id, member);
        if let NodeData::Struct { members, .. } = &mut unit.node_mut(id).data {
            members.push(member);
        }
    }
    id
}

fn build_enum(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let variants = node
        .children_of(ParseKind::EnumValue)
        .map(|c| c.text.clone())
        .collect();
    unit.alloc(
        span_of(node),
        NodeData::Enum {
            name: identifier_text(node).unwrap_or_default(),
            variants,
        },
    )
}

fn build_variable(unit: &mut SourceUnit, node: &ParseNode, is_state: bool) -> NodeId {
    let type_name = node
        .child(ParseKind::TypeName)
        .map(|c| c.text.clone())
        .unwrap_or_default();
    let visibility = node
        .child(ParseKind::Visibility)
        .and_then(|c| Visibility::parse(&c.text));

    let id = unit.alloc(
        span_of(node),
        NodeData::Variable(VariableData {
            name: identifier_text(node).unwrap_or_default(),
            type_name,
            visibility,
            is_constant: node.has(ParseKind::ConstantKeyword),
            is_immutable: node.has(ParseKind::ImmutableKeyword),
            is_state,
            initializer: None,
        }),
    );

    if let Some(init) = node.child(ParseKind::Expression) {
        let expr = build_expression(unit, init);
        unit.add_child(id, expr);
        if let NodeData::Variable(data) = &mut unit.node_mut(id).data {
            data.initializer = Some(expr);
        }
    }

    id
}

fn build_parameter(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let type_name = node
        .child(ParseKind::TypeName)
        .map(|c| c.text.clone())
        .unwrap_or_default();
    let storage = node
        .child(ParseKind::StorageLocation)
        .and_then(|c| StorageLocation::parse(&c.text));
    unit.alloc(
        span_of(node),
        NodeData::Parameter(ParameterData {
            name: identifier_text(node).unwrap_or_default(),
            type_name,
            storage,
            is_indexed: node.has(ParseKind::IndexedKeyword),
        }),
    )
}

fn build_using(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let library = identifier_text(node).unwrap_or_default();
    // An absent type name is the wildcard form (`using L for *`).
    let target_type = node
        .child(ParseKind::TypeName)
        .map(|c| c.text.clone())
        .unwrap_or_else(|| SmolStr::new("*"));
    let functions = node
        .children_of(ParseKind::UsingFunction)
        .map(|c| c.text.clone())
        .collect();
    unit.alloc(
        span_of(node),
        NodeData::Using(UsingData {
            library,
            target_type,
            is_global: node.has(ParseKind::GlobalKeyword),
            functions,
        }),
    )
}

fn build_expression(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    // identifier / literal / binary; anything else is opaque.
    if let Some(ident) = node.child(ParseKind::Identifier) {
        if node.children.len() == 1 {
            return unit.alloc(
                span_of(node),
                NodeData::Expression(ExprKind::Identifier(ident.text.clone())),
            );
        }
    }
    if let Some(literal) = node.child(ParseKind::Literal) {
        if node.children.len() == 1 {
            return unit.alloc(
                span_of(node),
                NodeData::Expression(ExprKind::Literal(literal.text.clone())),
            );
        }
    }

    let operands: Vec<&ParseNode> = node.children_of(ParseKind::Expression).collect();
    if operands.len() == 2 {
        if let Some(op) = node.child(ParseKind::Operator) {
            let op_text = op.text.clone();
            let lhs_node = operands[0];
            let rhs_node = operands[1];
            let lhs = build_expression(unit, lhs_node);
            let rhs = build_expression(unit, rhs_node);
            let id = unit.alloc(
                span_of(node),
                NodeData::Expression(ExprKind::Binary {
                    op: op_text,
                    lhs,
                    rhs,
                }),
            );
            unit.add_child(id, lhs);
            unit.add_child(id, rhs);
            return id;
        }
    }

    unit.alloc(span_of(node), NodeData::Expression(ExprKind::Other))
}

fn build_statement(unit: &mut SourceUnit, node: &ParseNode) -> NodeId {
    let kind = match node.kind {
        ParseKind::Block => StmtKind::Block,
        ParseKind::IfStatement => StmtKind::If,
        ParseKind::WhileStatement => StmtKind::While,
        ParseKind::ForStatement => StmtKind::For,
        ParseKind::ReturnStatement => StmtKind::Return,
        ParseKind::ExpressionStatement => StmtKind::Expression,
        ParseKind::VariableDeclarationStatement => StmtKind::VariableDeclaration,
        ParseKind::AssemblyBlock => StmtKind::Assembly,
        _ => StmtKind::Other,
    };
    let id = unit.alloc(span_of(node), NodeData::Statement(kind));

    for child in &node.children {
        match child.kind {
            ParseKind::Block
            | ParseKind::IfStatement
            | ParseKind::WhileStatement
            | ParseKind::ForStatement
            | ParseKind::ReturnStatement
            | ParseKind::ExpressionStatement
            | ParseKind::VariableDeclarationStatement
            | ParseKind::AssemblyBlock => {
                let stmt = build_statement(unit, child);
                unit.add_child(id, stmt);
            }
            ParseKind::Expression => {
                let expr = build_expression(unit, child);
                unit.add_child(id, expr);
            }
            ParseKind::VariableDeclaration => {
                let var = build_variable(unit, child, false);
                unit.add_child(id, var);
            }
            _ => {}
        }
    }

    id
}
