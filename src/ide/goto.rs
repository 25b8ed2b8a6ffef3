//! Definition, declaration, type-definition, and implementation queries.
//!
//! Each position context from [`classify`](super::classify) routes to a
//! dedicated resolver. Resolution misses are empty results, never errors.

use regex::Regex;
use smol_str::SmolStr;
use tracing::trace;

use super::analysis::Analysis;
use super::classify::{PositionContext, classify};
use crate::base::{FileId, Location, Position, Span};
use crate::resolver::MethodCallContext;
use crate::syntax::{ContractData, ContractKind, SourceUnit};

pub(crate) fn definitions(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };
    let Some(context) = classify(&doc.text, position, file, analysis.lib_index()) else {
        return Vec::new();
    };

    match context {
        PositionContext::LibraryMethodCall {
            word,
            word_span,
            receiver_name,
            receiver_type,
        } => {
            let call = MethodCallContext {
                receiver_name,
                receiver_type,
                method_name: word,
                call_location: Location::new(file, word_span),
            };
            match analysis.lib_index().resolve(&call, file) {
                Some(function) => {
                    trace!(library = %function.library_name, "definition via library resolution");
                    vec![function.location]
                }
                None => Vec::new(),
            }
        }
        PositionContext::DirectMethodCall { word, receiver, .. } => {
            direct_method_definition(analysis, file, position, &word, &receiver)
        }
        PositionContext::TypeReference { word, .. } => {
            if super::classify::is_builtin_type(&word) {
                // Built-in types have no definition to jump to.
                Vec::new()
            } else {
                find_type_definition(analysis, &word)
            }
        }
        PositionContext::ImportPath { path, .. } => match analysis.import_resolver() {
            Some(resolver) => resolver
                .resolve_import(&path, file)
                .map(|location| vec![location])
                .unwrap_or_default(),
            None => Vec::new(),
        },
        PositionContext::Identifier { word, .. } => {
            // Variable, then function, then contract; first hit wins.
            let found = find_variable_definition(analysis, file, &word);
            if !found.is_empty() {
                return found;
            }
            let found = find_function_definition(analysis, file, &word);
            if !found.is_empty() {
                return found;
            }
            find_contract_definition(analysis, file, &word)
        }
    }
}

pub(crate) fn declarations(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
) -> Vec<Location> {
    let mut results = definitions(analysis, file, position);

    // When the cursor is on a function that implements an interface
    // member, the interface declaration counts as a declaration too.
    let Some(doc) = analysis.document(file) else {
        return results;
    };
    if let Some(PositionContext::Identifier { word, .. }) =
        classify(&doc.text, position, file, analysis.lib_index())
    {
        if let Some(ast) = doc.ast.as_ref() {
            for (_, contract) in ast.contracts() {
                let has_function = contract
                    .functions
                    .iter()
                    .any(|&f| ast.function(f).is_some_and(|data| data.name == word));
                if !has_function {
                    continue;
                }
                for base in &contract.inheritance {
                    if let Some(declaration) = interface_member(analysis, base, &word) {
                        results.push(declaration);
                    }
                }
            }
        }
    }

    super::references::dedup_and_sort(results)
}

pub(crate) fn type_definitions(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };
    let Some(context) = classify(&doc.text, position, file, analysis.lib_index()) else {
        return Vec::new();
    };

    let type_name = match context {
        PositionContext::Identifier { word, .. } => {
            match analysis
                .lib_index()
                .infer_variable_type(&word, file, &doc.text)
            {
                Some(ty) => ty,
                None => return Vec::new(),
            }
        }
        PositionContext::LibraryMethodCall { receiver_type, .. } => receiver_type,
        _ => return Vec::new(),
    };

    let base = SmolStr::new(type_name.strip_suffix("[]").unwrap_or(&type_name));
    if super::classify::is_builtin_type(&base) {
        return Vec::new();
    }
    find_type_definition(analysis, &base)
}

pub(crate) fn implementations(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };
    let Some(PositionContext::Identifier { word, .. } | PositionContext::TypeReference { word, .. }) =
        classify(&doc.text, position, file, analysis.lib_index())
    else {
        return Vec::new();
    };

    // An interface name: every contract inheriting it.
    if is_interface(analysis, &word) {
        return super::references::dedup_and_sort(contracts_implementing(analysis, &word));
    }

    // A function declared by an interface: every override of it.
    super::references::dedup_and_sort(function_implementations(analysis, &word))
}

// ---------------------------------------------------------------------------
// per-context helpers
// ---------------------------------------------------------------------------

fn direct_method_definition(
    analysis: &Analysis<'_>,
    file: FileId,
    position: Position,
    method: &str,
    receiver: &str,
) -> Vec<Location> {
    if let Some(ast) = analysis.document(file).and_then(|d| d.ast.as_ref()) {
        // `other.method()` where `other` names a contract: search it.
        if receiver != "this" {
            if let Some(contract) = contract_by_name(ast, receiver) {
                if let Some(location) = function_in_contract(ast, contract, method) {
                    return vec![location];
                }
            }
        }
        // Otherwise the enclosing contract.
        if let Some((_, contract)) = ast.contract_at(position) {
            if let Some(location) = function_in_contract(ast, contract, method) {
                return vec![location];
            }
        }
    }

    // No AST: fall back to a textual signature search in this file.
    find_function_definition(analysis, file, method)
}

fn contract_by_name<'u>(ast: &'u SourceUnit, name: &str) -> Option<&'u ContractData> {
    ast.contracts()
        .map(|(_, contract)| contract)
        .find(|contract| contract.name == name)
}

fn function_in_contract(
    ast: &SourceUnit,
    contract: &ContractData,
    name: &str,
) -> Option<Location> {
    contract
        .functions
        .iter()
        .find(|&&f| ast.function(f).is_some_and(|data| data.name == name))
        .map(|&f| Location::new(ast.file(), ast.span(f)))
}

/// Struct/contract/interface/library/enum declarations by name, across
/// the whole project (AST where available, text otherwise).
fn find_type_definition(analysis: &Analysis<'_>, name: &str) -> Vec<Location> {
    let mut results = Vec::new();

    for (file, doc) in analysis.documents() {
        match doc.ast.as_ref() {
            Some(ast) => {
                for (id, contract) in ast.contracts() {
                    if contract.name == name {
                        results.push(Location::new(file, ast.span(id)));
                    }
                    for &member in contract.structs.iter().chain(&contract.enums) {
                        if let crate::syntax::NodeData::Struct { name: n, .. }
                        | crate::syntax::NodeData::Enum { name: n, .. } =
                            &ast.node(member).data
                        {
                            if n.as_str() == name {
                                results.push(Location::new(file, ast.span(member)));
                            }
                        }
                    }
                }
            }
            None => results.extend(text_type_definition(file, &doc.text, name)),
        }
    }

    // Project files without an open document are text-only.
    for (file, text) in analysis.project_texts() {
        if analysis.document(*file).is_none() {
            results.extend(text_type_definition(*file, text, name));
        }
    }

    results
}

fn text_type_definition(file: FileId, content: &str, name: &str) -> Vec<Location> {
    let Ok(re) = Regex::new(&format!(
        r"^\s*(?:abstract\s+)?(?:contract|interface|library|struct|enum)\s+({})\b",
        regex::escape(name)
    )) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if let Some(m) = re.captures(line).and_then(|c| c.get(1)) {
            results.push(Location::new(
                file,
                Span::from_coords(line_num, m.start(), line_num, m.end()),
            ));
        }
    }
    results
}

fn find_variable_definition(analysis: &Analysis<'_>, file: FileId, name: &str) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };

    if let Some(ast) = doc.ast.as_ref() {
        for (_, contract) in ast.contracts() {
            for &var_id in &contract.variables {
                if ast.variable(var_id).is_some_and(|v| v.name == name) {
                    return vec![Location::new(file, ast.span(var_id))];
                }
            }
        }
    }

    // Locals and parameters live outside the AST's state-variable lists;
    // fall back to the declaration patterns over text.
    let escaped = regex::escape(name);
    let patterns = [
        format!(r"^\s*(?:\w+(?:\[\])?)\s+(?:(?:public|private|internal|memory|storage|calldata|constant|immutable)\s+)*({escaped})\s*[=;]"),
        format!(r"(?:\w+(?:\[\])?)\s+(?:memory|storage|calldata)\s+({escaped})\b"),
    ];
    for pattern in &patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        for (line_num, line) in doc.text.lines().enumerate() {
            if let Some(m) = re.captures(line).and_then(|c| c.get(1)) {
                return vec![Location::new(
                    file,
                    Span::from_coords(line_num, m.start(), line_num, m.end()),
                )];
            }
        }
    }

    Vec::new()
}

fn find_function_definition(analysis: &Analysis<'_>, file: FileId, name: &str) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };

    if let Some(ast) = doc.ast.as_ref() {
        let mut results = Vec::new();
        for (_, contract) in ast.contracts() {
            if let Some(location) = function_in_contract(ast, contract, name) {
                results.push(location);
            }
        }
        if !results.is_empty() {
            return results;
        }
    }

    let Ok(re) = Regex::new(&format!(
        r"function\s+({})\s*\(",
        regex::escape(name)
    )) else {
        return Vec::new();
    };
    for (line_num, line) in doc.text.lines().enumerate() {
        if let Some(m) = re.captures(line).and_then(|c| c.get(1)) {
            return vec![Location::new(
                file,
                Span::from_coords(line_num, m.start(), line_num, m.end()),
            )];
        }
    }
    Vec::new()
}

fn find_contract_definition(analysis: &Analysis<'_>, file: FileId, name: &str) -> Vec<Location> {
    let Some(doc) = analysis.document(file) else {
        return Vec::new();
    };
    if let Some(ast) = doc.ast.as_ref() {
        for (id, contract) in ast.contracts() {
            if contract.name == name {
                return vec![Location::new(file, ast.span(id))];
            }
        }
    }
    text_type_definition(file, &doc.text, name)
}

// ---------------------------------------------------------------------------
// interface helpers
// ---------------------------------------------------------------------------

fn is_interface(analysis: &Analysis<'_>, name: &str) -> bool {
    analysis.documents().any(|(_, doc)| {
        doc.ast.as_ref().is_some_and(|ast| {
            ast.contracts()
                .any(|(_, c)| c.kind == ContractKind::Interface && c.name == name)
        })
    })
}

/// The location of `interface_name.member`, if that interface declares it.
fn interface_member(
    analysis: &Analysis<'_>,
    interface_name: &str,
    member: &str,
) -> Option<Location> {
    for (_, doc) in analysis.documents() {
        let Some(ast) = doc.ast.as_ref() else {
            continue;
        };
        for (_, contract) in ast.contracts() {
            if contract.kind == ContractKind::Interface && contract.name == interface_name {
                if let Some(location) = function_in_contract(ast, contract, member) {
                    return Some(location);
                }
            }
        }
    }
    None
}

fn contracts_implementing(analysis: &Analysis<'_>, interface_name: &str) -> Vec<Location> {
    let mut results = Vec::new();
    for (file, doc) in analysis.documents() {
        let Some(ast) = doc.ast.as_ref() else {
            continue;
        };
        for (id, contract) in ast.contracts() {
            if contract.kind != ContractKind::Interface
                && contract
                    .inheritance
                    .iter()
                    .any(|base| base.as_str() == interface_name)
            {
                results.push(Location::new(file, ast.span(id)));
            }
        }
    }
    results
}

/// Overrides of an interface-declared function: same-named functions in
/// contracts that inherit an interface declaring it.
fn function_implementations(analysis: &Analysis<'_>, name: &str) -> Vec<Location> {
    let mut results = Vec::new();
    for (_, doc) in analysis.documents() {
        let Some(ast) = doc.ast.as_ref() else {
            continue;
        };
        for (_, contract) in ast.contracts() {
            if contract.kind == ContractKind::Interface {
                continue;
            }
            let declared_in_base = contract
                .inheritance
                .iter()
                .any(|base| interface_member(analysis, base, name).is_some());
            if !declared_in_base {
                continue;
            }
            if let Some(location) = function_in_contract(ast, contract, name) {
                results.push(location);
            }
        }
    }
    results
}
