//! Per-file discovery of libraries, using directives, and variable types.
//!
//! The scan is grounded on the AST whenever one is available (library
//! declarations, function first parameters, using directives, state
//! variables all have nodes). The line-oriented text scan survives as
//! the fallback for files without a parse tree and for the local/param
//! patterns the AST does not model.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::library::{
    AttachedFunction, DirectiveScope, LibraryFunction, UsingDirectiveInfo,
};
use crate::base::{FileId, Location, Span};
use crate::syntax::{ContractKind, SourceUnit, Visibility};

/// Everything the resolver knows about one file. Lives inside
/// [`super::LibraryIndex`]; invalidated as a unit when the file changes.
#[derive(Debug, Clone, Default)]
pub struct FileLibraryInfo {
    /// Library name → functions, in declaration order.
    pub libraries: IndexMap<SmolStr, Vec<LibraryFunction>>,
    /// Using directives in declaration order (order is the tie-break).
    pub using_directives: Vec<UsingDirectiveInfo>,
    /// Best-effort state-variable name → type map.
    pub variable_types: FxHashMap<SmolStr, SmolStr>,
}

static LIBRARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^library\s+(\w+)\s*\{").unwrap());
static CONTRACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:abstract\s+)?(?:contract|interface)\s+(\w+)").unwrap());
static USING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^using\s+(\w+)\s+for\s+([^;]+);").unwrap());
static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^function\s+(\w+)\s*\(([^)]*)\)\s*(internal|external|public|private)?\s*(view|pure)?\s*(returns\s*\(([^)]*)\))?",
    )
    .unwrap()
});
static FIRST_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+(?:\[\])?)\s+(?:(?:memory|storage|calldata)\s+)?\w+$").unwrap());
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+(?:\[\])?)\s+(?:(?:public|private|internal)\s+)?(\w+)").unwrap()
});

/// Statement and declaration keywords that the variable patterns must
/// not mistake for type names (`return n;` is not a declaration of `n`).
fn is_type_token(token: &str) -> bool {
    let base = token.strip_suffix("[]").unwrap_or(token);
    !matches!(
        base,
        "return"
            | "returns"
            | "require"
            | "assert"
            | "revert"
            | "emit"
            | "if"
            | "else"
            | "for"
            | "while"
            | "do"
            | "break"
            | "continue"
            | "new"
            | "delete"
            | "import"
            | "pragma"
            | "using"
            | "function"
            | "modifier"
            | "event"
            | "struct"
            | "enum"
            | "contract"
            | "interface"
            | "library"
            | "constructor"
            | "fallback"
            | "receive"
            | "try"
            | "catch"
            | "unchecked"
            | "assembly"
            | "is"
            | "memory"
            | "storage"
            | "calldata"
            | "public"
            | "private"
            | "internal"
            | "external"
            | "constant"
            | "immutable"
    )
}

/// Scan an AST for library info. Spans come straight from the nodes.
pub fn scan_ast(unit: &SourceUnit) -> FileLibraryInfo {
    let file = unit.file();
    let mut info = FileLibraryInfo::default();

    // Walk root children in order so directive order matches the source.
    for &child in &unit.node(unit.root()).children {
        if let Some(directive) = directive_from_ast(unit, child, DirectiveScope::File) {
            info.using_directives.push(directive);
            continue;
        }

        let Some(contract) = unit.contract(child) else {
            continue;
        };

        if contract.kind == ContractKind::Library {
            let functions = contract
                .functions
                .iter()
                .filter_map(|&f| library_function_from_ast(unit, f, &contract.name, file))
                .collect();
            info.libraries.insert(contract.name.clone(), functions);
        } else {
            for &var_id in &contract.variables {
                if let Some(var) = unit.variable(var_id) {
                    info.variable_types
                        .insert(var.name.clone(), var.type_name.clone());
                }
            }
        }

        for &using_id in &contract.using_directives {
            if let Some(directive) = directive_from_ast(
                unit,
                using_id,
                DirectiveScope::Contract(contract.name.clone()),
            ) {
                info.using_directives.push(directive);
            }
        }
    }

    info
}

fn directive_from_ast(
    unit: &SourceUnit,
    id: crate::syntax::NodeId,
    scope: DirectiveScope,
) -> Option<UsingDirectiveInfo> {
    let using = unit.using(id)?;
    Some(UsingDirectiveInfo {
        library_name: using.library.clone(),
        target_type: using.target_type.clone(),
        is_global: using.is_global,
        specific_functions: using
            .functions
            .iter()
            .map(|spec| AttachedFunction::parse(spec))
            .collect(),
        scope,
        location: Location::new(unit.file(), unit.span(id)),
    })
}

fn library_function_from_ast(
    unit: &SourceUnit,
    id: crate::syntax::NodeId,
    library: &SmolStr,
    file: FileId,
) -> Option<LibraryFunction> {
    let function = unit.function(id)?;

    let parameters: Vec<SmolStr> = function
        .parameters
        .iter()
        .filter_map(|&p| unit.parameter(p))
        .map(|p| {
            if p.name.is_empty() {
                p.type_name.clone()
            } else {
                SmolStr::new(format!("{} {}", p.type_name, p.name))
            }
        })
        .collect();

    let first_param_type = function
        .parameters
        .first()
        .and_then(|&p| unit.parameter(p))
        .map(|p| p.type_name.clone())
        .unwrap_or_else(|| SmolStr::new("*"));

    let returns: Vec<&str> = function
        .returns
        .iter()
        .filter_map(|&p| unit.parameter(p))
        .map(|p| p.type_name.as_str())
        .collect();
    let return_type = if returns.is_empty() {
        None
    } else {
        Some(SmolStr::new(returns.join(", ")))
    };

    use crate::syntax::StateMutability;
    Some(LibraryFunction {
        name: function.name.clone(),
        library_name: library.clone(),
        first_param_type,
        parameters,
        return_type,
        visibility: function.visibility.unwrap_or(Visibility::Internal),
        is_view: function.mutability == Some(StateMutability::View),
        is_pure: function.mutability == Some(StateMutability::Pure),
        location: Location::new(file, unit.span(id)),
    })
}

/// Line-oriented text scan, used when no parse tree is available.
///
/// Tracks the current `library`/`contract` context line by line, exactly
/// the patterns documented for the resolver: library headers, contract
/// headers (which clear the library context), `using L for T;` lines,
/// function signatures inside a library, and state-variable declarations
/// inside a contract.
pub fn scan_text(file: FileId, content: &str) -> FileLibraryInfo {
    let mut info = FileLibraryInfo::default();
    let mut current_library: Option<SmolStr> = None;
    let mut current_contract: Option<SmolStr> = None;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(captures) = LIBRARY_RE.captures(trimmed) {
            current_library = Some(SmolStr::new(&captures[1]));
            continue;
        }

        if let Some(captures) = CONTRACT_RE.captures(trimmed) {
            current_contract = Some(SmolStr::new(&captures[1]));
            current_library = None;
            continue;
        }

        if let Some(captures) = USING_RE.captures(trimmed) {
            let mut target = captures[2].trim();
            let mut is_global = false;
            if let Some(stripped) = target.strip_suffix(" global") {
                target = stripped.trim_end();
                is_global = true;
            }
            info.using_directives.push(UsingDirectiveInfo {
                library_name: SmolStr::new(&captures[1]),
                target_type: SmolStr::new(target),
                is_global,
                specific_functions: Vec::new(),
                scope: match &current_contract {
                    Some(name) => DirectiveScope::Contract(name.clone()),
                    None => DirectiveScope::File,
                },
                location: Location::new(
                    file,
                    Span::from_coords(line_num, 0, line_num, line.chars().count()),
                ),
            });
            continue;
        }

        if let Some(library) = &current_library {
            if let Some(captures) = FUNCTION_RE.captures(trimmed) {
                let function =
                    library_function_from_line(&captures, library, file, line_num, line);
                info.libraries
                    .entry(library.clone())
                    .or_default()
                    .push(function);
                continue;
            }
        }

        if current_contract.is_some() && !trimmed.contains("function") {
            if let Some(captures) = VARIABLE_RE.captures(trimmed) {
                if is_type_token(&captures[1]) {
                    info.variable_types
                        .insert(SmolStr::new(&captures[2]), SmolStr::new(&captures[1]));
                }
            }
        }
    }

    info
}

fn library_function_from_line(
    captures: &regex::Captures<'_>,
    library: &SmolStr,
    file: FileId,
    line_num: usize,
    line: &str,
) -> LibraryFunction {
    let name = SmolStr::new(&captures[1]);
    let params_str = captures[2].trim();
    let visibility = captures
        .get(3)
        .and_then(|m| Visibility::parse(m.as_str()))
        .unwrap_or(Visibility::Internal);
    let mutability = captures.get(4).map(|m| m.as_str()).unwrap_or("");
    let return_type = captures
        .get(6)
        .map(|m| SmolStr::new(m.as_str().trim()))
        .filter(|t| !t.is_empty());

    let mut first_param_type = SmolStr::new("*");
    let mut parameters = Vec::new();
    if !params_str.is_empty() {
        parameters = params_str
            .split(',')
            .map(|p| SmolStr::new(p.trim()))
            .collect::<Vec<_>>();
        if let Some(first) = parameters.first() {
            if let Some(captures) = FIRST_PARAM_RE.captures(first) {
                first_param_type = SmolStr::new(&captures[1]);
            }
        }
    }

    // Span covers `function name`.
    let start_col = line.find("function").unwrap_or(0);
    let end_col = start_col + "function ".len() + name.len();
    LibraryFunction {
        name,
        library_name: library.clone(),
        first_param_type,
        parameters,
        return_type,
        visibility,
        is_view: mutability == "view",
        is_pure: mutability == "pure",
        location: Location::new(file, Span::from_coords(line_num, start_col, line_num, end_col)),
    }
}

/// Text fallback for receiver-type inference: state-variable pattern,
/// then local-variable pattern, then parameter pattern, per line in
/// order; first match wins.
pub(crate) fn infer_type_from_text(name: &str, content: &str) -> Option<SmolStr> {
    let escaped = regex::escape(name);
    let state_re = Regex::new(&format!(
        r"^(\w+(?:\[\])?)\s+(?:(?:public|private|internal)\s+)?{escaped}\b"
    ))
    .ok()?;
    let local_re = Regex::new(&format!(
        r"^(\w+(?:\[\])?)\s+(?:(?:memory|storage)\s+)?{escaped}\s*[=;]"
    ))
    .ok()?;
    let param_re = Regex::new(&format!(
        r"(\w+(?:\[\])?)\s+(?:memory|storage|calldata)\s+{escaped}\b"
    ))
    .ok()?;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(captures) = state_re.captures(trimmed) {
            if is_type_token(&captures[1]) {
                return Some(SmolStr::new(&captures[1]));
            }
        }
        if let Some(captures) = local_re.captures(trimmed) {
            if is_type_token(&captures[1]) {
                return Some(SmolStr::new(&captures[1]));
            }
        }
        if let Some(captures) = param_re.captures(line) {
            if is_type_token(&captures[1]) {
                return Some(SmolStr::new(&captures[1]));
            }
        }
    }

    None
}
