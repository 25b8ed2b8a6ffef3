//! Data model for library attachment.

use smol_str::SmolStr;

use crate::base::Location;
use crate::syntax::Visibility;

/// A function in a library that can be attached to types.
///
/// `first_param_type` is the self-convention slot: the type of the
/// function's first parameter decides which receiver types the function
/// is attachable to. A parameterless function gets `"*"`, meaning it is
/// not attachable through a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryFunction {
    pub name: SmolStr,
    pub library_name: SmolStr,
    pub first_param_type: SmolStr,
    pub parameters: Vec<SmolStr>,
    pub return_type: Option<SmolStr>,
    pub visibility: Visibility,
    pub is_view: bool,
    pub is_pure: bool,
    pub location: Location,
}

/// Where a using directive was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveScope {
    /// Declared inside a contract (or interface/library) body.
    Contract(SmolStr),
    /// Declared at file level, outside any contract.
    File,
}

/// One attached function of a selective directive
/// (`using {add, sub as minus} for uint256`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFunction {
    /// The library function's declared name.
    pub name: SmolStr,
    /// Call-site name when aliased (`sub as minus` → callable as `minus`).
    pub alias: Option<SmolStr>,
}

impl AttachedFunction {
    /// Parse a `f` or `f as g` spec.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(" as ") {
            Some((name, alias)) => Self {
                name: SmolStr::new(name.trim()),
                alias: Some(SmolStr::new(alias.trim())),
            },
            None => Self {
                name: SmolStr::new(spec.trim()),
                alias: None,
            },
        }
    }

    /// The name a call site uses for this function.
    pub fn call_name(&self) -> &SmolStr {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

/// One `using Library for Type;` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingDirectiveInfo {
    pub library_name: SmolStr,
    /// `"*"` for the wildcard form.
    pub target_type: SmolStr,
    pub is_global: bool,
    /// Empty = the whole library is attached.
    pub specific_functions: Vec<AttachedFunction>,
    pub scope: DirectiveScope,
    pub location: Location,
}

impl UsingDirectiveInfo {
    /// Does this directive apply to the given receiver type?
    pub fn applies_to(&self, receiver_type: &str) -> bool {
        self.target_type == "*"
            || self.target_type == receiver_type
            || types_compatible(&self.target_type, receiver_type)
    }

    /// The declared function name a call-site name maps to under this
    /// directive, or `None` when a selective list excludes it.
    pub fn declared_name_for(&self, call_name: &str) -> Option<SmolStr> {
        if self.specific_functions.is_empty() {
            return Some(SmolStr::new(call_name));
        }
        self.specific_functions
            .iter()
            .find(|attached| attached.call_name() == call_name)
            .map(|attached| attached.name.clone())
    }
}

/// A method-style call site under consideration. Constructed per query,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallContext {
    pub receiver_name: SmolStr,
    pub receiver_type: SmolStr,
    pub method_name: SmolStr,
    pub call_location: Location,
}

/// Type compatibility for library attachment (symmetric, used both for
/// directive targets and function first parameters): identical strings,
/// element-wise compatible arrays, `uint`≡`uint256`, `int`≡`int256`.
/// Everything else is incompatible.
pub fn types_compatible(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    if let (Some(elem_a), Some(elem_b)) = (a.strip_suffix("[]"), b.strip_suffix("[]")) {
        return types_compatible(elem_a, elem_b);
    }

    matches!(
        (a, b),
        ("uint", "uint256") | ("uint256", "uint") | ("int", "int256") | ("int256", "int")
    )
}
