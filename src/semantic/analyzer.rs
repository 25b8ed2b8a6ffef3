//! The semantic analyzer: one AST traversal with scope push/pop driven
//! by node kind.
//!
//! Entering a contract pushes a contract scope and registers the contract
//! symbol in the global scope; entering a function pushes a function
//! scope, registers the function symbol in the *parent* scope, and
//! registers each parameter in the function scope. Every violation is a
//! diagnostic, never an abort.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::symbol_table::{Symbol, SymbolKind, SymbolTable};
use super::types::SolType;
use crate::base::{FileId, Location};
use crate::syntax::{
    ContractKind, ExprKind, FunctionData, NodeData, NodeId, SourceUnit, StateMutability,
};

/// Analyze a file and return its semantic diagnostics.
pub fn analyze(unit: &SourceUnit) -> Vec<Diagnostic> {
    SemanticAnalyzer::new(unit).run()
}

pub struct SemanticAnalyzer<'a> {
    unit: &'a SourceUnit,
    file: FileId,
    table: SymbolTable,
    collector: DiagnosticCollector,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(unit: &'a SourceUnit) -> Self {
        Self {
            unit,
            file: unit.file(),
            table: SymbolTable::new(),
            collector: DiagnosticCollector::new(),
        }
    }

    pub fn run(mut self) -> Vec<Diagnostic> {
        let contracts = self.unit.unit().contracts.clone();
        for id in contracts {
            self.visit_contract(id);
        }
        trace!(file = %self.file, errors = self.collector.error_count(), "semantic analysis done");
        self.collector.finish()
    }

    fn location(&self, id: NodeId) -> Location {
        Location::new(self.file, self.unit.span(id))
    }

    fn visit_contract(&mut self, id: NodeId) {
        let Some(data) = self.unit.contract(id) else {
            return;
        };
        let name = data.name.clone();
        let kind = match data.kind {
            ContractKind::Contract => SymbolKind::Contract,
            ContractKind::Interface => SymbolKind::Interface,
            ContractKind::Library => SymbolKind::Library,
        };

        let symbol = Symbol::new(name.clone(), kind, SolType::named(data.kind.keyword()))
            .with_location(self.location(id));
        let global = self.table.global_scope();
        if !self.table.add_symbol_in(global, symbol) {
            self.collector
                .duplicate_symbol(self.file, self.unit.span(id), &name);
        }

        // State variable names drive the conservative purity classifier.
        let state_vars: FxHashSet<SmolStr> = data
            .variables
            .iter()
            .filter_map(|&v| self.unit.variable(v))
            .map(|v| v.name.clone())
            .collect();

        self.table.enter_scope(format!("contract_{name}"));
        let members = self.unit.node(id).children.clone();
        for member in members {
            match &self.unit.node(member).data {
                NodeData::Variable(_) => self.visit_variable(member),
                NodeData::Function(_) => self.visit_function(member, &state_vars),
                _ => {}
            }
        }
        self.table.exit_scope();
    }

    fn visit_function(&mut self, id: NodeId, state_vars: &FxHashSet<SmolStr>) {
        let Some(data) = self.unit.function(id) else {
            return;
        };
        let name = data.name.clone();

        let symbol = Symbol::new(name.clone(), SymbolKind::Function, SolType::named("function"))
            .with_visibility(data.visibility)
            .with_location(self.location(id));
        if !self.table.add_symbol(symbol) {
            self.collector
                .duplicate_symbol(self.file, self.unit.span(id), &name);
        }

        self.table.enter_scope(format!("function_{name}"));

        let parameters = data.parameters.clone();
        for param_id in parameters {
            let Some(param) = self.unit.parameter(param_id) else {
                continue;
            };
            let param_name = param.name.clone();
            let symbol = Symbol::new(
                param_name.clone(),
                SymbolKind::Parameter,
                SolType::parse(&param.type_name),
            )
            .with_location(self.location(param_id));
            if !self.table.add_symbol(symbol) {
                self.collector
                    .duplicate_symbol(self.file, self.unit.span(param_id), &param_name);
            }
        }

        self.check_function_modifiers(id, state_vars);

        if let Some(body) = self.unit.function(id).and_then(|f| f.body) {
            self.visit_body(body);
        }

        self.table.exit_scope();
    }

    fn check_function_modifiers(&mut self, id: NodeId, state_vars: &FxHashSet<SmolStr>) {
        let Some(data) = self.unit.function(id) else {
            return;
        };
        let span = self.unit.span(id);

        if data.visibility.is_none() && data.name != "constructor" {
            self.collector.missing_visibility(self.file, span, &data.name);
        }

        let (reads, writes) = self.state_effects_of(data, state_vars);
        match data.mutability {
            Some(StateMutability::Pure) if reads || writes => {
                self.collector.mutability_violation(
                    self.file,
                    span,
                    format!("function '{}' is declared pure but reads state", data.name),
                );
            }
            Some(StateMutability::View) if writes => {
                self.collector.mutability_violation(
                    self.file,
                    span,
                    format!("function '{}' is declared view but modifies state", data.name),
                );
            }
            _ => {}
        }
    }

    /// Conservative state-effect classifier: walks the modeled body
    /// expressions and checks them against the contract's state variable
    /// names. Unmodeled expressions contribute nothing, so the check
    /// under-reports rather than over-reports.
    fn state_effects_of(
        &self,
        data: &FunctionData,
        state_vars: &FxHashSet<SmolStr>,
    ) -> (bool, bool) {
        let mut reads = false;
        let mut writes = false;
        if let Some(body) = data.body {
            self.collect_state_effects(body, state_vars, &mut reads, &mut writes);
        }
        (reads, writes)
    }

    fn collect_state_effects(
        &self,
        id: NodeId,
        state_vars: &FxHashSet<SmolStr>,
        reads: &mut bool,
        writes: &mut bool,
    ) {
        match &self.unit.node(id).data {
            NodeData::Expression(expr) => {
                self.expression_effects(expr, state_vars, reads, writes)
            }
            _ => {
                for &child in &self.unit.node(id).children {
                    self.collect_state_effects(child, state_vars, reads, writes);
                }
            }
        }
    }

    fn expression_effects(
        &self,
        expr: &ExprKind,
        state_vars: &FxHashSet<SmolStr>,
        reads: &mut bool,
        writes: &mut bool,
    ) {
        match expr {
            ExprKind::Identifier(name) => {
                if state_vars.contains(name) {
                    *reads = true;
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                if is_assignment_op(op) {
                    if let NodeData::Expression(ExprKind::Identifier(name)) =
                        &self.unit.node(*lhs).data
                    {
                        if state_vars.contains(name) {
                            *writes = true;
                            // Compound assignment also reads the target.
                            if op != "=" {
                                *reads = true;
                            }
                        }
                    } else {
                        self.collect_state_effects(*lhs, state_vars, reads, writes);
                    }
                    self.collect_state_effects(*rhs, state_vars, reads, writes);
                } else {
                    self.collect_state_effects(*lhs, state_vars, reads, writes);
                    self.collect_state_effects(*rhs, state_vars, reads, writes);
                }
            }
            ExprKind::Literal(_) | ExprKind::Other => {}
        }
    }

    /// Walk a function body: register locals, infer statement
    /// expressions (which reports undefined identifiers).
    fn visit_body(&mut self, id: NodeId) {
        let children = self.unit.node(id).children.clone();
        for child in children {
            match &self.unit.node(child).data {
                NodeData::Statement(_) => self.visit_body(child),
                NodeData::Expression(_) => {
                    self.infer_expression(child);
                }
                NodeData::Variable(_) => self.visit_variable(child),
                _ => {}
            }
        }
    }

    fn visit_variable(&mut self, id: NodeId) {
        let Some(data) = self.unit.variable(id) else {
            return;
        };
        let name = data.name.clone();
        let declared = SolType::parse(&data.type_name);
        let initializer = data.initializer;

        let mut symbol = Symbol::new(name.clone(), SymbolKind::Variable, declared.clone())
            .with_visibility(data.visibility)
            .with_location(self.location(id));
        symbol.is_constant = data.is_constant;
        symbol.is_immutable = data.is_immutable;
        if !self.table.add_symbol(symbol) {
            self.collector
                .duplicate_symbol(self.file, self.unit.span(id), &name);
        }

        if let Some(init) = initializer {
            let inferred = self.infer_expression(init);
            if !inferred.is_unknown() && !inferred.is_compatible_with(&declared) {
                self.collector.type_mismatch(
                    self.file,
                    self.unit.span(init),
                    &declared.to_string(),
                    &inferred.to_string(),
                );
            }
        }
    }

    /// Infer the type of an expression, reporting undefined identifiers.
    fn infer_expression(&mut self, id: NodeId) -> SolType {
        let expr = match &self.unit.node(id).data {
            NodeData::Expression(expr) => expr.clone(),
            _ => return SolType::unknown(),
        };

        match expr {
            ExprKind::Identifier(name) => match self.table.lookup(&name) {
                Some(symbol) => symbol.ty.clone(),
                None => {
                    self.collector
                        .undefined_identifier(self.file, self.unit.span(id), &name);
                    SolType::unknown()
                }
            },
            ExprKind::Literal(text) => infer_literal_type(&text),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs_ty = self.infer_expression(lhs);
                let rhs_ty = self.infer_expression(rhs);
                infer_binary_type(&lhs_ty, &rhs_ty, &op)
            }
            ExprKind::Other => SolType::unknown(),
        }
    }
}

fn is_assignment_op(op: &str) -> bool {
    matches!(
        op,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "|=" | "&=" | "^=" | "<<=" | ">>="
    )
}

/// Infer the type of a literal token.
fn infer_literal_type(literal: &str) -> SolType {
    let lower = literal.to_ascii_lowercase();
    if lower == "true" || lower == "false" {
        return SolType::named("bool");
    }

    if literal.starts_with('"') || literal.starts_with('\'') {
        return SolType::named("string");
    }

    if literal.starts_with("0x") {
        // 0x + 40 hex chars is an address literal.
        return if literal.len() == 42 {
            SolType::named("address")
        } else {
            SolType::named("bytes")
        };
    }

    if literal.parse::<u128>().is_ok() {
        return SolType::named("uint256");
    }

    SolType::unknown()
}

/// Result type of a binary operation.
fn infer_binary_type(lhs: &SolType, rhs: &SolType, op: &str) -> SolType {
    match op {
        "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => SolType::named("bool"),
        "+" | "-" | "*" | "/" | "%" | "**" => {
            if lhs.is_numeric() && rhs.is_numeric() {
                lhs.clone()
            } else {
                SolType::unknown()
            }
        }
        _ => SolType::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Span;
    use crate::semantic::diagnostics::codes;
    use crate::syntax::ast::{ContractData, VariableData};
    use crate::syntax::{ContractKind, SourceUnit};

    fn unit_with_contract(name: &str) -> (SourceUnit, NodeId) {
        let mut unit = SourceUnit::empty(FileId::new(0));
        let contract = unit.alloc(
            Span::from_coords(0, 0, 10, 0),
            NodeData::Contract(ContractData::new(name, ContractKind::Contract)),
        );
        unit.add_child(unit.root(), contract);
        match &mut unit.node_mut(unit.root()).data {
            NodeData::Unit(data) => data.contracts.push(contract),
            _ => unreachable!(),
        }
        (unit, contract)
    }

    fn add_state_var(
        unit: &mut SourceUnit,
        contract: NodeId,
        name: &str,
        ty: &str,
        line: usize,
    ) -> NodeId {
        let var = unit.alloc(
            Span::from_coords(line, 4, line, 30),
            NodeData::Variable(VariableData {
                name: name.into(),
                type_name: ty.into(),
                visibility: None,
                is_constant: false,
                is_immutable: false,
                is_state: true,
                initializer: None,
            }),
        );
        unit.add_child(contract, var);
        if let NodeData::Contract(data) = &mut unit.node_mut(contract).data {
            data.variables.push(var);
        }
        var
    }

    #[test]
    fn test_duplicate_state_variable_reports_once() {
        let (mut unit, contract) = unit_with_contract("Token");
        add_state_var(&mut unit, contract, "supply", "uint256", 1);
        add_state_var(&mut unit, contract, "supply", "uint256", 2);

        let diagnostics = analyze(&unit);
        let duplicates: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(codes::DUPLICATE_SYMBOL))
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].location.span.start.line, 2);
    }

    #[test]
    fn test_literal_inference() {
        assert_eq!(infer_literal_type("true").name, "bool");
        assert_eq!(infer_literal_type("\"hi\"").name, "string");
        assert_eq!(infer_literal_type("42").name, "uint256");
        assert_eq!(
            infer_literal_type("0x52908400098527886E0F7030069857D2E4169EE7").name,
            "address"
        );
        assert_eq!(infer_literal_type("0x1234").name, "bytes");
        assert!(infer_literal_type("forty-two").is_unknown());
    }

    #[test]
    fn test_binary_inference() {
        let uint = SolType::named("uint256");
        let boolean = SolType::named("bool");
        assert_eq!(infer_binary_type(&uint, &uint, "==").name, "bool");
        assert_eq!(infer_binary_type(&boolean, &boolean, "&&").name, "bool");
        assert_eq!(infer_binary_type(&uint, &uint, "+").name, "uint256");
        assert!(infer_binary_type(&boolean, &uint, "+").is_unknown());
    }
}
