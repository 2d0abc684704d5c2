//! Lowering: declaration-table AST → frozen registry.
//!
//! Lowering feeds declarations into a [`RegistryBuilder`] in source order (so declaration position == registry
//! position) and maps every core [`RegistryError`](nodekind_core::RegistryError) back to the source span that caused
//! it.

use nodekind_core::{GateSet, InclusionMode, Registry, RegistryBuilder};

use crate::ast::{DeclarationTable, ModeKind};
use crate::diagnostics::{DeclError, TableError};
use crate::{lexer, parser};

/// Register every declaration of `table`.
///
/// ## Errors
/// Returns one [`DeclError::InvalidIdentifier`] per malformed name or gate; valid declarations are still checked so
/// all problems surface together.
pub fn lower(table: &DeclarationTable) -> Result<RegistryBuilder, Vec<DeclError>> {
    let mut builder = RegistryBuilder::new();
    let mut errors = Vec::new();

    for decl in &table.declarations {
        let decl = &decl.node;
        let mode = match &decl.mode {
            None => Ok(InclusionMode::Always),
            Some(mode) => {
                let gate = mode.node.gate.node.clone();
                let result = match mode.node.kind {
                    ModeKind::If => InclusionMode::optional(gate),
                    ModeKind::Soft => InclusionMode::soft(gate),
                };
                result.map_err(|e| DeclError::from_registry(e, table, mode.node.gate.span))
            }
        };

        match mode {
            Ok(mode) => {
                if let Err(e) = builder.register(decl.name.node.clone(), mode) {
                    errors.push(DeclError::from_registry(e, table, decl.name.span));
                }
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() { Ok(builder) } else { Err(errors) }
}

/// A parsed table together with the registry frozen from it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: DeclarationTable,
    pub registry: Registry,
}

/// Lex, parse, lower and finalize a declaration table against `gates`.
///
/// ## Parameters
/// - `origin`: name used in diagnostics (usually the file path).
/// - `source`: table text.
/// - `gates`: resolved gate mapping the registry is validated against.
///
/// ## Errors
/// A [`TableError`] carrying every syntax error, or every invalid identifier, or the first finalize error. Stages
/// short-circuit: lowering is skipped when parsing fails.
#[tracing::instrument(skip_all, fields(origin = %origin.as_ref(), source_len = source.len()))]
pub fn load(origin: impl AsRef<str>, source: &str, gates: &GateSet) -> Result<LoadedTable, TableError> {
    let origin = origin.as_ref();
    let fail = |errors: Vec<DeclError>| TableError::new(origin, source, errors);

    let tokens = lexer::lex(source).map_err(fail)?;
    let table = parser::parse(&tokens).map_err(fail)?;
    let builder = lower(&table).map_err(fail)?;
    let registry = builder
        .finalize(gates)
        .map_err(|e| fail(vec![DeclError::from_registry(e, &table, Default::default())]))?;

    tracing::debug!(entries = registry.len(), "declaration table loaded");
    Ok(LoadedTable { table, registry })
}
