//! Declaration-table diagnostics.
//!
//! Syntax errors and registry authoring errors share one [`DeclError`] type so a single pass over a table can report
//! everything with spans. [`TableError`] bundles them with the table source for `miette` rendering.

use miette::{Diagnostic, NamedSource, SourceSpan};
use nodekind_core::RegistryError;
use thiserror::Error;

use crate::ast::{DeclarationTable, Span};

/// One problem in a declaration table.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DeclError {
    #[error("unexpected character `{ch}`")]
    #[diagnostic(
        code(nodekind::syntax::unexpected_character),
        help("declaration lines hold a name, an optional `if(gate)` / `soft(capability)`, and `#` comments")
    )]
    UnexpectedCharacter {
        ch: char,
        #[label("not allowed in a declaration table")]
        span: SourceSpan,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(nodekind::syntax::unexpected_token))]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        #[label("expected {expected}")]
        span: SourceSpan,
    },

    #[error("unknown inclusion mode `{mode}`")]
    #[diagnostic(
        code(nodekind::syntax::unknown_mode),
        help("use `if(<gate>)` for optional entries or `soft(<capability>)` for soft-gated entries")
    )]
    UnknownMode {
        mode: String,
        #[label("not an inclusion mode")]
        span: SourceSpan,
    },

    #[error("invalid identifier `{name}`")]
    #[diagnostic(
        code(nodekind::registry::invalid_identifier),
        help("identifiers use ASCII letters, digits and `_`, must not start with a digit, and must not be Rust keywords")
    )]
    InvalidIdentifier {
        name: String,
        #[label("invalid identifier")]
        span: SourceSpan,
    },

    #[error("duplicate entry `{name}`")]
    #[diagnostic(
        code(nodekind::registry::duplicate_entry),
        help("every node kind must be declared exactly once")
    )]
    DuplicateEntry {
        name: String,
        first_index: usize,
        second_index: usize,
        #[label("first declared here (position {first_index})")]
        first_span: SourceSpan,
        #[label(primary, "declared again here (position {second_index})")]
        span: SourceSpan,
    },

    #[error("entry `{entry}` references unknown gate `{gate}`")]
    #[diagnostic(
        code(nodekind::registry::unknown_gate),
        help("resolve `{gate}` in the gate set supplied to the build (e.g. `--gate {gate}=false`)")
    )]
    UnknownGate {
        gate: String,
        entry: String,
        #[label("gate not resolved by this build")]
        span: SourceSpan,
    },
}

impl DeclError {
    /// Attach a span to a core registry error using the table that produced it.
    pub fn from_registry(error: RegistryError, table: &DeclarationTable, fallback: Span) -> Self {
        match error {
            RegistryError::InvalidIdentifier { name } => DeclError::InvalidIdentifier {
                span: fallback.into(),
                name,
            },
            RegistryError::DuplicateEntry {
                name,
                first_index,
                second_index,
            } => {
                let span_at = |index: usize| {
                    table
                        .declarations
                        .get(index)
                        .map(|d| d.node.name.span)
                        .unwrap_or(fallback)
                };
                DeclError::DuplicateEntry {
                    first_span: span_at(first_index).into(),
                    span: span_at(second_index).into(),
                    name,
                    first_index,
                    second_index,
                }
            }
            RegistryError::UnknownGate { gate, entry } => {
                let span = table
                    .declarations
                    .iter()
                    .find(|d| d.node.name.node == entry)
                    .and_then(|d| d.node.mode.as_ref())
                    .map(|m| m.node.gate.span)
                    .unwrap_or(fallback);
                DeclError::UnknownGate {
                    span: span.into(),
                    gate,
                    entry,
                }
            }
        }
    }

    /// The core registry error this diagnostic corresponds to, if it is not a pure syntax error.
    pub fn registry_error(&self) -> Option<RegistryError> {
        match self {
            DeclError::InvalidIdentifier { name, .. } => Some(RegistryError::InvalidIdentifier { name: name.clone() }),
            DeclError::DuplicateEntry {
                name,
                first_index,
                second_index,
                ..
            } => Some(RegistryError::DuplicateEntry {
                name: name.clone(),
                first_index: *first_index,
                second_index: *second_index,
            }),
            DeclError::UnknownGate { gate, entry, .. } => Some(RegistryError::UnknownGate {
                gate: gate.clone(),
                entry: entry.clone(),
            }),
            DeclError::UnexpectedCharacter { .. } | DeclError::UnexpectedToken { .. } | DeclError::UnknownMode { .. } => {
                None
            }
        }
    }

    /// Primary span of the diagnostic.
    pub fn span(&self) -> SourceSpan {
        match self {
            DeclError::UnexpectedCharacter { span, .. }
            | DeclError::UnexpectedToken { span, .. }
            | DeclError::UnknownMode { span, .. }
            | DeclError::InvalidIdentifier { span, .. }
            | DeclError::DuplicateEntry { span, .. }
            | DeclError::UnknownGate { span, .. } => *span,
        }
    }
}

/// All problems found in one declaration table, with its source attached for rendering.
#[derive(Debug, Error, Diagnostic)]
#[error("{count} error(s) in declaration table `{origin}`", count = .errors.len())]
#[diagnostic(code(nodekind::table))]
pub struct TableError {
    pub origin: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[related]
    pub errors: Vec<DeclError>,
}

impl TableError {
    pub fn new(origin: impl Into<String>, source: &str, errors: Vec<DeclError>) -> Self {
        let origin = origin.into();
        Self {
            source_code: NamedSource::new(origin.clone(), source.to_string()),
            origin,
            errors,
        }
    }

    /// Render with `miette`'s graphical handler (no colors), for logs and CLI output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let handler =
            miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor()).with_width(160);
        if handler.render_report(&mut out, self).is_err() {
            return self.to_string();
        }
        out
    }
}
