//! Declaration-table AST.
//!
//! One [`Declaration`] per non-blank line, in source order. Spans are byte offsets into the table source and are kept
//! on every piece that a diagnostic may need to point at.

/// Byte range in the table source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.len())
    }
}

/// A node with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A whole declaration table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationTable {
    pub declarations: Vec<Spanned<Declaration>>,
}

/// `Name [mode(gate)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Spanned<String>,
    pub mode: Option<Spanned<ModeDecl>>,
}

/// Gate clause of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDecl {
    pub kind: ModeKind,
    pub gate: Spanned<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// `if(gate)`: plain optional.
    If,
    /// `soft(capability)`: optional with a classifier-chosen fallback.
    Soft,
}

impl ModeKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "if" => Some(ModeKind::If),
            "soft" => Some(ModeKind::Soft),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ModeKind::If => "if",
            ModeKind::Soft => "soft",
        }
    }
}
