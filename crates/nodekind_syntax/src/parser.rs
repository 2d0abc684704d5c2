//! Parser for declaration tables.
//!
//! Grammar (one declaration per line):
//!
//! ```text
//! table       := line* EOF
//! line        := NAME mode? NEWLINE
//! mode        := ("if" | "soft") "(" GATE ")"
//! ```
//!
//! ## Notes
//! - The parser recovers at the next `Newline`, so one pass reports every malformed line.
//! - Names and gates are not validated here; lowering runs them through the registry's identifier rules.

use crate::ast::{Declaration, DeclarationTable, ModeDecl, ModeKind, Span, Spanned};
use crate::diagnostics::DeclError;
use crate::lexer::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<DeclError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<DeclarationTable, Vec<DeclError>> {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(DeclarationTable { declarations })
        } else {
            Err(self.errors)
        }
    }

    fn declaration(&mut self) -> Result<Spanned<Declaration>, DeclError> {
        let name = self.word("a node-kind name")?;
        let mut span = name.span;

        let mode = match &self.peek().kind {
            TokenKind::Word(_) => {
                let mode = self.mode()?;
                span = span.merge(mode.span);
                Some(mode)
            }
            _ => None,
        };

        self.end_of_line()?;
        Ok(Spanned::new(Declaration { name, mode }, span))
    }

    fn mode(&mut self) -> Result<Spanned<ModeDecl>, DeclError> {
        let keyword = self.word("an inclusion mode")?;
        let Some(kind) = ModeKind::from_keyword(&keyword.node) else {
            return Err(DeclError::UnknownMode {
                mode: keyword.node,
                span: keyword.span.into(),
            });
        };
        self.expect(TokenKind::LParen, "`(`")?;
        let gate = self.word("a gate name")?;
        let close = self.expect(TokenKind::RParen, "`)`")?;
        Ok(Spanned::new(ModeDecl { kind, gate }, keyword.span.merge(close)))
    }

    fn end_of_line(&mut self) -> Result<(), DeclError> {
        match self.peek().kind {
            TokenKind::Newline => {
                self.pos += 1;
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn word(&mut self, expected: &'static str) -> Result<Spanned<String>, DeclError> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Word(w) => {
                let out = Spanned::new(w.clone(), token.span);
                self.pos += 1;
                Ok(out)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Span, DeclError> {
        let token = self.peek();
        if token.kind == kind {
            let span = token.span;
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> DeclError {
        let token = self.peek();
        DeclError::UnexpectedToken {
            expected,
            found: token.kind.describe(),
            span: token.span.into(),
        }
    }

    /// Skip to just past the next `Newline`.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            let was_newline = self.peek().kind == TokenKind::Newline;
            self.pos += 1;
            if was_newline {
                return;
            }
        }
    }

    fn peek(&self) -> &'a Token {
        // The lexer always terminates the stream with `Eof`.
        let tokens: &'a [Token] = self.tokens;
        let last = tokens.len().saturating_sub(1);
        &tokens[self.pos.min(last)]
    }

    fn is_at_end(&self) -> bool {
        self.tokens.is_empty() || self.peek().kind == TokenKind::Eof
    }
}

/// Parse a token stream into a [`DeclarationTable`].
///
/// ## Errors
/// Returns every syntax error found, one per malformed line at most.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<DeclarationTable, Vec<DeclError>> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<DeclarationTable, Vec<DeclError>> {
        let tokens = lexer::lex(source).map_err(|_| vec![])?;
        parse(&tokens)
    }

    #[test]
    fn parses_all_three_forms() {
        let table = parse_str("AbsD\nCallNative if(native_calls)\nBarrier soft(shenandoah_gc)\n").unwrap();
        assert_eq!(table.declarations.len(), 3);

        let d = &table.declarations[0].node;
        assert_eq!(d.name.node, "AbsD");
        assert!(d.mode.is_none());

        let d = &table.declarations[1].node;
        let mode = d.mode.as_ref().unwrap();
        assert_eq!(mode.node.kind, ModeKind::If);
        assert_eq!(mode.node.gate.node, "native_calls");

        let d = &table.declarations[2].node;
        assert_eq!(d.mode.as_ref().unwrap().node.kind, ModeKind::Soft);
    }

    #[test]
    fn empty_table_parses() {
        let table = parse_str("# nothing here\n").unwrap();
        assert!(table.declarations.is_empty());
    }

    #[test]
    fn unknown_mode_is_reported() {
        let errs = parse_str("A when(x)\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(matches!(&errs[0], DeclError::UnknownMode { mode, .. } if mode == "when"));
    }

    #[test]
    fn recovers_and_reports_each_bad_line() {
        let errs = parse_str("A if x\nB\nC soft(\nD extra tokens(here)\n").unwrap_err();
        assert_eq!(errs.len(), 3, "one error per malformed line: {errs:?}");
        assert!(matches!(&errs[0], DeclError::UnexpectedToken { expected: "`(`", .. }));
        assert!(matches!(&errs[1], DeclError::UnexpectedToken { expected: "a gate name", .. }));
        assert!(matches!(&errs[2], DeclError::UnknownMode { mode, .. } if mode == "extra"));
    }

    #[test]
    fn trailing_tokens_after_mode_are_rejected() {
        let errs = parse_str("A if(x) junk\n").unwrap_err();
        assert!(matches!(&errs[0], DeclError::UnexpectedToken { expected: "end of line", .. }));
    }

    #[test]
    fn line_cannot_start_with_paren() {
        let errs = parse_str("(A)\n").unwrap_err();
        assert!(matches!(&errs[0], DeclError::UnexpectedToken { expected: "a node-kind name", .. }));
    }
}
