//! Lexer for declaration tables.
//!
//! The table language is line-oriented, so the token set is tiny:
//! - `Word` for names, mode keywords and gate names (`[A-Za-z0-9_]+`; validity is checked later, against the
//!   registry's identifier rules, so `1Bad` lexes fine and fails with a precise registry diagnostic)
//! - `(` and `)`
//! - `Newline` (one per non-blank line; blank and comment-only lines produce none)
//!
//! `#` starts a comment that runs to the end of the line.

use crate::ast::Span;
use crate::diagnostics::DeclError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word(String),
    LParen,
    RParen,
    Newline,
    Eof,
}

impl TokenKind {
    /// Short human description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(w) => format!("`{w}`"),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer state.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Whether the current line has produced a token yet (blank lines emit no `Newline`).
    line_has_tokens: bool,
    tokens: Vec<Token>,
    errors: Vec<DeclError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line_has_tokens: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole table.
    ///
    /// The stream always ends with `Newline` (if the last line had content) followed by `Eof`. Every bad character is
    /// reported, not just the first.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<DeclError>> {
        while let Some((start, c)) = self.advance() {
            match c {
                '#' => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                '\n' => {
                    if self.line_has_tokens {
                        self.tokens
                            .push(Token::new(TokenKind::Newline, Span::new(start, self.current_pos)));
                    }
                    self.line_has_tokens = false;
                }
                ' ' | '\t' | '\r' => {}
                '(' => self.push(TokenKind::LParen, start),
                ')' => self.push(TokenKind::RParen, start),
                c if is_word_char(c) => self.scan_word(start),
                other => self.errors.push(DeclError::UnexpectedCharacter {
                    ch: other,
                    span: Span::new(start, self.current_pos).into(),
                }),
            }
        }

        if self.line_has_tokens {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::new(self.current_pos, self.current_pos)));
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(self.current_pos, self.current_pos)));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        Some((pos, c))
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
        self.line_has_tokens = true;
    }

    fn scan_word(&mut self, start: usize) {
        while let Some(&(_, c)) = self.chars.peek() {
            if is_word_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        let word = self.source[start..self.current_pos].to_string();
        self.push(TokenKind::Word(word), start);
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a table source.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<DeclError>> {
    Lexer::new(source).tokenize()
}
