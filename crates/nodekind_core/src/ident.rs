//! Node-kind identifiers.
//!
//! Every registry name ends up verbatim in generated artifacts (enum variants, string tables, type stubs), so the
//! accepted spelling is the intersection of what those artifacts can hold: ASCII letters, digits and `_`, not starting
//! with a digit, and not a Rust keyword.

use std::borrow::Borrow;
use std::fmt;

use crate::errors::RegistryError;

/// Reserved + strict keywords in Rust as of edition 2024 (plus the spellings that cannot name an enum variant).
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen", "self", "Self", "_",
];

/// Check whether a spelling is a Rust keyword.
pub fn is_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Check whether `name` is acceptable as a node-kind or gate identifier.
///
/// ## Examples
/// ```rust
/// use nodekind_core::ident::is_valid_identifier;
///
/// assert!(is_valid_identifier("AddI"));
/// assert!(is_valid_identifier("_Tmp2"));
/// assert!(!is_valid_identifier("1Bad"));
/// assert!(!is_valid_identifier("Add-I"));
/// assert!(!is_valid_identifier("loop"));
/// ```
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(name)
}

/// A validated identifier.
///
/// Construction goes through [`Identifier::new`], so holding one is proof the spelling is valid in every downstream
/// artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a spelling.
    ///
    /// ## Errors
    /// - [`RegistryError::InvalidIdentifier`] if `name` is empty, starts with a digit, contains characters outside
    ///   `[A-Za-z0-9_]`, or is a Rust keyword.
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if is_valid_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(RegistryError::InvalidIdentifier { name })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Identifier {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
