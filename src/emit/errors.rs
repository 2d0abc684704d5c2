//! Error types for artifact → Rust emission.
//!
//! These are *emission* failures: the registry and classification already succeeded, but an artifact cannot be
//! rendered (for example two node kinds whose visitor method names collide).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("generated `{file}` is not valid Rust: {message}")]
    SynParse { file: &'static str, message: String },

    #[error("node kinds `{first}` and `{second}` both map to visitor method `{method}`")]
    NameCollision {
        method: String,
        first: String,
        second: String,
    },

    #[error("artifacts `{left}` ({left_len} rows) and `{right}` ({right_len} rows) are not aligned")]
    Misaligned {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
