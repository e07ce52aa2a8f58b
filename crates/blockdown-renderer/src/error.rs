//! Engine error types.

use thiserror::Error;

/// Errors raised by the tree and markup engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The document root is not a map node.
    #[error("document root must be a map node, got {0}")]
    InvalidRoot(&'static str),

    /// The document's root block is not among the declared entities.
    #[error("root block \"{0}\" is not declared")]
    UndeclaredBlock(String),
}
