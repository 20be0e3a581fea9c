//! Core error types shared by the lex/parse/eval phases.
//!
//! Each phase owns its own error enum (`LexError` in `zygon-lex`, `ParseError`
//! in `zygon-par`, `EvalError` in `zygon-eval`); this module only defines the
//! error types that are genuinely cross-cutting utility concerns.

use thiserror::Error;

/// Error type for index vector operations.
#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },
}

pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;
