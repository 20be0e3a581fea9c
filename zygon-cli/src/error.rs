//! Error handling for the `zygon` CLI.
//!
//! The interpreter's own phases (`zygon-lex`, `zygon-par`, `zygon-eval`)
//! each carry a `thiserror` enum of their own; this type only wraps those
//! for a single top-level `Display` the binary can print and turn into an
//! exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Eval(#[from] zygon_eval::EvalError),
}

pub type Result<T> = std::result::Result<T, CliError>;
