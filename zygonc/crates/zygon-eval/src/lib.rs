//! Tree-walking evaluator for Zygon.
//!
//! [`Evaluator`] owns the arena of lexical frames and the `using` load
//! stack; [`interpreter`] implements the `Eval`/`Exec` dispatch, [`pattern`]
//! the `case`-expression matcher, [`builtins`] the native module registry,
//! and [`module`] `using`'s file resolution and cycle detection.

pub mod builtins;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod module;
pub mod pattern;
pub mod value;

pub use env::{EnvId, Environment};
pub use error::{EvalError, EvalResult};
pub use interpreter::Evaluator;
pub use value::Value;
