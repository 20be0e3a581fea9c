//! zygon-util - Core utilities shared across the lex/parse/eval pipeline.
//!
//! Holds the parts of the interpreter that aren't specific to any one phase:
//! the global symbol interner, the typed-index arena vector used for
//! environment frames, source spans, and small cross-cutting error types.

pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{IndexVecError, IndexVecResult};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;
