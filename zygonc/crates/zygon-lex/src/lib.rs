//! zygon-lex - indentation-sensitive tokenizer for Zygon source.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{LexError, LexResult, Lexer};
pub use token::{Token, TokenKind};
