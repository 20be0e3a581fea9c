//! Token kinds produced by the tokenizer.

use zygon_util::{Span, Symbol};

/// A lexed token: a [`TokenKind`] plus the source span it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// `LParen`/`RParen`/`LBrace`/`RBrace` carry the bracket-nesting depth they
/// sit at (1 = outermost) so the parser can scan ahead to a matching close
/// bracket by depth rather than maintaining its own paren stack.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Identifier(Symbol),
    True,
    False,

    /// Opens an interpolated text literal. Always paired with a `TextEnd`.
    TextStart,
    /// A literal run of characters inside a text literal.
    TextPart(String),
    /// Closes an interpolated text literal.
    TextEnd,

    Is,
    Not,
    And,
    Or,
    Case,
    Default,
    Pub,
    Using,

    /// `...`
    Rest,

    LParen(u32),
    RParen(u32),
    LBrace(u32),
    RBrace(u32),

    Colon,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,

    /// End of a logical line; only emitted while bracket nesting is zero.
    Eol,
    /// Indentation increased; payload is the new column width.
    Indent(u32),
    /// Indentation decreased by one level.
    Dedent,
    Eof,
}

impl TokenKind {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }
}
