//! Indentation-aware tokenizer.
//!
//! Mirrors the reference tokenizer's single recursive `lexToken` dispatch,
//! but keeps nesting counters and the indent stack as fields on [`Lexer`]
//! rather than module globals, so two lexers (e.g. one per loaded module)
//! never interfere with each other.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use thiserror::Error;
use zygon_util::Span;

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("{0}: number literal cannot have more than one decimal point")]
    MultipleDecimalPoints(Span),
    #[error("{0}: expected a fractional digit after '.' in number literal")]
    TrailingDecimalPoint(Span),
    #[error("{0}: unterminated text literal")]
    UnterminatedText(Span),
    #[error("{0}: unterminated interpolation in text literal")]
    UnterminatedInterpolation(Span),
    #[error("{0}: unexpected character '{1}'")]
    UnexpectedCharacter(Span, char),
}

pub type LexResult<T> = std::result::Result<T, LexError>;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    paren_level: u32,
    brace_level: u32,
    indent_stack: Vec<u32>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            paren_level: 0,
            brace_level: 0,
            indent_stack: vec![0],
        }
    }

    /// Tokenizes the whole source, appending a trailing `Eof`.
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while !self.cursor.is_at_end() {
            self.lex_token(&mut tokens)?;
        }
        let span = self.span_at_point();
        tokens.push(Token::new(TokenKind::Eof, span));
        Ok(tokens)
    }

    fn span_at_point(&self) -> Span {
        Span::new(
            self.cursor.position(),
            self.cursor.position(),
            self.cursor.line(),
            self.cursor.column(),
        )
    }

    fn span_from(&self, start_pos: usize, start_line: u32, start_col: u32) -> Span {
        Span::new(start_pos, self.cursor.position(), start_line, start_col)
    }

    /// Lexes one "logical" token, pushing zero or more `Token`s (a comment
    /// pushes none; a newline pushes `Eol` plus any `Indent`/`Dedent`; a text
    /// literal pushes `TextStart`/`TextPart`/.../`TextEnd`).
    fn lex_token(&mut self, out: &mut Vec<Token>) -> LexResult<()> {
        let c = self.cursor.current();
        let start_pos = self.cursor.position();
        let start_line = self.cursor.line();
        let start_col = self.cursor.column();

        match c {
            '#' => {
                while self.cursor.current() != '\n' && !self.cursor.is_at_end() {
                    self.cursor.advance();
                }
                Ok(())
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut buf = String::new();
                while !self.cursor.is_at_end() {
                    let c = self.cursor.current();
                    if c.is_alphanumeric() || c == '_' {
                        buf.push(c);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                let span = self.span_from(start_pos, start_line, start_col);
                let kind = match buf.as_str() {
                    "case" => TokenKind::Case,
                    "is" => TokenKind::Is,
                    "not" => TokenKind::Not,
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "pub" => TokenKind::Pub,
                    "using" => TokenKind::Using,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "default" => TokenKind::Default,
                    _ => TokenKind::Identifier(zygon_util::Symbol::intern(&buf)),
                };
                out.push(Token::new(kind, span));
                Ok(())
            }
            '.' => {
                if self.cursor.peek(1) == '.' && self.cursor.peek(2) == '.' {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.advance();
                    out.push(Token::new(
                        TokenKind::Rest,
                        self.span_from(start_pos, start_line, start_col),
                    ));
                } else {
                    self.cursor.advance();
                    out.push(Token::new(
                        TokenKind::Dot,
                        self.span_from(start_pos, start_line, start_col),
                    ));
                }
                Ok(())
            }
            c if c.is_ascii_digit() => self.lex_number(out, start_pos, start_line, start_col),
            '"' => self.lex_text(out, start_pos, start_line, start_col),
            c if c != '\n' && c.is_whitespace() => {
                self.cursor.advance();
                Ok(())
            }
            '\n' => self.lex_newline(out),
            '(' => {
                self.paren_level += 1;
                self.cursor.advance();
                out.push(Token::new(
                    TokenKind::LParen(self.paren_level),
                    self.span_from(start_pos, start_line, start_col),
                ));
                Ok(())
            }
            ')' => {
                let depth = self.paren_level;
                self.paren_level = self.paren_level.saturating_sub(1);
                self.cursor.advance();
                out.push(Token::new(
                    TokenKind::RParen(depth),
                    self.span_from(start_pos, start_line, start_col),
                ));
                Ok(())
            }
            '{' => {
                self.brace_level += 1;
                self.cursor.advance();
                out.push(Token::new(
                    TokenKind::LBrace(self.brace_level),
                    self.span_from(start_pos, start_line, start_col),
                ));
                Ok(())
            }
            '}' => {
                let depth = self.brace_level;
                self.brace_level = self.brace_level.saturating_sub(1);
                self.cursor.advance();
                out.push(Token::new(
                    TokenKind::RBrace(depth),
                    self.span_from(start_pos, start_line, start_col),
                ));
                Ok(())
            }
            ',' => self.single(out, TokenKind::Comma, start_pos, start_line, start_col),
            '+' => self.single(out, TokenKind::Plus, start_pos, start_line, start_col),
            '-' => self.single(out, TokenKind::Minus, start_pos, start_line, start_col),
            '*' => self.single(out, TokenKind::Star, start_pos, start_line, start_col),
            '/' => self.single(out, TokenKind::Slash, start_pos, start_line, start_col),
            ':' => self.single(out, TokenKind::Colon, start_pos, start_line, start_col),
            '<' => self.single(out, TokenKind::Lt, start_pos, start_line, start_col),
            '>' => self.single(out, TokenKind::Gt, start_pos, start_line, start_col),
            other => Err(LexError::UnexpectedCharacter(
                self.span_from(start_pos, start_line, start_col),
                other,
            )),
        }
    }

    fn single(
        &mut self,
        out: &mut Vec<Token>,
        kind: TokenKind,
        start_pos: usize,
        start_line: u32,
        start_col: u32,
    ) -> LexResult<()> {
        self.cursor.advance();
        out.push(Token::new(
            kind,
            self.span_from(start_pos, start_line, start_col),
        ));
        Ok(())
    }

    fn lex_number(
        &mut self,
        out: &mut Vec<Token>,
        start_pos: usize,
        start_line: u32,
        start_col: u32,
    ) -> LexResult<()> {
        let mut buf = String::new();
        let mut has_decimal = false;
        while !self.cursor.is_at_end() {
            let c = self.cursor.current();
            if c.is_ascii_digit() || c == '_' || c == '.' {
                if c == '.' {
                    if has_decimal {
                        return Err(LexError::MultipleDecimalPoints(self.span_from(
                            start_pos, start_line, start_col,
                        )));
                    }
                    has_decimal = true;
                }
                if c == '_' {
                    self.cursor.advance();
                } else {
                    buf.push(c);
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }
        if buf.ends_with('.') {
            return Err(LexError::TrailingDecimalPoint(self.span_from(
                start_pos, start_line, start_col,
            )));
        }
        let span = self.span_from(start_pos, start_line, start_col);
        let n: f64 = buf
            .parse()
            .expect("number buffer only ever contains digits and at most one '.'");
        out.push(Token::new(TokenKind::Number(n), span));
        Ok(())
    }

    fn lex_text(
        &mut self,
        out: &mut Vec<Token>,
        start_pos: usize,
        start_line: u32,
        start_col: u32,
    ) -> LexResult<()> {
        self.cursor.advance(); // opening quote
        out.push(Token::new(
            TokenKind::TextStart,
            self.span_from(start_pos, start_line, start_col),
        ));
        let mut buf = String::new();

        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedText(self.span_at_point()));
            }
            match self.cursor.current() {
                '"' => break,
                '{' => {
                    self.brace_level += 1;
                    let interp_level = self.brace_level;
                    out.push(Token::new(TokenKind::TextPart(std::mem::take(&mut buf)), self.span_at_point()));
                    self.cursor.advance();
                    while self.cursor.current() != '}' || self.brace_level != interp_level {
                        if self.cursor.is_at_end() {
                            return Err(LexError::UnterminatedInterpolation(self.span_at_point()));
                        }
                        self.lex_token(out)?;
                    }
                    self.cursor.advance(); // closing '}'
                    self.brace_level -= 1;
                }
                '\\' => {
                    self.cursor.advance();
                    match self.cursor.current() {
                        'n' => buf.push('\n'),
                        't' => buf.push('\t'),
                        other => buf.push(other),
                    }
                    self.cursor.advance();
                }
                c => {
                    buf.push(c);
                    self.cursor.advance();
                }
            }
        }
        self.cursor.advance(); // closing quote
        out.push(Token::new(TokenKind::TextPart(buf), self.span_at_point()));
        out.push(Token::new(TokenKind::TextEnd, self.span_at_point()));
        Ok(())
    }

    fn lex_newline(&mut self, out: &mut Vec<Token>) -> LexResult<()> {
        let span = self.span_at_point();
        self.cursor.advance();
        if self.paren_level != 0 {
            return Ok(());
        }
        out.push(Token::new(TokenKind::Eol, span));

        let mut current_indent = 0u32;
        if !self.cursor.is_at_end() {
            loop {
                match self.cursor.current() {
                    ' ' => {
                        current_indent += 1;
                        self.cursor.advance();
                    }
                    '\t' => {
                        current_indent += 4;
                        self.cursor.advance();
                    }
                    _ => break,
                }
            }
        }

        loop {
            let top = *self.indent_stack.last().expect("indent stack never empty");
            if current_indent == top {
                break;
            } else if current_indent > top {
                self.indent_stack.push(current_indent);
                out.push(Token::new(TokenKind::Indent(current_indent), span));
            } else {
                self.indent_stack.pop();
                out.push(Token::new(TokenKind::Dedent, span));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_arithmetic() {
        assert_eq!(
            kinds("1 + 2"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_rest_before_dot() {
        assert_eq!(
            kinds("a...b.c"),
            vec![
                TokenKind::Identifier(zygon_util::Symbol::intern("a")),
                TokenKind::Rest,
                TokenKind::Identifier(zygon_util::Symbol::intern("b")),
                TokenKind::Dot,
                TokenKind::Identifier(zygon_util::Symbol::intern("c")),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_with_underscore_separators() {
        assert_eq!(
            kinds("1_000.5"),
            vec![TokenKind::Number(1000.5), TokenKind::Eof]
        );
    }

    #[test]
    fn trailing_decimal_point_is_an_error() {
        let err = Lexer::new("1.").tokenize().unwrap_err();
        assert!(matches!(err, LexError::TrailingDecimalPoint(_)));
    }

    #[test]
    fn indentation_produces_balanced_indent_dedent() {
        let toks = kinds("a:\n  b\nc");
        let indents = toks.iter().filter(|t| matches!(t, TokenKind::Indent(_))).count();
        let dedents = toks.iter().filter(|t| matches!(t, TokenKind::Dedent)).count();
        assert_eq!(indents, dedents);
    }

    #[test]
    fn simple_text_literal() {
        assert_eq!(
            kinds("\"hi\""),
            vec![
                TokenKind::TextStart,
                TokenKind::TextPart("hi".to_string()),
                TokenKind::TextEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn interpolated_text_literal_reenters_tokenizer() {
        assert_eq!(
            kinds("\"x={x}\""),
            vec![
                TokenKind::TextStart,
                TokenKind::TextPart("x=".to_string()),
                TokenKind::Identifier(zygon_util::Symbol::intern("x")),
                TokenKind::TextPart("".to_string()),
                TokenKind::TextEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_braces_inside_interpolation_do_not_close_early() {
        let toks = kinds("\"{ t }\"");
        assert!(toks.contains(&TokenKind::Identifier(zygon_util::Symbol::intern("t"))));
    }

    #[test]
    fn newline_inside_parens_is_not_eol() {
        let toks = kinds("(1,\n2)");
        assert!(!toks.iter().any(|t| matches!(t, TokenKind::Eol)));
    }

    #[test]
    fn comment_is_skipped() {
        assert_eq!(
            kinds("# comment\n1"),
            vec![TokenKind::Eol, TokenKind::Number(1.0), TokenKind::Eof]
        );
    }
}
