//! Pratt (precedence-climbing) parser producing a single [`ast::Node`] sum
//! type. Mirrors the reference parser's dispatch structure (a prefix
//! position per token kind, an infix position per operator) but threads
//! parser state through `&mut self` fields instead of a mutated token
//! stream and module-level globals.

use thiserror::Error;
use zygon_lex::{Token, TokenKind};
use zygon_util::{Span, Symbol};

use crate::ast::{
    Block, CallArgument, CaseArm, InfixOp, Node, NodeKind, Param, PrefixOp, TableEntryNode,
    UsingModule,
};

/// Binding-power ladder, lowest to highest. Matches the reference parser's
/// `LOWEST < OR < AND < EQUALS < LESSGREATER < SUM < PRODUCT < PREFIX < CALL
/// < ACCESS` precedence table.
pub mod bp {
    pub const LOWEST: u8 = 0;
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    pub const EQUALS: u8 = 3;
    pub const LESSGREATER: u8 = 4;
    pub const SUM: u8 = 5;
    pub const PRODUCT: u8 = 6;
    pub const PREFIX: u8 = 7;
    pub const CALL: u8 = 8;
    pub const ACCESS: u8 = 9;
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{0}: unexpected token {1:?}")]
    UnexpectedToken(Span, TokenKind),
    #[error("{0}: expected {1}, found {2:?}")]
    Expected(Span, &'static str, TokenKind),
    #[error("{0}: unterminated parenthesized group")]
    UnclosedParen(Span),
    #[error("{0}: case expression must contain at least one indented arm")]
    EmptyCase(Span),
    #[error("{0}: a case expression cannot have more than one default arm")]
    DuplicateDefault(Span),
    #[error("{0}: expected a module path after `using`")]
    EmptyUsing(Span),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    parsing_case: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            parsing_case: false,
        }
    }

    /// Parses the whole token stream as a top-level body (equivalent to the
    /// reference parser's `Program`).
    pub fn parse_program(&mut self) -> ParseResult<Block> {
        let mut body = Vec::new();
        loop {
            while matches!(self.current().kind, TokenKind::Eol) {
                self.advance();
            }
            if matches!(self.current().kind, TokenKind::Eof) {
                break;
            }
            body.push(self.parse_statement_or_expression()?);
        }
        Ok(body)
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn expect_colon(&mut self) -> ParseResult<()> {
        if matches!(self.current().kind, TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::Expected(
                self.current().span,
                "`:`",
                self.current().kind.clone(),
            ))
        }
    }

    fn at_rparen_depth(&self, depth: u32) -> bool {
        matches!(self.current().kind, TokenKind::RParen(d) if d == depth)
    }

    fn at_rbrace_depth(&self, depth: u32) -> bool {
        matches!(self.current().kind, TokenKind::RBrace(d) if d == depth)
    }

    /// Scans forward from the current `LParen(depth)` to find the index of
    /// the matching `RParen(depth)` (same depth value; inner parens carry a
    /// strictly higher depth and so are skipped automatically).
    fn index_of_matching_rparen(&self, depth: u32) -> usize {
        let mut i = self.pos;
        loop {
            if let TokenKind::RParen(d) = self.tokens[i].kind {
                if d == depth {
                    return i;
                }
            }
            i += 1;
            if i >= self.tokens.len() {
                return self.tokens.len() - 1;
            }
        }
    }

    fn precedence_of(kind: &TokenKind) -> u8 {
        match kind {
            TokenKind::Dot => bp::ACCESS,
            TokenKind::Is => bp::EQUALS,
            TokenKind::Lt | TokenKind::Gt => bp::LESSGREATER,
            TokenKind::Plus | TokenKind::Minus => bp::SUM,
            TokenKind::Star | TokenKind::Slash => bp::PRODUCT,
            TokenKind::And => bp::AND,
            TokenKind::Or => bp::OR,
            TokenKind::LParen(_) => bp::CALL,
            _ => bp::LOWEST,
        }
    }

    fn parse_statement_or_expression(&mut self) -> ParseResult<Node> {
        match (&self.current().kind, &self.peek(1).kind) {
            (TokenKind::Identifier(_), TokenKind::Colon) => self.parse_assignment_statement(),
            _ if matches!(self.current().kind, TokenKind::Using) => self.parse_using_statement(),
            _ if matches!(self.current().kind, TokenKind::Pub) => self.parse_pub_statement(),
            _ => self.parse_expression(bp::LOWEST),
        }
    }

    fn parse_assignment_statement(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        let name = match self.advance().kind {
            TokenKind::Identifier(s) => s,
            _ => unreachable!("caller checked for Identifier"),
        };
        self.expect_colon()?;
        let value = self.parse_block()?;
        Ok(Node::new(NodeKind::AssignmentStatement { name, value }, span))
    }

    fn parse_pub_statement(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `pub`
        let inner = if matches!(self.current().kind, TokenKind::Identifier(_))
            && matches!(self.peek(1).kind, TokenKind::Colon)
        {
            self.parse_assignment_statement()?
        } else {
            self.parse_expression(bp::LOWEST)?
        };
        Ok(Node::new(NodeKind::PubStatement(Box::new(inner)), span))
    }

    fn parse_using_path(&mut self) -> ParseResult<Vec<Symbol>> {
        let mut path = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Identifier(s) => {
                    path.push(s);
                    self.advance();
                }
                _ => {
                    return Err(ParseError::Expected(
                        self.current().span,
                        "an identifier in a module path",
                        self.current().kind.clone(),
                    ))
                }
            }
            if matches!(self.current().kind, TokenKind::Dot)
                && matches!(self.peek(1).kind, TokenKind::Identifier(_))
            {
                self.advance(); // `.`
            } else {
                break;
            }
        }
        Ok(path)
    }

    fn parse_using_statement(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `using`
        let mut modules = Vec::new();
        loop {
            if matches!(self.current().kind, TokenKind::Eol | TokenKind::Eof) {
                break;
            }
            let path = self.parse_using_path()?;
            let mut symbols = Vec::new();
            if matches!(self.current().kind, TokenKind::Dot)
                && matches!(self.peek(1).kind, TokenKind::LParen(_))
            {
                self.advance(); // `.`
                self.advance(); // `(`
                loop {
                    match self.current().kind {
                        TokenKind::RParen(_) => {
                            self.advance();
                            break;
                        }
                        TokenKind::Identifier(s) => {
                            symbols.push(s);
                            self.advance();
                            if matches!(self.current().kind, TokenKind::Comma) {
                                self.advance();
                            }
                        }
                        TokenKind::Eol => {
                            self.advance();
                        }
                        _ => {
                            return Err(ParseError::Expected(
                                self.current().span,
                                "a symbol name or `)`",
                                self.current().kind.clone(),
                            ))
                        }
                    }
                }
            }
            modules.push(UsingModule { path, symbols });
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        if modules.is_empty() {
            return Err(ParseError::EmptyUsing(span));
        }
        Ok(Node::new(NodeKind::UsingStatement(modules), span))
    }

    /// A block is either a single inline expression (`name: expr`) or an
    /// indented sequence of statements/expressions closed by a matching
    /// dedent.
    fn parse_block(&mut self) -> ParseResult<Block> {
        if !matches!(self.current().kind, TokenKind::Eol) {
            return Ok(vec![self.parse_expression(bp::LOWEST)?]);
        }
        self.advance(); // Eol
        if !matches!(self.current().kind, TokenKind::Indent(_)) {
            return Err(ParseError::Expected(
                self.current().span,
                "an indented block",
                self.current().kind.clone(),
            ));
        }
        self.advance(); // Indent
        let mut body = Vec::new();
        loop {
            while matches!(self.current().kind, TokenKind::Eol) {
                self.advance();
            }
            if matches!(self.current().kind, TokenKind::Dedent) {
                self.advance();
                break;
            }
            body.push(self.parse_statement_or_expression()?);
        }
        Ok(body)
    }

    fn parse_expression(&mut self, min_bp: u8) -> ParseResult<Node> {
        let mut left = self.parse_prefix()?;
        loop {
            let prec = Self::precedence_of(&self.current().kind);
            if prec <= min_bp {
                break;
            }
            left = self.parse_infix(left, prec)?;
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        match self.current().kind.clone() {
            TokenKind::Identifier(s) => {
                self.advance();
                Ok(Node::new(NodeKind::Identifier(s), span))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Node::new(NodeKind::NumberLiteral(n), span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::new(NodeKind::BooleanLiteral(true), span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::new(NodeKind::BooleanLiteral(false), span))
            }
            TokenKind::Not => {
                self.advance();
                let right = self.parse_expression(bp::PREFIX)?;
                Ok(Node::new(
                    NodeKind::Prefix {
                        op: PrefixOp::Not,
                        right: Box::new(right),
                    },
                    span,
                ))
            }
            TokenKind::Minus => {
                self.advance();
                let right = self.parse_expression(bp::PREFIX)?;
                Ok(Node::new(
                    NodeKind::Prefix {
                        op: PrefixOp::Negate,
                        right: Box::new(right),
                    },
                    span,
                ))
            }
            TokenKind::LParen(_) => self.resolve_lparen(),
            TokenKind::Case => self.parse_case_expression(),
            TokenKind::TextStart => self.parse_text_literal(),
            TokenKind::LBrace(_) => self.parse_table_literal(),
            TokenKind::Rest => self.parse_rest_operator(),
            other => Err(ParseError::UnexpectedToken(span, other)),
        }
    }

    fn parse_infix(&mut self, left: Node, prec: u8) -> ParseResult<Node> {
        match self.current().kind {
            TokenKind::LParen(_) => self.parse_function(Some(left)),
            TokenKind::Dot => self.parse_access(left),
            TokenKind::Is => self.parse_is_expression(left, prec),
            _ => self.parse_binary_infix(left, prec),
        }
    }

    fn parse_binary_infix(&mut self, left: Node, prec: u8) -> ParseResult<Node> {
        let span = self.current().span;
        let op = match self.current().kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Subtract,
            TokenKind::Star => InfixOp::Multiply,
            TokenKind::Slash => InfixOp::Divide,
            TokenKind::Lt => InfixOp::LessThan,
            TokenKind::Gt => InfixOp::GreaterThan,
            TokenKind::And => InfixOp::And,
            TokenKind::Or => InfixOp::Or,
            ref other => return Err(ParseError::UnexpectedToken(span, other.clone())),
        };
        self.advance();
        let right = self.parse_expression(prec)?;
        Ok(Node::new(
            NodeKind::Infix {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_is_expression(&mut self, left: Node, prec: u8) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `is`
        let op = if matches!(self.current().kind, TokenKind::Not) {
            self.advance();
            InfixOp::IsNot
        } else {
            InfixOp::Is
        };
        let right = self.parse_expression(prec)?;
        Ok(Node::new(
            NodeKind::Infix {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_access(&mut self, left: Node) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `.`
        let attribute = match self.current().kind {
            TokenKind::Identifier(s) => {
                self.advance();
                Node::new(NodeKind::Identifier(s), span)
            }
            TokenKind::LParen(_) => {
                let grouped = self.parse_grouped_expression()?;
                Node::new(NodeKind::Grouped(Box::new(grouped)), span)
            }
            ref other => {
                return Err(ParseError::Expected(
                    span,
                    "an identifier or `(` after `.`",
                    other.clone(),
                ))
            }
        };
        Ok(Node::new(
            NodeKind::Access {
                subject: Box::new(left),
                attribute: Box::new(attribute),
            },
            span,
        ))
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Node> {
        let depth = match self.current().kind {
            TokenKind::LParen(d) => d,
            _ => unreachable!("caller checked for LParen"),
        };
        self.advance(); // `(`
        let expr = self.parse_expression(bp::LOWEST)?;
        if !self.at_rparen_depth(depth) {
            return Err(ParseError::UnclosedParen(self.current().span));
        }
        self.advance(); // `)`
        Ok(expr)
    }

    fn resolve_lparen(&mut self) -> ParseResult<Node> {
        let depth = match self.current().kind {
            TokenKind::LParen(d) => d,
            _ => unreachable!(),
        };
        let close_idx = self.index_of_matching_rparen(depth);
        let followed_by_colon =
            matches!(self.tokens.get(close_idx + 1).map(|t| &t.kind), Some(TokenKind::Colon));
        // While parsing a `case` pattern, a parenthesized group directly
        // followed by `:` is the pattern's own closing colon, not the start
        // of an anonymous function declaration — `parsing_case` suppresses
        // the declaration reading here exactly as it does in infix position.
        if followed_by_colon && !self.parsing_case {
            self.parse_function(None)
        } else {
            self.parse_grouped_expression()
        }
    }

    /// Handles both an anonymous/named function *declaration* (`(params):`)
    /// and an ordinary *call* (`callee(args)`), exactly as the reference
    /// parser's single `parseFunction` entry point does, disambiguated by
    /// whether a `:` follows the matching `)`.
    fn parse_function(&mut self, callee: Option<Node>) -> ParseResult<Node> {
        let span = self.current().span;
        let depth = match self.current().kind {
            TokenKind::LParen(d) => d,
            _ => unreachable!(),
        };
        let close_idx = self.index_of_matching_rparen(depth);
        let followed_by_colon =
            matches!(self.tokens.get(close_idx + 1).map(|t| &t.kind), Some(TokenKind::Colon));

        let is_declaration = match &callee {
            None => true,
            Some(node) => {
                !self.parsing_case
                    && followed_by_colon
                    && matches!(node.kind, NodeKind::Identifier(_))
            }
        };

        if is_declaration {
            let name = match &callee {
                Some(Node {
                    kind: NodeKind::Identifier(s),
                    ..
                }) => Some(*s),
                _ => None,
            };
            self.parse_function_declaration(name, depth, span)
        } else {
            self.parse_function_call(callee.expect("call always has a callee"), depth, span)
        }
    }

    fn parse_function_declaration(
        &mut self,
        name: Option<Symbol>,
        depth: u32,
        span: Span,
    ) -> ParseResult<Node> {
        self.advance(); // `(`
        let mut params = Vec::new();
        let mut rest = None;
        while !self.at_rparen_depth(depth) {
            match self.current().kind {
                TokenKind::Identifier(s) => {
                    self.advance();
                    let mut default = None;
                    if matches!(self.current().kind, TokenKind::Colon) {
                        self.advance();
                        default = Some(self.parse_expression(bp::LOWEST)?);
                    }
                    if matches!(self.current().kind, TokenKind::Comma) {
                        self.advance();
                    } else if !self.at_rparen_depth(depth) {
                        return Err(ParseError::Expected(
                            self.current().span,
                            "`,` between parameters",
                            self.current().kind.clone(),
                        ));
                    }
                    params.push(Param { name: s, default });
                }
                TokenKind::Rest => {
                    self.advance();
                    match self.current().kind {
                        TokenKind::Identifier(s) => {
                            self.advance();
                            rest = Some(s);
                        }
                        ref other => {
                            return Err(ParseError::Expected(
                                self.current().span,
                                "a parameter name after `...`",
                                other.clone(),
                            ))
                        }
                    }
                }
                ref other => {
                    return Err(ParseError::Expected(
                        self.current().span,
                        "a parameter name",
                        other.clone(),
                    ))
                }
            }
        }
        self.advance(); // `)`
        self.expect_colon()?;
        let body = self.parse_block()?;
        Ok(Node::new(
            NodeKind::FunctionDeclaration {
                name,
                params,
                rest,
                body,
            },
            span,
        ))
    }

    fn parse_function_call(&mut self, callee: Node, depth: u32, span: Span) -> ParseResult<Node> {
        self.advance(); // `(`
        let mut arguments = Vec::new();
        while !self.at_rparen_depth(depth) {
            let name = if matches!(self.current().kind, TokenKind::Identifier(_))
                && matches!(self.peek(1).kind, TokenKind::Colon)
            {
                let n = match self.current().kind {
                    TokenKind::Identifier(s) => s,
                    _ => unreachable!(),
                };
                self.advance();
                self.advance();
                Some(n)
            } else {
                None
            };
            let value = self.parse_expression(bp::LOWEST)?;
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
            } else if !self.at_rparen_depth(depth) {
                return Err(ParseError::Expected(
                    self.current().span,
                    "`,` between arguments",
                    self.current().kind.clone(),
                ));
            }
            arguments.push(CallArgument { name, value });
        }
        self.advance(); // `)`
        Ok(Node::new(
            NodeKind::FunctionCall {
                callee: Box::new(callee),
                arguments,
            },
            span,
        ))
    }

    fn parse_rest_operator(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `...`
        let stops_here = matches!(
            self.current().kind,
            TokenKind::RBrace(_) | TokenKind::RParen(_) | TokenKind::Eol | TokenKind::Comma
        );
        if stops_here {
            return Ok(Node::new(NodeKind::RestOperator(None), span));
        }
        let value = self.parse_expression(bp::LOWEST)?;
        Ok(Node::new(NodeKind::RestOperator(Some(Box::new(value))), span))
    }

    fn parse_table_literal(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        let depth = match self.current().kind {
            TokenKind::LBrace(d) => d,
            _ => unreachable!(),
        };
        self.advance(); // `{`
        let mut entries = Vec::new();
        while !self.at_rbrace_depth(depth) {
            match self.current().kind {
                TokenKind::Comma | TokenKind::Eol | TokenKind::Indent(_) | TokenKind::Dedent => {
                    self.advance();
                }
                TokenKind::Identifier(s) if matches!(self.peek(1).kind, TokenKind::Colon) => {
                    self.advance();
                    self.advance();
                    let value = self.parse_expression(bp::LOWEST)?;
                    entries.push(TableEntryNode {
                        key: Some(s),
                        value,
                    });
                }
                _ => {
                    let value = self.parse_expression(bp::LOWEST)?;
                    entries.push(TableEntryNode { key: None, value });
                }
            }
        }
        self.advance(); // `}`
        Ok(Node::new(NodeKind::TableLiteral(entries), span))
    }

    fn parse_case_expression(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // `case`
        let was_parsing_case = self.parsing_case;
        self.parsing_case = true;

        let subject = if !matches!(self.current().kind, TokenKind::Colon) {
            Some(Box::new(self.parse_expression(bp::LOWEST)?))
        } else {
            None
        };
        self.expect_colon()?;
        if !matches!(self.current().kind, TokenKind::Eol) {
            self.parsing_case = was_parsing_case;
            return Err(ParseError::Expected(
                self.current().span,
                "a newline after `case ...:`",
                self.current().kind.clone(),
            ));
        }
        self.advance(); // Eol
        if !matches!(self.current().kind, TokenKind::Indent(_)) {
            self.parsing_case = was_parsing_case;
            return Err(ParseError::EmptyCase(span));
        }
        self.advance(); // Indent

        let mut cases = Vec::new();
        let mut default = None;
        loop {
            while matches!(self.current().kind, TokenKind::Eol) {
                self.advance();
            }
            if matches!(self.current().kind, TokenKind::Dedent) {
                self.advance();
                break;
            }
            if matches!(self.current().kind, TokenKind::Default) {
                self.advance();
                self.expect_colon()?;
                let block = self.parse_block()?;
                if default.is_some() {
                    self.parsing_case = was_parsing_case;
                    return Err(ParseError::DuplicateDefault(span));
                }
                default = Some(block);
            } else {
                let pattern = self.parse_expression(bp::LOWEST)?;
                self.expect_colon()?;
                let body = self.parse_block()?;
                cases.push(CaseArm { pattern, body });
            }
        }
        self.parsing_case = was_parsing_case;
        Ok(Node::new(
            NodeKind::CaseExpression {
                subject,
                cases,
                default,
            },
            span,
        ))
    }

    fn parse_text_literal(&mut self) -> ParseResult<Node> {
        let span = self.current().span;
        self.advance(); // TextStart
        let mut parts = Vec::new();
        loop {
            match self.current().kind.clone() {
                TokenKind::TextEnd => {
                    self.advance();
                    break;
                }
                TokenKind::TextPart(s) => {
                    let part_span = self.current().span;
                    self.advance();
                    parts.push(Node::new(NodeKind::TextPart(s), part_span));
                }
                _ => {
                    parts.push(self.parse_expression(bp::LOWEST)?);
                }
            }
        }
        Ok(Node::new(NodeKind::TextLiteral(parts), span))
    }
}

/// Parses a complete token stream (as produced by `zygon_lex::Lexer`) into a
/// top-level body.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Block> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zygon_lex::Lexer;

    fn parse_src(src: &str) -> Block {
        let tokens = Lexer::new(src).tokenize().expect("lex ok");
        parse(tokens).expect("parse ok")
    }

    #[test]
    fn parses_arithmetic_with_precedence() {
        let body = parse_src("1 + 2 * 3");
        assert_eq!(body.len(), 1);
        match &body[0].kind {
            NodeKind::Infix { op: InfixOp::Add, right, .. } => {
                assert!(matches!(right.kind, NodeKind::Infix { op: InfixOp::Multiply, .. }));
            }
            other => panic!("expected an Add infix, got {other:?}"),
        }
    }

    #[test]
    fn parses_grouped_expression() {
        let body = parse_src("(1 + 2) * 3");
        match &body[0].kind {
            NodeKind::Infix { op: InfixOp::Multiply, left, .. } => {
                assert!(matches!(left.kind, NodeKind::Infix { op: InfixOp::Add, .. }));
            }
            other => panic!("expected a Multiply infix, got {other:?}"),
        }
    }

    #[test]
    fn parses_anonymous_function_declaration() {
        let body = parse_src("(x, y: 1): x + y");
        match &body[0].kind {
            NodeKind::FunctionDeclaration { name, params, .. } => {
                assert!(name.is_none());
                assert_eq!(params.len(), 2);
                assert!(params[1].default.is_some());
            }
            other => panic!("expected a FunctionDeclaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_named_function_declaration_vs_call() {
        let decl = parse_src("add(a, b): a + b");
        assert!(matches!(decl[0].kind, NodeKind::FunctionDeclaration { .. }));

        let call = parse_src("add(1, 2)");
        assert!(matches!(call[0].kind, NodeKind::FunctionCall { .. }));
    }

    #[test]
    fn parses_rest_parameter() {
        let body = parse_src("f(...rest): rest");
        match &body[0].kind {
            NodeKind::FunctionDeclaration { rest, .. } => assert!(rest.is_some()),
            other => panic!("expected a FunctionDeclaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_table_literal_with_mixed_entries() {
        let body = parse_src("{ 1, name: \"a\", ...rest }");
        match &body[0].kind {
            NodeKind::TableLiteral(entries) => {
                assert_eq!(entries.len(), 3);
                assert!(entries[0].key.is_none());
                assert_eq!(entries[1].key.is_some(), true);
                assert!(matches!(entries[2].value.kind, NodeKind::RestOperator(_)));
            }
            other => panic!("expected a TableLiteral, got {other:?}"),
        }
    }

    #[test]
    fn parses_case_expression_with_default() {
        let src = "case x:\n  1: \"one\"\n  default: \"other\"\n";
        let body = parse_src(src);
        match &body[0].kind {
            NodeKind::CaseExpression { subject, cases, default } => {
                assert!(subject.is_some());
                assert_eq!(cases.len(), 1);
                assert!(default.is_some());
            }
            other => panic!("expected a CaseExpression, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_case_pattern_is_not_mistaken_for_a_lambda() {
        let src = "case x:\n  (1): \"one\"\n";
        let body = parse_src(src);
        match &body[0].kind {
            NodeKind::CaseExpression { cases, .. } => {
                assert_eq!(cases.len(), 1);
                assert!(matches!(cases[0].pattern.kind, NodeKind::NumberLiteral(n) if n == 1.0));
            }
            other => panic!("expected a CaseExpression, got {other:?}"),
        }
    }

    #[test]
    fn parses_assignment_statement() {
        let body = parse_src("x: 1 + 2");
        assert!(matches!(body[0].kind, NodeKind::AssignmentStatement { .. }));
    }

    #[test]
    fn parses_using_statement_with_symbols() {
        let body = parse_src("using IO.(log, get)\n");
        match &body[0].kind {
            NodeKind::UsingStatement(modules) => {
                assert_eq!(modules.len(), 1);
                assert_eq!(modules[0].symbols.len(), 2);
            }
            other => panic!("expected a UsingStatement, got {other:?}"),
        }
    }

    #[test]
    fn parses_access_chain() {
        let body = parse_src("a.b.c");
        assert!(matches!(body[0].kind, NodeKind::Access { .. }));
    }

    #[test]
    fn parses_interpolated_text_literal() {
        let body = parse_src("\"x={x}!\"");
        match &body[0].kind {
            NodeKind::TextLiteral(parts) => {
                assert_eq!(parts.len(), 3);
                assert!(matches!(parts[1].kind, NodeKind::Identifier(_)));
            }
            other => panic!("expected a TextLiteral, got {other:?}"),
        }
    }
}
