//! zygon-par - Pratt parser turning a Zygon token stream into a single
//! disjoint-union AST (`ast::Node`).

pub mod ast;
pub mod parser;

pub use ast::{
    Block, CallArgument, CaseArm, InfixOp, Node, NodeKind, Param, PrefixOp, TableEntryNode,
    UsingModule,
};
pub use parser::{parse, ParseError, ParseResult, Parser};
