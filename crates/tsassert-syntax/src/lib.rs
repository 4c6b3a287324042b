//! Scanner, AST arena, and subset-grammar parser for the TypeScript
//! syntax that the site planner and escape analyzer need to walk.
//!
//! This crate does not aim to be a complete TypeScript parser. It
//! recognizes function-likes, parameters, return statements, `as`
//! casts, property/call chains, and the type-annotation grammar, and
//! degrades everything else to opaque `Unknown*` spans rather than
//! failing the whole file.

pub mod ast;
pub mod parser;
pub mod scanner;
pub mod syntax_kind;

pub use ast::{LiteralValue, NodeArena, NodeFlags, NodeIndex, PrimitiveKind, TemplateChunk};
pub use parser::{parse, ParseError, ParsedFile};
pub use scanner::{Scanner, Token};
pub use syntax_kind::{Keyword, NodeKind, TokenKind};
