//! Statement language: tokenizer, AST, and recursive-descent parser.
//!
//! Parsing is purely syntactic. Whether a table or column exists is resolved
//! by the executor, so this module has no dependency on database state.

pub mod ast;
pub mod parser;
pub mod token;

pub use ast::Statement;
pub use parser::parse;
