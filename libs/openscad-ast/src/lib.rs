//! # OpenSCAD AST
//!
//! Abstract Syntax Tree types for OpenSCAD, built from the pure-Rust CST.
//!
//! ## Architecture
//!
//! ```text
//! source text -> CST (openscad-parser) -> AST (this crate) -> geometry (openscad-eval)
//! ```

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod visitor;

pub use ast::{
    Argument, Ast, BinaryOp, Expression, ModuleTag, Parameter, Statement, UnaryOp,
};
pub use diagnostic::{Diagnostic, Group, Severity};
pub use error::AstError;
pub use openscad_parser::Span;

/// Parse OpenSCAD source into an AST.
///
/// Runs the pure-Rust lexer/parser to build a CST, then transforms that CST
/// into the typed AST used by the evaluator.
///
/// ## Example
///
/// ```rust
/// use openscad_ast::parse;
///
/// let ast = parse("cube(10);").unwrap();
/// assert_eq!(ast.statements.len(), 1);
/// ```
pub fn parse(source: &str) -> Result<Ast, AstError> {
    let cst = openscad_parser::parse(source);
    visitor::cst_to_ast::transform(&cst)
}
