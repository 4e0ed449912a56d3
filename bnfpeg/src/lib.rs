//! A parsing expression grammar interpreter with semantic actions, and a
//! compiler from BNF text to grammars for it.
//!
//! Expressions live in an [`Exprs`] arena and are referred to by [`ExprId`]
//! handles. A [`Grammar`] adds named rules and actions, and a [`Parser`]
//! interprets it against some input, threading caller state through the
//! actions:
//!
//! ```
//! use bnfpeg::{Grammar, Parser};
//!
//! let mut g: Grammar<Vec<u64>> = Grammar::new();
//! let e = &g.exprs;
//! let num = g.actions.on(e.plus(e.one_of("0123456789")), |s, st| {
//!     st.push(s.parse().unwrap())
//! });
//! let sum = g.actions.on(e.seq([e.one_of("+"), num]), |_, st| {
//!     let b = st.pop().unwrap();
//!     let a = st.pop().unwrap();
//!     st.push(a + b);
//! });
//! let expr = e.seq([num, e.star(sum)]);
//!
//! let mut stack = Vec::new();
//! assert!(Parser::new(&g).accept(expr, "1+2+3", &mut stack).unwrap());
//! assert_eq!(stack, vec![6]);
//! ```
//!
//! BNF text is read into [`Definition`](ast::Definition)s by
//! [`parser::BnfParser`]; a [`Syntax`] orders the rules by their strongly
//! connected components and builds one expression per rule.

use std::collections::BTreeMap;

pub mod ast;
pub mod builtin;
mod check;
mod engine;
pub mod error;
mod expr;
mod grammar;
mod handle;
pub mod parser;
mod syntax;
pub mod tarjan;
mod utils;

pub use engine::Parser;
pub use error::Error;
pub use expr::{CharClass, Exprs};
pub use grammar::{Action, Actions, Grammar};
pub use handle::ExprId;
pub use syntax::{LooseWhitespace, Syntax, SyntaxOptions};

use builtin::Builtins;

/// Compile the BNF rules in `source` into expressions in `exprs`, returning
/// the rule table.
///
/// Undefined names are looked up in `predefined` first and then among the
/// [`builtin`] primitives.
pub fn build_rules(
    source: &str,
    options: SyntaxOptions,
    exprs: &Exprs,
    predefined: BTreeMap<String, ExprId>,
) -> Result<BTreeMap<String, ExprId>, Error> {
    let definitions = parser::parse_definitions(source)?;

    let syntax = Syntax::new(definitions, options)?;

    let mut seed = Builtins::init(exprs).predefine(&syntax.missing_rules());
    seed.extend(predefined);

    Ok(syntax.make_rules(exprs, seed)?)
}
