use crate::ExprId;
use thiserror::Error;

/// Raised while building expressions, before any input is parsed.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("range: first element of range must be a single character.")]
    RangeFirst,
    #[error("range: last element of range must be a single character.")]
    RangeLast,
    #[error("range: last must be less than or equal to first.")]
    RangeOrder { lo: char, hi: char },
    #[error("expression {0} is not a forward declaration")]
    NotForward(ExprId),
    #[error("forward declaration {0} has already been implemented")]
    AlreadyImplemented(ExprId),
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Programmer errors detected while interpreting an expression. These are
/// distinct from a plain failure to match, which is `Ok(false)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unresolved forward declaration {0}")]
    UnresolvedForward(ExprId),
    #[error("no such rule '{0}'")]
    NoSuchRule(String),
}

/// Raised while turning parsed BNF definitions into expressions.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("whitespace rule <{0}> is not defined")]
    WhitespaceUndefined(String),
    #[error("whitespace rule <{0}> must be strict (:==)")]
    WhitespaceNotStrict(String),
    #[error("rule <{rule}> refers to undefined name <{name}>")]
    UndefinedName { rule: String, name: String },
    #[error("<{0}> is neither defined nor predefined")]
    Unpredefined(String),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Raised while reading BNF source text into definitions.
#[derive(Debug, Error)]
pub enum BnfError {
    #[error("line {line}: cannot parse rule: {text}")]
    Syntax { line: usize, text: String },
    #[error("duplicate rule <{0}>")]
    DuplicateRule(String),
    #[error("internal error reducing rule: {0}")]
    Reduction(&'static str),
    #[error(transparent)]
    Engine(#[from] ParseError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Any failure of [`build_rules`](crate::build_rules).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bnf(#[from] BnfError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
