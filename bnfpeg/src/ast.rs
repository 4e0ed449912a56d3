use crate::utils::escape_string;
use std::fmt;

/// Right-hand side of a BNF rule, as reduced by the bootstrap parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionNode {
    Name(String),
    Literal(String),
    Optional(Box<ExpressionNode>),
    OneOrMore(Box<ExpressionNode>),
    Conjunction(Vec<ExpressionNode>),
    Disjunction(Vec<ExpressionNode>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// `:==`, members must be adjacent.
    Strict,
    /// `::=`, whitespace may separate members.
    Loose,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub body: ExpressionNode,
    pub mode: Mode,
}

impl Definition {
    pub fn new(body: ExpressionNode, mode: Mode) -> Self {
        Definition { body, mode }
    }
}

impl ExpressionNode {
    fn is_primary(&self) -> bool {
        matches!(
            self,
            ExpressionNode::Name(_) | ExpressionNode::Literal(_) | ExpressionNode::Optional(_)
        )
    }
}

/// Renders the node back as BNF text. Nodes produced by the BNF parser read
/// back to the same node; a hand-built list whose first member is a list of
/// the same kind reads back flattened.
impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Name(name) => write!(f, "<{}>", name),
            ExpressionNode::Literal(text) => write!(f, "\"{}\"", escape_string(text)),
            ExpressionNode::Optional(inner) => write!(f, "[ {} ]", inner),
            ExpressionNode::OneOrMore(inner) if inner.is_primary() => write!(f, "{}...", inner),
            ExpressionNode::OneOrMore(inner) => write!(f, "{{ {} }}...", inner),
            ExpressionNode::Conjunction(list) => {
                for (i, node) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if let ExpressionNode::Conjunction(_) | ExpressionNode::Disjunction(_) = node {
                        write!(f, "{{ {} }}", node)?;
                    } else {
                        write!(f, "{}", node)?;
                    }
                }
                Ok(())
            }
            ExpressionNode::Disjunction(list) => {
                for (i, node) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if let ExpressionNode::Disjunction(_) = node {
                        write!(f, "{{ {} }}", node)?;
                    } else {
                        write!(f, "{}", node)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Strict => write!(f, ":== {}", self.body),
            Mode::Loose => write!(f, "::= {}", self.body),
        }
    }
}
