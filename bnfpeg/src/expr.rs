use crate::error::GrammarError;
use crate::ExprId;
use regex::Regex;
use std::cell::{Ref, RefCell};
use unicode_xid::UnicodeXID;

/// Unicode character classes that cannot be spelled out as a character set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Whitespace,
    XidStart,
    XidContinue,
}

impl CharClass {
    pub fn contains(self, ch: char) -> bool {
        match self {
            CharClass::Whitespace => ch.is_whitespace(),
            CharClass::XidStart => UnicodeXID::is_xid_start(ch),
            CharClass::XidContinue => UnicodeXID::is_xid_continue(ch),
        }
    }
}

/// The content of one arena slot. Composite variants refer to their children
/// by handle, so the arena owns all structure and cycles only exist as
/// handle values.
#[derive(Clone, Debug)]
pub enum Node {
    Any,
    OneOf(String),
    NoneOf(String),
    Literal(String),
    CharRange(char, char),
    Class(CharClass),
    /// Anchored at the cursor; built from the user's pattern as `^(?:...)`.
    Pattern(Regex),
    Sequence(Vec<ExprId>),
    OrderedChoice(Vec<ExprId>),
    ZeroOrMore(ExprId),
    OneOrMore(ExprId),
    Lookahead(ExprId),
    NegativeLookahead(ExprId),
    /// Looked up by name in the grammar's rule table when evaluated.
    Rule(String),
    /// A promoted forward whose definition was another placeholder at the
    /// time of promotion.
    Alias(ExprId),
    Forward,
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) node: Node,
    promoted: bool,
}

/// Arena of expression nodes.
///
/// Constructors take `&self` so that expressions can be nested inline:
/// `e.seq([e.one_of("+-"), e.plus(digit)])`. Every node except a
/// [`forward`](Exprs::forward) placeholder is immutable once built.
#[derive(Debug, Default)]
pub struct Exprs {
    slots: RefCell<Vec<Slot>>,
}

impl Exprs {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, node: Node) -> ExprId {
        let mut slots = self.slots.borrow_mut();
        let id = ExprId::new(slots.len());
        slots.push(Slot {
            node,
            promoted: false,
        });
        id
    }

    pub(crate) fn slots(&self) -> Ref<'_, Vec<Slot>> {
        self.slots.borrow()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_forward(&self, id: ExprId) -> bool {
        matches!(self.slots.borrow()[id.index()].node, Node::Forward)
    }

    /// Matches any single character.
    pub fn any(&self) -> ExprId {
        self.push(Node::Any)
    }

    /// Matches one character contained in `chars`.
    pub fn one_of(&self, chars: &str) -> ExprId {
        self.push(Node::OneOf(chars.to_owned()))
    }

    /// Matches one character not contained in `chars`. Fails at end of input.
    pub fn none_of(&self, chars: &str) -> ExprId {
        self.push(Node::NoneOf(chars.to_owned()))
    }

    pub fn literal(&self, text: &str) -> ExprId {
        self.push(Node::Literal(text.to_owned()))
    }

    /// Inclusive character range given as two one-character strings.
    pub fn range(&self, lo: &str, hi: &str) -> Result<ExprId, GrammarError> {
        let lo = single_char(lo).ok_or(GrammarError::RangeFirst)?;
        let hi = single_char(hi).ok_or(GrammarError::RangeLast)?;

        self.char_range(lo, hi)
    }

    pub fn char_range(&self, lo: char, hi: char) -> Result<ExprId, GrammarError> {
        if lo > hi {
            return Err(GrammarError::RangeOrder { lo, hi });
        }

        Ok(self.push(Node::CharRange(lo, hi)))
    }

    pub fn class(&self, class: CharClass) -> ExprId {
        self.push(Node::Class(class))
    }

    /// Regular expression terminal, matched only at the cursor.
    pub fn pattern(&self, re: &str) -> Result<ExprId, GrammarError> {
        let re = Regex::new(&format!("^(?:{})", re))?;

        Ok(self.push(Node::Pattern(re)))
    }

    /// An empty sequence always succeeds; a single child is returned as is.
    pub fn seq(&self, children: impl IntoIterator<Item = ExprId>) -> ExprId {
        let children: Vec<ExprId> = children.into_iter().collect();

        if let [only] = children[..] {
            return only;
        }

        self.push(Node::Sequence(children))
    }

    /// An empty choice never succeeds; a single child is returned as is.
    pub fn choice(&self, children: impl IntoIterator<Item = ExprId>) -> ExprId {
        let children: Vec<ExprId> = children.into_iter().collect();

        if let [only] = children[..] {
            return only;
        }

        self.push(Node::OrderedChoice(children))
    }

    pub fn star(&self, inner: ExprId) -> ExprId {
        self.push(Node::ZeroOrMore(inner))
    }

    pub fn plus(&self, inner: ExprId) -> ExprId {
        self.push(Node::OneOrMore(inner))
    }

    pub fn opt(&self, inner: ExprId) -> ExprId {
        let empty = self.seq([]);
        self.choice([inner, empty])
    }

    pub fn at(&self, inner: ExprId) -> ExprId {
        self.push(Node::Lookahead(inner))
    }

    pub fn not_at(&self, inner: ExprId) -> ExprId {
        self.push(Node::NegativeLookahead(inner))
    }

    /// Reference to a rule of the grammar, resolved when parsing.
    pub fn rule(&self, name: &str) -> ExprId {
        self.push(Node::Rule(name.to_owned()))
    }

    pub fn forward(&self) -> ExprId {
        self.push(Node::Forward)
    }

    /// Promote the placeholder `fwd` to the content of `expr`. The handle
    /// `fwd` keeps its identity, so actions attached to it stay attached.
    pub fn implement(&self, fwd: ExprId, expr: ExprId) -> Result<(), GrammarError> {
        let node = match &self.slots.borrow()[expr.index()].node {
            Node::Forward => Node::Alias(expr),
            node => node.clone(),
        };

        self.promote(fwd, node)
    }

    /// Promote the placeholder `fwd` to a reference to `target`. Unlike
    /// [`implement`](Exprs::implement), matching `fwd` evaluates the handle
    /// `target` itself, so actions attached to `target` fire as well.
    pub fn alias(&self, fwd: ExprId, target: ExprId) -> Result<(), GrammarError> {
        self.promote(fwd, Node::Alias(target))
    }

    fn promote(&self, fwd: ExprId, node: Node) -> Result<(), GrammarError> {
        let mut slots = self.slots.borrow_mut();

        let slot = &mut slots[fwd.index()];
        if slot.promoted {
            return Err(GrammarError::AlreadyImplemented(fwd));
        }
        if !matches!(slot.node, Node::Forward) {
            return Err(GrammarError::NotForward(fwd));
        }

        log::trace!("implement {} as {:?}", fwd, node);

        slot.node = node;
        slot.promoted = true;

        Ok(())
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();

    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
