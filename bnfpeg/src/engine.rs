use crate::error::ParseError;
use crate::expr::{Node, Slot};
use crate::{ExprId, Grammar};

/// Cursor over the text of one parse.
#[derive(Clone, Debug)]
pub(crate) struct Input<'i> {
    source: &'i str,
    position: usize,
    begin: usize,
    end: usize,
}

impl<'i> Input<'i> {
    pub(crate) fn new(source: &'i str) -> Self {
        Input {
            source,
            position: 0,
            begin: 0,
            end: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn save(&self) -> usize {
        self.position
    }

    pub(crate) fn restore(&mut self, position: usize) {
        self.position = position;
    }

    /// The text of the last successful match.
    pub(crate) fn string(&self) -> &'i str {
        &self.source[self.begin..self.end]
    }

    fn rest(&self) -> &'i str {
        &self.source[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character if `pred` accepts it.
    fn next_if(&mut self, pred: impl FnOnce(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.position += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn mark(&mut self, begin: usize) {
        self.begin = begin;
        self.end = self.position;
    }
}

/// Interprets expressions of a [`Grammar`]. The parser itself holds no
/// per-parse state, so one parser may serve any number of `accept` calls.
pub struct Parser<'g, S> {
    grammar: &'g Grammar<S>,
}

impl<'g, S> Parser<'g, S> {
    pub fn new(grammar: &'g Grammar<S>) -> Self {
        Parser { grammar }
    }

    /// Match `expr` against a prefix of `text`.
    pub fn accept(&self, expr: ExprId, text: &str, state: &mut S) -> Result<bool, ParseError> {
        Ok(self.prefix(expr, text, state)?.is_some())
    }

    /// Match `expr` against the whole of `text`.
    pub fn accept_all(&self, expr: ExprId, text: &str, state: &mut S) -> Result<bool, ParseError> {
        Ok(self.prefix(expr, text, state)? == Some(text.len()))
    }

    /// Match `expr` against a prefix of `text` and return the number of bytes
    /// consumed.
    pub fn prefix(
        &self,
        expr: ExprId,
        text: &str,
        state: &mut S,
    ) -> Result<Option<usize>, ParseError> {
        let slots = self.grammar.exprs.slots();

        let mut run = Run {
            slots: &slots,
            grammar: self.grammar,
            input: Input::new(text),
            predicate_depth: 0,
            state,
        };

        if run.eval(expr)? {
            Ok(Some(run.input.position()))
        } else {
            Ok(None)
        }
    }
}

struct Run<'p, 'i, S> {
    slots: &'p [Slot],
    grammar: &'p Grammar<S>,
    input: Input<'i>,
    predicate_depth: usize,
    state: &'p mut S,
}

impl<S> Run<'_, '_, S> {
    fn eval(&mut self, id: ExprId) -> Result<bool, ParseError> {
        let slots = self.slots;
        let grammar = self.grammar;
        let begin = self.input.position();

        let matched = match &slots[id.index()].node {
            Node::Any => self.input.next_if(|_| true),
            Node::OneOf(chars) => self.input.next_if(|ch| chars.contains(ch)),
            Node::NoneOf(chars) => self.input.next_if(|ch| !chars.contains(ch)),
            Node::Literal(text) => {
                if self.input.rest().starts_with(text.as_str()) {
                    self.input.position += text.len();
                    true
                } else {
                    false
                }
            }
            Node::CharRange(lo, hi) => self.input.next_if(|ch| (*lo..=*hi).contains(&ch)),
            Node::Class(class) => self.input.next_if(|ch| class.contains(ch)),
            Node::Pattern(re) => match re.find(self.input.rest()) {
                Some(m) => {
                    self.input.position += m.end();
                    true
                }
                None => false,
            },
            Node::Sequence(children) => {
                let mut matched = true;
                for child in children {
                    if !self.eval(*child)? {
                        matched = false;
                        break;
                    }
                }
                matched
            }
            Node::OrderedChoice(children) => {
                let pos = self.input.save();
                let mut matched = false;
                for child in children {
                    if self.eval(*child)? {
                        matched = true;
                        break;
                    }
                    self.input.restore(pos);
                }
                matched
            }
            Node::ZeroOrMore(inner) => {
                self.repeat(*inner)?;
                true
            }
            Node::OneOrMore(inner) => self.repeat(*inner)? > 0,
            Node::Lookahead(inner) => self.predicate(*inner)?,
            Node::NegativeLookahead(inner) => !self.predicate(*inner)?,
            Node::Rule(name) => {
                let target = grammar
                    .rule(name)
                    .ok_or_else(|| ParseError::NoSuchRule(name.clone()))?;

                let matched = self.eval(target)?;
                if matched && self.predicate_depth == 0 {
                    if let Some(action) = grammar.actions.for_rule(name) {
                        self.input.mark(begin);
                        log::trace!("rule action <{}> on {:?}", name, self.input.string());
                        action(self.input.string(), &mut *self.state);
                    }
                }
                matched
            }
            Node::Alias(target) => self.eval(*target)?,
            Node::Forward => return Err(ParseError::UnresolvedForward(id)),
        };

        if matched && self.predicate_depth == 0 {
            if let Some(action) = grammar.actions.for_node(id) {
                self.input.mark(begin);
                log::trace!("action {} on {:?}", id, self.input.string());
                action(self.input.string(), &mut *self.state);
            }
        }

        Ok(matched)
    }

    /// Greedy repetition; returns the number of iterations that matched. An
    /// iteration that fails is rewound, and one that consumes nothing ends the
    /// loop.
    fn repeat(&mut self, inner: ExprId) -> Result<usize, ParseError> {
        let mut count = 0;

        loop {
            let pos = self.input.save();

            if !self.eval(inner)? {
                self.input.restore(pos);
                break;
            }

            count += 1;

            if self.input.position() == pos {
                break;
            }
        }

        Ok(count)
    }

    /// Evaluate `inner` without consuming input or firing actions.
    fn predicate(&mut self, inner: ExprId) -> Result<bool, ParseError> {
        let pos = self.input.save();

        self.predicate_depth += 1;
        let res = self.eval(inner);
        self.predicate_depth -= 1;

        self.input.restore(pos);

        res
    }
}
