use crate::ast::{Definition, ExpressionNode, Mode};
use crate::error::{BnfError, GrammarError};
use crate::utils::unquote;
use crate::{ExprId, Grammar, Parser};
use regex::Regex;
use std::collections::BTreeMap;

/// Rule of the bootstrap grammar that matches one BNF rule.
pub const DECLARATION: &str = "declaration";

enum Item {
    Expr(ExpressionNode),
    Definition(String, Definition),
}

/// Reduction stack threaded through the bootstrap grammar's actions.
struct Reductions {
    stack: Vec<Item>,
    mode: Mode,
    fault: Option<&'static str>,
}

impl Default for Reductions {
    fn default() -> Self {
        Reductions {
            stack: Vec::new(),
            mode: Mode::Loose,
            fault: None,
        }
    }
}

impl Reductions {
    fn push(&mut self, node: ExpressionNode) {
        self.stack.push(Item::Expr(node));
    }

    fn pop(&mut self) -> Option<ExpressionNode> {
        match self.stack.pop() {
            Some(Item::Expr(node)) => Some(node),
            Some(item) => {
                self.stack.push(item);
                self.fail("unexpected definition on the stack");
                None
            }
            None => {
                self.fail("no nodes on the stack");
                None
            }
        }
    }

    fn fail(&mut self, fault: &'static str) {
        self.fault.get_or_insert(fault);
    }

    fn wrap(&mut self, f: impl FnOnce(Box<ExpressionNode>) -> ExpressionNode) {
        if let Some(node) = self.pop() {
            self.push(f(Box::new(node)));
        }
    }

    /// Pop two nodes and combine them, extending the older one if it already
    /// is a list of the same kind.
    fn join(&mut self, conjunction: bool) {
        let (Some(newer), Some(older)) = (self.pop(), self.pop()) else {
            return;
        };

        let node = match (older, conjunction) {
            (ExpressionNode::Conjunction(mut list), true) => {
                list.push(newer);
                ExpressionNode::Conjunction(list)
            }
            (ExpressionNode::Disjunction(mut list), false) => {
                list.push(newer);
                ExpressionNode::Disjunction(list)
            }
            (older, true) => ExpressionNode::Conjunction(vec![older, newer]),
            (older, false) => ExpressionNode::Disjunction(vec![older, newer]),
        };

        self.push(node);
    }

    fn define(&mut self) {
        let (Some(body), Some(name)) = (self.pop(), self.pop()) else {
            return;
        };

        match name {
            ExpressionNode::Name(name) => {
                let def = Definition::new(body, self.mode);
                self.stack.push(Item::Definition(name, def));
            }
            _ => self.fail("rule does not start with a name"),
        }
    }
}

/// Reads BNF text into [`Definition`]s. The notation is itself described by
/// an expression grammar whose actions build the definitions.
pub struct BnfParser {
    grammar: Grammar<Reductions>,
    declaration: ExprId,
    blank_lines: Regex,
}

impl BnfParser {
    pub fn new() -> Result<Self, BnfError> {
        let mut grammar: Grammar<Reductions> = Grammar::new();
        let e = &grammar.exprs;
        let actions = &mut grammar.actions;

        let eol = e.seq([e.opt(e.one_of("\r")), e.one_of("\n")]);
        let eof = e.not_at(e.any());
        let ws_char = e.one_of(" \t\r\n\x0c\x0b");
        // whitespace never crosses a blank line, which ends the rule
        let ws = e.star(e.seq([e.not_at(e.seq([eol, eol])), ws_char]));
        let sseq = |items: &[ExprId]| e.seq(items.iter().flat_map(|&item| [ws, item]));

        let name_char = e.choice([
            e.char_range('a', 'z')?,
            e.char_range('A', 'Z')?,
            e.char_range('0', '9')?,
            e.one_of(" -_:=/."),
        ]);
        let name_body = actions.on(e.plus(name_char), |text, st| {
            st.push(ExpressionNode::Name(text.to_owned()))
        });
        let name = e.seq([e.one_of("<"), name_body, e.one_of(">")]);

        let strict = actions.on(e.literal(":=="), |_, st| st.mode = Mode::Strict);
        let loose = actions.on(e.literal("::="), |_, st| st.mode = Mode::Loose);
        let assigns = e.choice([strict, loose]);

        let bare_literal = actions.on(
            e.plus(e.seq([e.not_at(e.one_of(" ")), name_char])),
            |text, st| st.push(ExpressionNode::Literal(text.to_owned())),
        );
        let escape = e.seq([e.one_of("\\"), e.one_of("\\\"rntvf")]);
        let quoted_literal = actions.on(
            e.seq([
                e.one_of("\""),
                e.star(e.choice([escape, e.none_of("\"\\")])),
                e.one_of("\""),
            ]),
            |text, st| st.push(ExpressionNode::Literal(unquote(text))),
        );
        let graphic_literal = actions.on(
            e.plus(e.seq([e.not_at(ws_char), e.any()])),
            |text, st| st.push(ExpressionNode::Literal(text.to_owned())),
        );

        let expression = e.forward();
        let optional = actions.on(
            sseq(&[e.one_of("["), expression, e.one_of("]")]),
            |_, st| st.wrap(ExpressionNode::Optional),
        );
        let braces = sseq(&[e.one_of("{"), expression, e.one_of("}")]);
        let primary = e.choice([name, quoted_literal, bare_literal, optional, braces]);
        let ellipsis = actions.on(e.literal("..."), |_, st| {
            st.wrap(ExpressionNode::OneOrMore)
        });
        let postfix = e.seq([primary, e.opt(ellipsis)]);
        let repeating = actions.on(sseq(&[postfix]), |_, st| st.join(true));
        let sequence = sseq(&[postfix, e.star(repeating)]);
        let alternative = actions.on(sseq(&[e.one_of("|"), sequence]), |_, st| {
            st.join(false)
        });
        e.implement(expression, sseq(&[sequence, e.star(alternative)]))?;

        let end = e.choice([e.seq([eol, eol]), eof]);
        let declaration = actions.on(
            sseq(&[name, assigns, e.choice([expression, graphic_literal]), end]),
            |_, st| st.define(),
        );

        grammar.define(DECLARATION, declaration);

        let blank_lines = Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").map_err(GrammarError::from)?;

        Ok(BnfParser {
            grammar,
            declaration,
            blank_lines,
        })
    }

    /// Parse a single rule, terminated by a blank line or the end of `text`.
    /// Anything but whitespace after the rule is a syntax error.
    pub fn parse_rule(&self, text: &str) -> Result<(String, Definition), BnfError> {
        let mut st = Reductions::default();

        let consumed = Parser::new(&self.grammar).prefix(self.declaration, text, &mut st)?;
        let matched = consumed.is_some_and(|end| text[end..].trim().is_empty());

        if let Some(fault) = st.fault {
            return Err(BnfError::Reduction(fault));
        }

        let syntax_error = || BnfError::Syntax {
            line: 1,
            text: text.trim().to_owned(),
        };

        if !matched || st.stack.len() != 1 {
            return Err(syntax_error());
        }

        match st.stack.pop() {
            Some(Item::Definition(name, def)) => Ok((name, def)),
            _ => Err(syntax_error()),
        }
    }

    /// Parse every rule of `source`. Rules are separated by blank lines.
    pub fn parse_definitions(
        &self,
        source: &str,
    ) -> Result<BTreeMap<String, Definition>, BnfError> {
        let mut groups = Vec::new();
        let mut start = 0;

        for m in self.blank_lines.find_iter(source) {
            groups.push(start..m.start());
            start = m.end();
        }
        groups.push(start..source.len());

        let mut definitions = BTreeMap::new();

        for range in groups {
            let text = &source[range.clone()];

            if text.trim().is_empty() {
                continue;
            }

            let lead = text.len() - text.trim_start().len();
            let line = source[..range.start + lead].matches('\n').count() + 1;

            let (name, def) = self.parse_rule(text).map_err(|err| match err {
                BnfError::Syntax { text, .. } => BnfError::Syntax { line, text },
                err => err,
            })?;

            log::debug!("line {}: <{}> {}", line, name, def);

            if definitions.contains_key(&name) {
                return Err(BnfError::DuplicateRule(name));
            }

            definitions.insert(name, def);
        }

        Ok(definitions)
    }
}

/// Parse BNF `source` with a freshly built [`BnfParser`].
pub fn parse_definitions(source: &str) -> Result<BTreeMap<String, Definition>, BnfError> {
    BnfParser::new()?.parse_definitions(source)
}
