use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Definition, ExpressionNode, Mode};
use crate::check;
use crate::error::SyntaxError;
use crate::tarjan;
use crate::{ExprId, Exprs};

/// How conjunctions in loose (`::=`) rules are translated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LooseWhitespace {
    /// Members are matched back to back, exactly like a strict rule. The mode
    /// only adds a dependency on the whitespace rule.
    #[default]
    Literal,
    /// Every member is preceded by a match of the whitespace rule.
    Interleave,
}

#[derive(Clone, Debug, Default)]
pub struct SyntaxOptions {
    /// Name of the rule that loose rules may skip between members.
    pub whitespace: Option<String>,
    pub loose: LooseWhitespace,
}

impl SyntaxOptions {
    pub fn whitespace(name: &str) -> Self {
        SyntaxOptions {
            whitespace: Some(name.to_owned()),
            ..Default::default()
        }
    }

    pub fn interleave(mut self) -> Self {
        self.loose = LooseWhitespace::Interleave;
        self
    }
}

/// A set of BNF definitions, analysed and ready to be turned into expressions.
#[derive(Debug)]
pub struct Syntax {
    definitions: BTreeMap<String, Definition>,
    options: SyntaxOptions,
    dependencies: BTreeMap<String, Vec<String>>,
    sccs: Vec<Vec<String>>,
}

impl Syntax {
    pub fn new(
        definitions: BTreeMap<String, Definition>,
        options: SyntaxOptions,
    ) -> Result<Self, SyntaxError> {
        let whitespace = options.whitespace.as_deref();

        check::check_whitespace(&definitions, whitespace)?;

        let dependencies = check::dependencies(&definitions, whitespace);

        let names: Vec<&str> = definitions.keys().map(String::as_str).collect();
        let sccs = tarjan::components(&names, &dependencies);

        log::debug!(
            "{} definitions, {} strongly connected components",
            definitions.len(),
            sccs.len()
        );

        Ok(Syntax {
            definitions,
            options,
            dependencies,
            sccs,
        })
    }

    pub fn definitions(&self) -> &BTreeMap<String, Definition> {
        &self.definitions
    }

    pub fn dependencies(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dependencies
    }

    /// Components in dependency order; see [`tarjan::components`].
    pub fn sccs(&self) -> &[Vec<String>] {
        &self.sccs
    }

    pub fn whitespace(&self) -> Option<&str> {
        self.options.whitespace.as_deref()
    }

    /// Names referred to by some rule but not defined by any, sorted. These
    /// must be supplied to [`make_rules`](Syntax::make_rules).
    pub fn missing_rules(&self) -> Vec<String> {
        let used: BTreeSet<&String> = self.dependencies.values().flatten().collect();

        used.into_iter()
            .filter(|name| !self.definitions.contains_key(*name))
            .cloned()
            .collect()
    }

    /// Build one expression per rule in `exprs`.
    ///
    /// `predefined` seeds the rule table and must cover
    /// [`missing_rules`](Syntax::missing_rules). Components are realized in
    /// dependency order: every defined member first gets a forward
    /// declaration, so members may refer to each other, and each is promoted
    /// once its body has been translated. A rule whose body is a single name
    /// becomes an alias of the named rule.
    pub fn make_rules(
        &self,
        exprs: &Exprs,
        predefined: BTreeMap<String, ExprId>,
    ) -> Result<BTreeMap<String, ExprId>, SyntaxError> {
        let mut rules = predefined;

        for scc in &self.sccs {
            let mut pending = Vec::new();

            for name in scc {
                if let Some(def) = self.definitions.get(name) {
                    if rules.contains_key(name) {
                        log::warn!("definition of <{}> replaces the predefined rule", name);
                    }

                    let fwd = exprs.forward();
                    rules.insert(name.to_owned(), fwd);
                    pending.push((name, def, fwd));
                } else if !rules.contains_key(name) {
                    return Err(SyntaxError::Unpredefined(name.to_owned()));
                }
            }

            for (name, def, fwd) in pending {
                let expr = self.translate(name, &def.body, def.mode, exprs, &rules)?;

                // evaluate the named rule's own handle so its actions fire
                if let ExpressionNode::Name(_) = def.body {
                    exprs.alias(fwd, expr)?;
                } else {
                    exprs.implement(fwd, expr)?;
                }
            }

            log::debug!("realized component {:?}", scc);
        }

        Ok(rules)
    }

    fn translate(
        &self,
        rule: &str,
        expr: &ExpressionNode,
        mode: Mode,
        exprs: &Exprs,
        rules: &BTreeMap<String, ExprId>,
    ) -> Result<ExprId, SyntaxError> {
        let lookup = |name: &str| {
            rules
                .get(name)
                .copied()
                .ok_or_else(|| SyntaxError::UndefinedName {
                    rule: rule.to_owned(),
                    name: name.to_owned(),
                })
        };

        let res = match expr {
            ExpressionNode::Literal(text) => exprs.literal(text),
            ExpressionNode::Name(name) => lookup(name)?,
            ExpressionNode::Optional(inner) => {
                let inner = self.translate(rule, inner, mode, exprs, rules)?;
                exprs.opt(inner)
            }
            ExpressionNode::OneOrMore(inner) => {
                let inner = self.translate(rule, inner, mode, exprs, rules)?;
                exprs.plus(inner)
            }
            ExpressionNode::Disjunction(list) => {
                let list = list
                    .iter()
                    .map(|expr| self.translate(rule, expr, mode, exprs, rules))
                    .collect::<Result<Vec<_>, _>>()?;
                exprs.choice(list)
            }
            ExpressionNode::Conjunction(list) => {
                let ws = match (mode, self.options.loose, self.whitespace()) {
                    (Mode::Loose, LooseWhitespace::Interleave, Some(ws)) => Some(lookup(ws)?),
                    _ => None,
                };

                let mut seq = Vec::new();

                for expr in list {
                    if let Some(ws) = ws {
                        seq.push(ws);
                    }
                    seq.push(self.translate(rule, expr, mode, exprs, rules)?);
                }

                exprs.seq(seq)
            }
        };

        Ok(res)
    }
}
