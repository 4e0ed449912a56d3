use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Definition, ExpressionNode, Mode};
use crate::error::SyntaxError;

/// The whitespace rule is injected into loose rules, so it must exist and
/// must not itself be loose.
pub fn check_whitespace(
    definitions: &BTreeMap<String, Definition>,
    whitespace: Option<&str>,
) -> Result<(), SyntaxError> {
    let Some(name) = whitespace else {
        return Ok(());
    };

    match definitions.get(name) {
        None => Err(SyntaxError::WhitespaceUndefined(name.to_owned())),
        Some(def) if def.mode != Mode::Strict => {
            Err(SyntaxError::WhitespaceNotStrict(name.to_owned()))
        }
        Some(_) => Ok(()),
    }
}

/// For each rule, the sorted set of rule names its body refers to. Loose rules
/// also depend on the whitespace rule when one is configured.
pub fn dependencies(
    definitions: &BTreeMap<String, Definition>,
    whitespace: Option<&str>,
) -> BTreeMap<String, Vec<String>> {
    let mut res = BTreeMap::new();

    for (name, def) in definitions {
        let mut used = BTreeSet::new();

        collect_names(&def.body, &mut used);

        if let (Mode::Loose, Some(ws)) = (def.mode, whitespace) {
            used.insert(ws.to_owned());
        }

        res.insert(name.to_owned(), used.into_iter().collect());
    }

    res
}

fn collect_names(expr: &ExpressionNode, used: &mut BTreeSet<String>) {
    match expr {
        ExpressionNode::Name(name) => {
            used.insert(name.to_owned());
        }
        ExpressionNode::Optional(expr) | ExpressionNode::OneOrMore(expr) => {
            collect_names(expr, used);
        }
        ExpressionNode::Conjunction(list) | ExpressionNode::Disjunction(list) => {
            for expr in list {
                collect_names(expr, used);
            }
        }
        ExpressionNode::Literal(_) => (),
    }
}
