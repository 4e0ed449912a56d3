use crate::expr::CharClass;
use crate::{ExprId, Exprs};
use std::collections::BTreeMap;

pub const DOT: &str = "Dot";
pub const EOI: &str = "EOI";
pub const WHITESPACE: &str = "WHITESPACE";
pub const XID_IDENTIFIER: &str = "XID_IDENTIFIER";

/// Primitive rules that BNF text commonly leaves undefined.
pub struct Builtins {
    rules: BTreeMap<&'static str, ExprId>,
}

impl Builtins {
    pub fn init(exprs: &Exprs) -> Builtins {
        let mut rules = BTreeMap::new();

        // any single character
        rules.insert(DOT, exprs.any());

        let any = exprs.any();
        rules.insert(EOI, exprs.not_at(any));

        // zero or more, so it never fails
        let ws = exprs.class(CharClass::Whitespace);
        rules.insert(WHITESPACE, exprs.star(ws));

        let start = exprs.class(CharClass::XidStart);
        let underscore = exprs.one_of("_");
        let cont = exprs.class(CharClass::XidContinue);
        rules.insert(
            XID_IDENTIFIER,
            exprs.seq([exprs.choice([start, underscore]), exprs.star(cont)]),
        );

        Builtins { rules }
    }

    pub fn get(&self, name: &str) -> Option<ExprId> {
        self.rules.get(name).copied()
    }

    /// The builtins among `names`, ready to be passed as predefined rules.
    pub fn predefine<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, ExprId> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.get(name).map(|id| (name.to_owned(), id))
            })
            .collect()
    }

    pub fn into_rules(self) -> BTreeMap<String, ExprId> {
        self.rules
            .into_iter()
            .map(|(name, id)| (name.to_owned(), id))
            .collect()
    }
}
