use crate::error::GrammarError;
use crate::{ExprId, Exprs};
use std::collections::{BTreeMap, HashMap};

/// Semantic action: receives the matched text and the caller's state.
pub type Action<S> = Box<dyn Fn(&str, &mut S)>;

/// Actions keyed by node identity and by rule name.
pub struct Actions<S> {
    nodes: HashMap<ExprId, Action<S>>,
    rules: HashMap<String, Action<S>>,
}

impl<S> Default for Actions<S> {
    fn default() -> Self {
        Actions {
            nodes: HashMap::new(),
            rules: HashMap::new(),
        }
    }
}

impl<S> Actions<S> {
    /// Attach `action` to the exact node `id` and hand `id` back, so a freshly
    /// built expression can be wrapped in place.
    pub fn on(&mut self, id: ExprId, action: impl Fn(&str, &mut S) + 'static) -> ExprId {
        self.nodes.insert(id, Box::new(action));
        id
    }

    /// Attach `action` to every match of a by-name reference to `rule`.
    pub fn on_rule(&mut self, rule: &str, action: impl Fn(&str, &mut S) + 'static) {
        self.rules.insert(rule.to_owned(), Box::new(action));
    }

    pub(crate) fn for_node(&self, id: ExprId) -> Option<&Action<S>> {
        self.nodes.get(&id)
    }

    pub(crate) fn for_rule(&self, rule: &str) -> Option<&Action<S>> {
        self.rules.get(rule)
    }
}

/// Named rules plus the actions fired while parsing with them.
///
/// The fields are public so that the arena can be borrowed for building while
/// rules and actions are being registered:
///
/// ```ignore
/// let e = &g.exprs;
/// let num = g.actions.on(e.plus(e.one_of("0123456789")), |s, st| st.push(s.len()));
/// g.rules.insert("num".into(), num);
/// ```
pub struct Grammar<S> {
    pub exprs: Exprs,
    pub rules: BTreeMap<String, ExprId>,
    pub actions: Actions<S>,
}

impl<S> Default for Grammar<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Grammar<S> {
    pub fn new() -> Self {
        Self::with_exprs(Exprs::new())
    }

    /// Wrap an arena whose expressions were built beforehand, e.g. by
    /// [`Syntax::make_rules`](crate::Syntax::make_rules).
    pub fn with_exprs(exprs: Exprs) -> Self {
        Grammar {
            exprs,
            rules: BTreeMap::new(),
            actions: Actions::default(),
        }
    }

    pub fn define(&mut self, name: &str, expr: ExprId) -> ExprId {
        self.rules.insert(name.to_owned(), expr);
        expr
    }

    pub fn rule(&self, name: &str) -> Option<ExprId> {
        self.rules.get(name).copied()
    }

    pub fn with(&mut self, id: ExprId, action: impl Fn(&str, &mut S) + 'static) -> ExprId {
        self.actions.on(id, action)
    }

    pub fn with_rule(&mut self, rule: &str, action: impl Fn(&str, &mut S) + 'static) {
        self.actions.on_rule(rule, action)
    }

    /// Promote a forward declaration, see [`Exprs::implement`].
    pub fn update(&self, fwd: ExprId, expr: ExprId) -> Result<(), GrammarError> {
        self.exprs.implement(fwd, expr)
    }
}
