use bnfpeg::builtin::{Builtins, EOI, XID_IDENTIFIER};
use bnfpeg::error::{GrammarError, ParseError};
use bnfpeg::{CharClass, Grammar, Parser};

#[test]
fn forward() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.forward();
    assert_eq!(
        p.accept(v, "", &mut ()),
        Err(ParseError::UnresolvedForward(v))
    );

    let a = e.one_of("a");
    g.update(v, a).unwrap();
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));
    assert!(!e.is_forward(v));

    assert!(matches!(
        e.implement(v, a),
        Err(GrammarError::AlreadyImplemented(id)) if id == v
    ));
    assert!(matches!(
        e.implement(a, v),
        Err(GrammarError::NotForward(id)) if id == a
    ));
}

#[test]
fn unresolved_forward_inside_predicate() {
    let g: Grammar<Vec<String>> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.forward();
    let guarded = e.seq([e.not_at(v), e.any()]);

    assert_eq!(
        p.accept(guarded, "x", &mut Vec::new()),
        Err(ParseError::UnresolvedForward(v))
    );
}

#[test]
fn one_of() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.one_of("a");
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));

    let v = e.one_of("ab");
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "c", &mut ()), Ok(false));
}

#[test]
fn none_of() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.none_of("a");
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "a", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(true));

    let v = e.none_of("ab");
    assert_eq!(p.accept(v, "a", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "c", &mut ()), Ok(true));

    // steps over a whole character, not a byte
    assert_eq!(p.prefix(v, "µx", &mut ()), Ok(Some(2)));
}

#[test]
fn literal() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let v = g.exprs.literal("qux");

    assert_eq!(p.accept(v, "qu", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "qux", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "quxa", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "quux", &mut ()), Ok(false));
    assert_eq!(p.accept_all(v, "quxa", &mut ()), Ok(false));
}

#[test]
fn range() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.range("a", "a").unwrap();
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));

    let v = e.range("a", "z").unwrap();
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "A", &mut ()), Ok(false));

    let v = e.char_range('\u{61}', '\u{7a}').unwrap();
    assert_eq!(p.accept(v, "q", &mut ()), Ok(true));
}

#[test]
fn invalid_ranges() {
    let g: Grammar<()> = Grammar::new();
    let e = &g.exprs;

    assert!(matches!(e.range("", "z"), Err(GrammarError::RangeFirst)));
    assert!(matches!(e.range("a", "zz"), Err(GrammarError::RangeLast)));
    assert!(matches!(
        e.range("z", "a"),
        Err(GrammarError::RangeOrder { lo: 'z', hi: 'a' })
    ));

    assert_eq!(
        e.range("", "z").unwrap_err().to_string(),
        "range: first element of range must be a single character."
    );
}

#[test]
fn sequence() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.seq([]);
    assert_eq!(p.prefix(v, "", &mut ()), Ok(Some(0)));
    assert_eq!(p.prefix(v, "abc", &mut ()), Ok(Some(0)));

    let a = e.one_of("a");
    let v = e.seq([a]);
    assert_eq!(v, a);
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "ab", &mut ()), Ok(true));

    let v = e.seq([e.one_of("a"), e.one_of("b"), e.one_of("c")]);
    assert_eq!(p.accept(v, "abc", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "abd", &mut ()), Ok(false));
}

#[test]
fn choice() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.choice([]);
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "abc", &mut ()), Ok(false));

    let a = e.one_of("a");
    let v = e.choice([a]);
    assert_eq!(v, a);
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "abc", &mut ()), Ok(true));

    let v = e.choice([e.one_of("a"), e.one_of("b")]);
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "abc", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "bca", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "cab", &mut ()), Ok(false));

    // a failed alternative is rewound before the next one is tried
    let v = e.choice([e.literal("abd"), e.literal("abc")]);
    assert_eq!(p.prefix(v, "abc", &mut ()), Ok(Some(3)));

    // the first success wins, even if a later alternative is longer
    let v = e.choice([e.literal("a"), e.literal("ab")]);
    assert_eq!(p.prefix(v, "ab", &mut ()), Ok(Some(1)));
}

#[test]
fn star() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.star(e.one_of("a"));
    assert_eq!(p.prefix(v, "", &mut ()), Ok(Some(0)));
    assert_eq!(p.prefix(v, "abc", &mut ()), Ok(Some(1)));
    assert_eq!(p.prefix(v, "aaab", &mut ()), Ok(Some(3)));

    let v = e.seq([e.star(e.one_of("a")), e.one_of("b")]);
    assert_eq!(p.accept(v, "b", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "ab", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "aaab", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "aaac", &mut ()), Ok(false));

    // repetition never gives back an iteration
    let v = e.seq([e.star(e.one_of("a")), e.one_of("a")]);
    assert_eq!(p.accept(v, "aaa", &mut ()), Ok(false));

    // a partly matched iteration is rewound
    let v = e.star(e.seq([e.one_of("a"), e.one_of("b")]));
    assert_eq!(p.prefix(v, "abac", &mut ()), Ok(Some(2)));

    // an iteration matching nothing ends the loop
    let v = e.star(e.opt(e.one_of("a")));
    assert_eq!(p.prefix(v, "aab", &mut ()), Ok(Some(2)));
}

#[test]
fn plus() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let v = e.plus(e.one_of("a"));
    assert_eq!(p.accept(v, "", &mut ()), Ok(false));
    assert_eq!(p.prefix(v, "abc", &mut ()), Ok(Some(1)));
    assert_eq!(p.prefix(v, "aaa", &mut ()), Ok(Some(3)));

    let v = e.seq([e.plus(e.one_of("a")), e.one_of("b")]);
    assert_eq!(p.accept(v, "b", &mut ()), Ok(false));
    assert_eq!(p.accept(v, "ab", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "aaab", &mut ()), Ok(true));
    assert_eq!(p.accept(v, "aaac", &mut ()), Ok(false));
}

#[test]
fn opt() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let v = g.exprs.opt(g.exprs.one_of("a"));

    assert_eq!(p.prefix(v, "", &mut ()), Ok(Some(0)));
    assert_eq!(p.prefix(v, "abc", &mut ()), Ok(Some(1)));
    assert_eq!(p.prefix(v, "bca", &mut ()), Ok(Some(0)));
    assert_eq!(p.prefix(v, "aaac", &mut ()), Ok(Some(1)));
}

#[test]
fn at_and_not_at() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;
    let a = e.plus(e.one_of("a"));

    let at = e.at(a);
    let not_at = e.not_at(a);

    for input in ["a", "aaa", "b", ""] {
        let at_res = p.prefix(at, input, &mut ()).unwrap();
        let not_at_res = p.prefix(not_at, input, &mut ()).unwrap();

        // never consume, and exactly one of the two succeeds
        assert!(at_res.is_none() || at_res == Some(0));
        assert!(not_at_res.is_none() || not_at_res == Some(0));
        assert_ne!(at_res.is_some(), not_at_res.is_some());
    }

    assert_eq!(p.accept(at, "a", &mut ()), Ok(true));
    assert_eq!(p.accept(not_at, "a", &mut ()), Ok(false));
    assert_eq!(p.accept(at, "b", &mut ()), Ok(false));
    assert_eq!(p.accept(not_at, "b", &mut ()), Ok(true));

    let v = e.seq([e.at(e.literal("ab")), e.literal("abc")]);
    assert_eq!(p.prefix(v, "abcd", &mut ()), Ok(Some(3)));
}

#[test]
fn named_rules() {
    let mut g: Grammar<()> = Grammar::new();
    let e = &g.exprs;

    let digits = e.rule("digits");
    let number = e.seq([e.opt(e.one_of("-")), digits]);
    let missing = e.seq([e.any(), e.rule("nope")]);
    g.rules.insert("digits".into(), e.plus(e.char_range('0', '9').unwrap()));

    let p = Parser::new(&g);
    assert_eq!(p.accept_all(number, "-42", &mut ()), Ok(true));
    assert_eq!(p.accept(number, "-x", &mut ()), Ok(false));
    assert_eq!(
        p.accept(missing, "xy", &mut ()),
        Err(ParseError::NoSuchRule("nope".into()))
    );
    // the lookup only happens once the reference is reached
    assert_eq!(p.accept(missing, "", &mut ()), Ok(false));
}

#[test]
fn classes_and_patterns() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let e = &g.exprs;

    let ws = e.class(CharClass::Whitespace);
    assert_eq!(p.accept(ws, "\u{a0}", &mut ()), Ok(true));
    assert_eq!(p.accept(ws, "x", &mut ()), Ok(false));

    let hex = e.pattern("0x[0-9a-fA-F]+").unwrap();
    assert_eq!(p.prefix(hex, "0x1fz", &mut ()), Ok(Some(4)));
    // anchored at the cursor
    assert_eq!(p.accept(hex, " 0x1f", &mut ()), Ok(false));

    let v = e.seq([e.one_of("="), hex]);
    assert_eq!(p.accept_all(v, "=0xff", &mut ()), Ok(true));

    assert!(matches!(e.pattern("("), Err(GrammarError::Regex(_))));
}

#[test]
fn builtins() {
    let g: Grammar<()> = Grammar::new();
    let p = Parser::new(&g);
    let builtins = Builtins::init(&g.exprs);

    let ident = builtins.get(XID_IDENTIFIER).unwrap();
    assert_eq!(p.prefix(ident, "_foo1 bar", &mut ()), Ok(Some(5)));
    assert_eq!(p.prefix(ident, "größe=1", &mut ()), Ok(Some(7)));
    assert_eq!(p.accept(ident, "1abc", &mut ()), Ok(false));

    let eoi = builtins.get(EOI).unwrap();
    assert_eq!(p.accept(eoi, "", &mut ()), Ok(true));
    assert_eq!(p.accept(eoi, "x", &mut ()), Ok(false));

    let predefined = builtins.predefine(&["Dot", "something else"]);
    assert_eq!(predefined.keys().collect::<Vec<_>>(), vec!["Dot"]);

    let count = g.exprs.len();
    let mut all: Grammar<()> = Grammar::new();
    all.rules = Builtins::init(&all.exprs).into_rules();

    assert_eq!(count, all.exprs.len());
    assert_eq!(
        all.rules.keys().collect::<Vec<_>>(),
        vec!["Dot", "EOI", "WHITESPACE", "XID_IDENTIFIER"]
    );

    let p = Parser::new(&all);
    let ws = all.rules["WHITESPACE"];
    assert_eq!(p.prefix(ws, " \t\nx", &mut ()), Ok(Some(3)));
    assert_eq!(p.prefix(ws, "x", &mut ()), Ok(Some(0)));
}
