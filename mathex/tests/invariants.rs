use mathex::{compile, eval, parse, Scope, Value};

#[test]
fn precedence_laws_hold_end_to_end() {
    let cases = [
        ("-3^2", -9.0),
        ("(-3)^2", 9.0),
        ("2^3^2", 512.0),
        ("2+3*4", 14.0),
        ("3!^2", 36.0),
        ("2^-2", 0.25),
    ];
    for (src, expected) in cases {
        assert_eq!(
            eval(src, &Scope::new()).unwrap(),
            Value::Num(expected),
            "{src}"
        );
    }
}

#[test]
fn conditional_laziness_leaves_the_other_branch_untouched() {
    let scope = Scope::new();
    eval("true ? (a=2) : (b=2)", &scope).unwrap();
    assert_eq!(scope.get("a"), Some(Value::Num(2.0)));
    assert_eq!(scope.get("b"), None);
}

#[test]
fn lexical_capture_sees_later_bindings() {
    let scope = Scope::new();
    eval("a=3; f(x) = a*x;", &scope).unwrap();
    assert_eq!(
        eval("f(2)", &scope).unwrap(),
        Value::Num(6.0)
    );
    eval("a=5", &scope).unwrap();
    assert_eq!(eval("f(2)", &scope).unwrap(), Value::Num(10.0));
}

#[test]
fn one_based_indexing() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    assert_eq!(eval("a[1]", &scope).unwrap(), Value::Num(10.0));
}

#[test]
fn end_keyword_in_string_subscripts() {
    let scope = Scope::new();
    eval("c = \"hello\"", &scope).unwrap();
    assert_eq!(
        eval("c[end-2:-1:1]", &scope).unwrap(),
        Value::Str("leh".into())
    );
}

#[test]
fn reserved_scope_symbol_is_rejected() {
    let scope = Scope::new();
    scope.set("end", Value::Num(3.0));
    for src in ["1", "a = 2", "[1,2]"] {
        let err = eval(src, &scope).unwrap_err();
        assert_eq!(err.to_string(), "Scope contains an illegal symbol", "{src}");
    }
}

#[test]
fn round_trips_reparse_to_equal_trees() {
    for src in [
        "2 + 6 / 3",
        "a=3\nb=4\na*b",
        "f(x) = x^2; f(3)",
        "5.08 cm * 1000 to inch",
        "2 > 0 ? 1 : 2 < 0 ? -1 : 0",
        "[1,2;3,4]",
        "a[2:3,2:3] = [10,11;12,13]",
        "c[end-2:-1:1]",
        "2+3i",
    ] {
        let tree = parse(src).unwrap();
        let reparsed = parse(&tree.to_string()).unwrap();
        assert_eq!(reparsed.strip_parens(), tree.strip_parens(), "{src}");
    }
}

#[test]
fn compiled_trees_are_reusable_across_scopes() {
    let compiled = compile("x * 2").unwrap();
    let a = Scope::new();
    a.set("x", Value::Num(3.0));
    let b = Scope::new();
    b.set("x", Value::Num(5.0));
    assert_eq!(compiled.eval(&a).unwrap(), Value::Num(6.0));
    assert_eq!(compiled.eval(&b).unwrap(), Value::Num(10.0));
}

#[test]
fn find_locates_nodes_by_predicate() {
    use mathex::Node;
    let tree = parse("a + sin(b) * 2").unwrap();
    let calls = tree.find(|n| matches!(n, Node::FunctionCall { .. }));
    assert_eq!(calls.len(), 1);
    let symbols = tree.find(|n| matches!(n, Node::Symbol { .. }));
    assert_eq!(symbols.len(), 2);
}
