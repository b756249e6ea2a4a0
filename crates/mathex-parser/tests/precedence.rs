use mathex_parser::{parse, ConstantKind, Node};

fn num(s: &str) -> Node {
    Node::Constant {
        value: s.to_string(),
        kind: ConstantKind::Number,
    }
}

fn sym(s: &str) -> Node {
    Node::Symbol {
        name: s.to_string(),
    }
}

fn op2(op: &str, fn_name: &str, lhs: Node, rhs: Node) -> Node {
    Node::Operator {
        op: op.to_string(),
        fn_name: fn_name.to_string(),
        args: vec![lhs, rhs],
    }
}

fn op1(op: &str, fn_name: &str, arg: Node) -> Node {
    Node::Operator {
        op: op.to_string(),
        fn_name: fn_name.to_string(),
        args: vec![arg],
    }
}

fn parsed(src: &str) -> Node {
    parse(src).unwrap().strip_parens()
}

#[test]
fn unary_minus_binds_looser_than_power() {
    assert_eq!(
        parsed("-3^2"),
        op1("-", "unaryMinus", op2("^", "pow", num("3"), num("2")))
    );
    assert_eq!(
        parsed("(-3)^2"),
        op2("^", "pow", op1("-", "unaryMinus", num("3")), num("2"))
    );
}

#[test]
fn power_is_right_associative() {
    assert_eq!(
        parsed("2^3^4"),
        op2("^", "pow", num("2"), op2("^", "pow", num("3"), num("4")))
    );
}

#[test]
fn power_accepts_unary_on_the_right() {
    assert_eq!(
        parsed("2^-2"),
        op2("^", "pow", num("2"), op1("-", "unaryMinus", num("2")))
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        parsed("2+3*4"),
        op2("+", "add", num("2"), op2("*", "multiply", num("3"), num("4")))
    );
}

#[test]
fn postfix_binds_tighter_than_power() {
    assert_eq!(
        parsed("3!^2"),
        op2("^", "pow", op1("!", "factorial", num("3")), num("2"))
    );
}

#[test]
fn postfix_chains_left_associatively() {
    assert_eq!(
        parsed("3!!"),
        op1("!", "factorial", op1("!", "factorial", num("3")))
    );
}

#[test]
fn additive_is_left_associative() {
    assert_eq!(
        parsed("1-2-3"),
        op2("-", "subtract", op2("-", "subtract", num("1"), num("2")), num("3"))
    );
}

#[test]
fn implicit_multiplication_shares_the_multiplicative_tier() {
    assert_eq!(
        parsed("1/2a"),
        op2(
            "*",
            "multiply",
            op2("/", "divide", num("1"), num("2")),
            sym("a")
        )
    );
    assert_eq!(parsed("4a"), op2("*", "multiply", num("4"), sym("a")));
    assert_eq!(
        parsed("(2+3)(4+5)"),
        op2(
            "*",
            "multiply",
            op2("+", "add", num("2"), num("3")),
            op2("+", "add", num("4"), num("5"))
        )
    );
}

#[test]
fn unit_suffix_is_implicit_multiplication() {
    assert_eq!(parsed("5cm"), op2("*", "multiply", num("5"), sym("cm")));
    assert_eq!(parsed("5 cm"), op2("*", "multiply", num("5"), sym("cm")));
}

#[test]
fn trailing_in_stays_a_unit() {
    assert_eq!(parsed("2 in"), op2("*", "multiply", num("2"), sym("in")));
}

#[test]
fn in_before_an_operand_converts() {
    assert_eq!(
        parsed("2 in in"),
        op2("in", "to", num("2"), sym("in"))
    );
}

#[test]
fn conversion_chain() {
    assert_eq!(
        parsed("5.08 cm * 1000 to inch"),
        op2(
            "to",
            "to",
            op2(
                "*",
                "multiply",
                op2("*", "multiply", num("5.08"), sym("cm")),
                num("1000")
            ),
            sym("inch")
        )
    );
}

#[test]
fn mod_keyword_is_a_multiplicative_operator() {
    assert_eq!(parsed("8 % 3"), op2("%", "mod", num("8"), num("3")));
    assert_eq!(parsed("7 mod 3"), op2("mod", "mod", num("7"), num("3")));
}

#[test]
fn logical_tiers() {
    assert_eq!(
        parsed("1 and 2 or 3"),
        op2("or", "or", op2("and", "and", num("1"), num("2")), num("3"))
    );
    assert_eq!(
        parsed("1 xor 2 and 3"),
        op2("xor", "xor", num("1"), op2("and", "and", num("2"), num("3")))
    );
    assert_eq!(parsed("not 1"), op1("not", "not", num("1")));
}

#[test]
fn shift_binds_looser_than_additive() {
    assert_eq!(
        parsed("1 << 2 + 3"),
        op2("<<", "leftShift", num("1"), op2("+", "add", num("2"), num("3")))
    );
    assert_eq!(
        parsed("8 >> 2"),
        op2(">>", "rightArithShift", num("8"), num("2"))
    );
}

#[test]
fn relational_binds_tighter_than_conversion() {
    assert_eq!(
        parsed("2 < 3"),
        op2("<", "smaller", num("2"), num("3"))
    );
    assert_eq!(
        parsed("1 == 1 and 2 >= 2"),
        op2(
            "and",
            "and",
            op2("==", "equal", num("1"), num("1")),
            op2(">=", "largerEq", num("2"), num("2"))
        )
    );
}

#[test]
fn transpose_postfix() {
    assert_eq!(parsed("a'"), op1("'", "transpose", sym("a")));
    assert_eq!(parsed("a.'"), op1(".'", "transpose", sym("a")));
}
