use mathex_parser::{parse, Node};

#[test]
fn newline_after_binary_operator_continues_the_expression() {
    assert_eq!(parse("2+\n3").unwrap(), parse("2+3").unwrap());
    assert_eq!(parse("a =\n3").unwrap(), parse("a = 3").unwrap());
    assert_eq!(parse("1 and\n2").unwrap(), parse("1 and 2").unwrap());
}

#[test]
fn newlines_inside_brackets_are_whitespace() {
    assert_eq!(parse("add(\n4\n,\n2\n)").unwrap(), parse("add(4,2)").unwrap());
    assert_eq!(parse("[1,\n2;\n3,4]").unwrap(), parse("[1,2;3,4]").unwrap());
    assert_eq!(parse("a[\n1\n]").unwrap(), parse("a[1]").unwrap());
}

#[test]
fn bare_newlines_separate_statements() {
    let node = parse("a=1\nb=2").unwrap();
    match node {
        Node::Block { entries } => assert_eq!(entries.len(), 2),
        other => panic!("block expected, got {other:?}"),
    }
}

#[test]
fn leading_and_trailing_newlines_are_insignificant() {
    assert_eq!(parse("\n2+3\n").unwrap(), parse("2+3").unwrap());
}

#[test]
fn comments_do_not_join_lines() {
    let node = parse("a=1 # first\nb=2").unwrap();
    match node {
        Node::Block { entries } => assert_eq!(entries.len(), 2),
        other => panic!("block expected, got {other:?}"),
    }
}
