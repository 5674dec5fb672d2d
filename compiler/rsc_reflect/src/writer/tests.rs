use pretty_assertions::assert_eq;

use super::*;

#[test]
fn blocks_indent_their_body() {
    let mut w = JavaWriter::new();
    w.open("public class A");
    w.line("int x;");
    w.open_method(Access::Private, Some("void"), "f", &[("int".to_owned(), "v".to_owned())]);
    w.line("x = v;");
    w.close();
    w.close();
    assert_eq!(
        w.finish(),
        vec![
            "public class A {",
            "    int x;",
            "    private void f(int v) {",
            "        x = v;",
            "    }",
            "",
            "}",
        ]
    );
}

#[test]
fn constructor_has_no_return_type() {
    let mut w = JavaWriter::new();
    w.open_method(Access::Public, None, "A", &[]);
    w.close_tight();
    assert_eq!(w.finish(), vec!["public A() {", "}"]);
}

#[test]
fn empty_lines_carry_no_indent() {
    let mut w = JavaWriter::new();
    w.indent();
    w.line("");
    w.line("x");
    w.blank();
    assert_eq!(w.finish(), vec!["", "    x"]);
}

#[test]
fn padding_counter_is_per_writer() {
    let mut w = JavaWriter::new();
    assert_eq!(w.next_padding(), "#padding_1");
    assert_eq!(w.next_padding(), "#padding_2");
    assert_eq!(JavaWriter::new().next_padding(), "#padding_1");
}
