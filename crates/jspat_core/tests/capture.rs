//! End-to-end behaviour of the capture extension through the public API.

use jspat_core::parser::ast::*;
use jspat_core::plugins::capture::CapturePlugin;
use jspat_core::{Error, ParserOptions};

fn options() -> ParserOptions {
    ParserOptions::default().with_plugin(CapturePlugin)
}

fn parse(src: &str) -> Program {
    jspat_core::parse(src, &options()).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn first_stmt(src: &str) -> Stmt {
    let program = parse(src);
    program.body.items().unwrap()[0].clone()
}

fn error(src: &str) -> (String, usize) {
    match jspat_core::parse(src, &options()) {
        Err(Error::Syntax { message, pos }) => (message, pos.offset),
        other => panic!("{src}: expected a syntax error, got {other:?}"),
    }
}

fn assert_list_capture<T: std::fmt::Debug>(list: &NodeList<T>, name: &str) {
    match list {
        NodeList::Capture(c) => {
            assert_eq!(c.name, name);
            assert!(c.is_list_capture);
        }
        NodeList::Items(items) => panic!("expected capture {name}, got {items:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_var_declarators_replaced_by_list_capture() {
    let Stmt::VarDecl(decl) = first_stmt("var {{...rest}};") else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.kind, VarKind::Var);
    assert_list_capture(&decl.declarators, "rest");
}

#[test]
fn test_function_name_capture() {
    let Stmt::FnDecl(func) = first_stmt("function {{f}}() {}") else {
        panic!("expected a function declaration");
    };
    match func.id {
        Some(Name::Capture(c)) => {
            assert_eq!(c.name, "f");
            assert!(!c.is_list_capture);
        }
        other => panic!("unexpected id {other:?}"),
    }
}

#[test]
fn test_list_capture_takes_over_the_whole_argument_list() {
    let Stmt::Expr(stmt) = first_stmt("foo({{x}}, {{...y}})") else {
        panic!("expected an expression statement");
    };
    let Expr::Call(call) = *stmt.expr else {
        panic!("expected a call");
    };
    assert!(matches!(&*call.callee, Expr::Ident(id) if id.name == "foo"));
    assert_list_capture(&call.arguments, "y");
}

#[test]
fn test_block_body_replaced_by_list_capture() {
    let Stmt::Block(block) = first_stmt("{ {{...body}} }") else {
        panic!("expected a block");
    };
    assert_list_capture(&block.body, "body");
}

#[test]
fn test_program_body_replaced_by_list_capture() {
    let program = parse("{{...statements}}");
    assert_list_capture(&program.body, "statements");
    assert!(program.directives.is_empty());
}

#[test]
fn test_list_capture_in_every_list_position() {
    let Stmt::Expr(stmt) = first_stmt("(function ({{...params}}) { {{...body}} })") else {
        panic!("expected an expression statement");
    };
    let Expr::Fn(func) = *stmt.expr else {
        panic!("expected a function expression");
    };
    assert_list_capture(&func.params, "params");
    assert_list_capture(&func.body.body, "body");

    let Stmt::VarDecl(decl) = first_stmt("let [{{...items}}] = list;") else {
        panic!("expected a declaration");
    };
    let Pat::Array(pattern) = &decl.declarators.items().unwrap()[0].id else {
        panic!("expected an array pattern");
    };
    assert_list_capture(&pattern.elements, "items");

    let expr = jspat_core::parse_expression("[{{...elements}}]", &options()).unwrap();
    let Expr::Array(array) = expr else {
        panic!("expected an array");
    };
    assert_list_capture(&array.elements, "elements");
}

#[test]
fn test_nested_captures_in_a_template() {
    let src = "const {{result}} = {{callee}}({{...args}}).{{method}}({{arg}});";
    let Stmt::VarDecl(decl) = first_stmt(src) else {
        panic!("expected a declaration");
    };
    let declarator = &decl.declarators.items().unwrap()[0];
    assert!(matches!(&declarator.id, Pat::Capture(c) if c.name == "result"));
    let Some(Expr::Call(outer)) = declarator.init.as_deref() else {
        panic!("expected a call");
    };
    assert!(matches!(outer.arguments.items(), Some([Expr::Capture(c)]) if c.name == "arg"));
    let Expr::Member(member) = &*outer.callee else {
        panic!("expected a member callee");
    };
    assert!(matches!(&member.property, MemberProp::Capture(c) if c.name == "method"));
    let Expr::Call(inner) = &*member.object else {
        panic!("expected an inner call");
    };
    assert!(matches!(&*inner.callee, Expr::Capture(c) if c.name == "callee"));
    assert_list_capture(&inner.arguments, "args");
}

#[test]
fn test_parenthesized_arrow_template_is_called() {
    let Stmt::Expr(stmt) = first_stmt("(({{...p}}) => {{b}})({{...args}});") else {
        panic!("expected an expression statement");
    };
    let Expr::Call(call) = *stmt.expr else {
        panic!("expected a call");
    };
    let Expr::Arrow(arrow) = &*call.callee else {
        panic!("expected an arrow callee");
    };
    assert_list_capture(&arrow.params, "p");
    assert!(matches!(&arrow.body, ArrowBody::Expr(body) if matches!(&**body, Expr::Capture(c) if c.name == "b")));
    assert_list_capture(&call.arguments, "args");
}

#[test]
fn test_capture_span_covers_both_delimiters() {
    let src = "x = {{  spaced  }} + 1;";
    let Stmt::Expr(stmt) = first_stmt(src) else {
        panic!("expected an expression statement");
    };
    let Expr::Assign(assign) = *stmt.expr else {
        panic!("expected an assignment");
    };
    let Expr::Binary(bin) = *assign.right else {
        panic!("expected a binary expression");
    };
    let Expr::Capture(capture) = *bin.left else {
        panic!("expected a capture");
    };
    assert_eq!(capture.loc.text(src), "{{  spaced  }}");
    assert_eq!(capture.loc.start.column, 5);
}

#[test]
fn test_capture_serializes_with_its_fields() {
    let expr = jspat_core::parse_expression("{{x}}", &options()).unwrap();
    let json = serde_json::to_value(&expr).unwrap();
    let capture = &json["Capture"];
    assert_eq!(capture["name"], "x");
    assert_eq!(capture["is_list_capture"], false);
    assert_eq!(capture["loc"]["start"]["offset"], 0);
    assert_eq!(capture["loc"]["end"]["offset"], 5);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_missing_capture_name() {
    assert_eq!(
        error("{{}};"),
        ("Unexpected token, expected Capture name".to_string(), 2)
    );
    assert_eq!(
        error("f({{ 1 }});"),
        ("Unexpected token, expected Capture name".to_string(), 5)
    );
}

#[test]
fn test_unterminated_capture() {
    let (message, offset) = error("a = {{x};");
    assert_eq!(message, "Unexpected token, expected \"}}\"");
    assert_eq!(offset, 7);
}

#[test]
fn test_list_capture_where_one_value_is_allowed() {
    for (src, offset) in [
        ("function {{...f}}() {}", 11),
        ("try {} catch ({{...e}}) {}", 16),
        ("a.{{...b}};", 4),
        ("x = {{...y}};", 6),
    ] {
        assert_eq!(
            error(src),
            ("Cannot use list Capture here".to_string(), offset),
            "{src}"
        );
    }
}

#[test]
fn test_malformed_list_capture_after_comma() {
    // The lookahead saw `{{...`, but the element before it is broken.
    let (message, _) = error("f(a b, {{...rest}});");
    assert_eq!(message, "Unexpected token, expected \",\"");
}

#[test]
fn test_list_capture_must_be_alone_at_program_level() {
    let (message, _) = error("{{...body}} more();");
    assert_eq!(message, "Unexpected token");
}

#[test]
fn test_base_grammar_rejects_capture_tokens_it_never_sees() {
    // Without the plugin `{{` is two braces.
    let program = jspat_core::parse("{{}}", &ParserOptions::default()).unwrap();
    assert!(matches!(program.body.items(), Some([Stmt::Block(_)])));
    assert!(jspat_core::parse("{{x}}", &ParserOptions::default()).is_ok());
    assert!(jspat_core::parse("f({{x}})", &ParserOptions::default()).is_err());
}

// ---------------------------------------------------------------------------
// Ordinary code
// ---------------------------------------------------------------------------

#[test]
fn test_ordinary_code_parses_identically() {
    let sources = [
        "{ {} }",
        "a={}",
        "if (a) { b({ c: { d } }) }",
        "const { a: { b } } = c;",
        "function f() { return `${ {a: 1}.a }` }",
        "label: for (;;) { break label; }",
        "class A { static { this.x = {}; } }",
        "var yield = 1; yield;",
    ];
    for src in sources {
        let plain = jspat_core::parse(src, &ParserOptions::default()).unwrap();
        let extended = parse(src);
        assert_eq!(format!("{plain:?}"), format!("{extended:?}"), "{src}");
    }
}
