use pretty_assertions::assert_eq;

use rlox::error::LoxError;
use rlox::parser::{Expr, Parser, Stmt};
use rlox::resolver::{Bindings, Resolver};
use rlox::scanner::Scanner;

fn resolve(source: &str) -> (Bindings, Vec<LoxError>) {
    let (tokens, scan_errors) = Scanner::new(source.as_bytes()).scan();
    assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");

    let (statements, parse_errors) = Parser::new(&tokens).parse();
    assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");

    let mut resolver = Resolver::new();
    let (bindings, errors) = resolver.resolve(&statements);
    (bindings, errors)
}

fn messages(errors: &[LoxError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}

#[test]
fn self_reference_with_no_outer_binding_is_a_static_error() {
    let (_, errors) = resolve("{ var a = a; }");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn top_level_self_reference_is_also_static() {
    let (_, errors) = resolve("var a = a;");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("in its own initializer"));
}

#[test]
fn shadowing_initializer_may_read_the_outer_global() {
    // The initializer's `a` binds to the top-level declaration, so this is
    // legal and must produce no binding entry (global, by-name).
    let (_, errors) = resolve("var a = 1; { var a = a + 1; print a; }");

    assert!(errors.is_empty(), "expected no static errors: {errors:?}");
}

#[test]
fn shadowing_initializer_may_read_an_enclosing_local() {
    let (_, errors) = resolve("{ var a = 1; { var a = a + 1; print a; } }");

    assert!(errors.is_empty(), "expected no static errors: {errors:?}");
}

#[test]
fn local_redeclaration_in_the_same_scope_is_rejected() {
    let (_, errors) = resolve("fun f() { var a = 1; var a = 2; }");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn global_redeclaration_is_allowed() {
    let (_, errors) = resolve("var a = 1; var a = 2;");
    assert!(errors.is_empty());
}

#[test]
fn return_outside_a_function_is_rejected() {
    let (_, errors) = resolve("return 1;");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'return': Can't return from top-level code."]
    );
}

#[test]
fn returning_a_value_from_an_initializer_is_rejected() {
    let (_, errors) = resolve("class A { init() { return 1; } }");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
    );

    // A bare return in an initializer stays legal.
    let (_, errors) = resolve("class A { init() { return; } }");
    assert!(errors.is_empty());
}

#[test]
fn this_outside_a_class_is_rejected() {
    let (_, errors) = resolve("print this;");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
}

#[test]
fn super_outside_a_class_and_without_a_superclass_are_rejected() {
    let (_, errors) = resolve("print super.x;");
    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
    );

    let (_, errors) = resolve("class A { f() { super.f(); } }");
    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );
}

#[test]
fn a_class_cannot_inherit_from_itself() {
    let (_, errors) = resolve("class A < A {}");

    assert_eq!(
        messages(&errors),
        vec!["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn errors_are_collected_not_fatal() {
    let (_, errors) = resolve("return 1;\nprint this;\n");
    assert_eq!(errors.len(), 2);
}

#[test]
fn distances_count_skipped_scopes_exactly() {
    // fun outer() { var x = 1; fun inner() { print x; } }
    //   `x` in inner's body: one scope (inner's body) skipped → distance 1.
    let source = "fun outer() { var x = 1; fun inner() { print x; } }";

    let (tokens, _) = Scanner::new(source.as_bytes()).scan();
    let (statements, _) = Parser::new(&tokens).parse();

    let mut resolver = Resolver::new();
    let (bindings, errors) = resolver.resolve(&statements);
    assert!(errors.is_empty());

    // Dig out the `x` variable reference inside inner's print statement.
    let Stmt::Function(outer) = &statements[0] else {
        panic!("expected outer function");
    };
    let Stmt::Function(inner) = &outer.body[1] else {
        panic!("expected inner function");
    };
    let Stmt::Print(Expr::Variable { id, name }) = &inner.body[0] else {
        panic!("expected print of a variable");
    };

    assert_eq!(name.lexeme, "x");
    assert_eq!(bindings.get(id), Some(&1));
}

#[test]
fn globals_get_no_binding_entry() {
    let source = "var g = 1; fun f() { print g; }";

    let (tokens, _) = Scanner::new(source.as_bytes()).scan();
    let (statements, _) = Parser::new(&tokens).parse();

    let mut resolver = Resolver::new();
    let (bindings, errors) = resolver.resolve(&statements);
    assert!(errors.is_empty());

    let Stmt::Function(f) = &statements[1] else {
        panic!("expected function");
    };
    let Stmt::Print(Expr::Variable { id, .. }) = &f.body[0] else {
        panic!("expected print of a variable");
    };

    assert_eq!(bindings.get(id), None);
}
