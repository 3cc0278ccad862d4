use pretty_assertions::assert_eq;

use rlox::error::LoxError;
use rlox::parser::{Expr, LiteralValue, Parser, Stmt};
use rlox::scanner::Scanner;
use rlox::token::TokenType;

fn parse(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
    let (tokens, scan_errors) = Scanner::new(source.as_bytes()).scan();
    assert!(scan_errors.is_empty(), "unexpected scan errors: {scan_errors:?}");

    Parser::new(&tokens).parse()
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let (statements, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    statements
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let statements = parse_ok("1 + 2 * 3;");

    let Stmt::Expression(Expr::Binary {
        left,
        operator,
        right,
    }) = &statements[0]
    else {
        panic!("expected a binary expression statement");
    };

    assert_eq!(operator.token_type, TokenType::PLUS);
    assert_eq!(**left, Expr::Literal(LiteralValue::Number(1.0)));

    let Expr::Binary { operator, .. } = &**right else {
        panic!("expected the right operand to be the multiplication");
    };
    assert_eq!(operator.token_type, TokenType::STAR);
}

#[test]
fn assignment_is_right_associative() {
    let statements = parse_ok("a = b = 1;");

    let Stmt::Expression(Expr::Assign { name, value, .. }) = &statements[0] else {
        panic!("expected assignment");
    };

    assert_eq!(name.lexeme, "a");
    assert!(matches!(&**value, Expr::Assign { .. }));
}

#[test]
fn call_and_property_postfixes_chain_greedily() {
    let statements = parse_ok("a.b(c).d;");

    // Outermost node is the `.d` get on the call result.
    let Stmt::Expression(Expr::Get { object, name }) = &statements[0] else {
        panic!("expected property access");
    };

    assert_eq!(name.lexeme, "d");

    let Expr::Call { callee, arguments, .. } = &**object else {
        panic!("expected call under the get");
    };
    assert_eq!(arguments.len(), 1);
    assert!(matches!(&**callee, Expr::Get { .. }));
}

#[test]
fn assignment_to_a_property_becomes_a_set_node() {
    let statements = parse_ok("a.b = 1;");
    assert!(matches!(
        &statements[0],
        Stmt::Expression(Expr::Set { .. })
    ));
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    let (_, errors) = parse("a + b = 1;");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at '=': Invalid assignment target."
    );
}

#[test]
fn recovery_surfaces_independent_errors_on_different_lines() {
    let (statements, errors) = parse("var = 1;\nprint 2;\nvar = 3;\n");

    assert_eq!(errors.len(), 2, "both errors should be reported: {errors:?}");
    assert!(errors[0].to_string().starts_with("[line 1]"));
    assert!(errors[1].to_string().starts_with("[line 3]"));

    // The healthy statement in between was still recovered.
    assert!(statements.iter().any(|s| matches!(s, Stmt::Print(_))));
}

#[test]
fn error_at_eof_is_located_at_end() {
    let (_, errors) = parse("print 1");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at end: Expect ';' after value."
    );
}

#[test]
fn for_loops_desugar_to_while() {
    let statements = parse_ok("for (var i = 0; i < 3; i = i + 1) print i;");

    let Stmt::Block(parts) = &statements[0] else {
        panic!("expected the initializer block");
    };

    assert!(matches!(&parts[0], Stmt::Var { .. }));

    let Stmt::While { body, .. } = &parts[1] else {
        panic!("expected the loop to desugar into while");
    };

    // Body block ends with the increment expression statement.
    let Stmt::Block(body_parts) = &**body else {
        panic!("expected body block with increment");
    };
    assert!(matches!(body_parts[1], Stmt::Expression(Expr::Assign { .. })));
}

#[test]
fn for_without_condition_loops_on_true() {
    let statements = parse_ok("for (;;) print 1;");

    let Stmt::While { condition, .. } = &statements[0] else {
        panic!("expected bare for to become while(true)");
    };

    assert_eq!(*condition, Expr::Literal(LiteralValue::True));
}

#[test]
fn class_declarations_carry_superclass_and_methods() {
    let statements = parse_ok(
        "class Cake < Pastry {\n  init(flavor) { this.flavor = flavor; }\n  bake() { super.bake(); }\n}",
    );

    let Stmt::Class {
        name,
        superclass,
        methods,
    } = &statements[0]
    else {
        panic!("expected class declaration");
    };

    assert_eq!(name.lexeme, "Cake");
    assert!(matches!(superclass, Some(Expr::Variable { .. })));
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].name.lexeme, "init");
    assert_eq!(methods[0].params.len(), 1);
}

#[test]
fn super_requires_a_method_name() {
    let (_, errors) = parse("class A < B { f() { super; } }");

    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("Expect '.' after 'super'.")));
}

#[test]
fn too_many_arguments_is_reported_without_abandoning_the_call() {
    let args = vec!["1"; 256].join(", ");
    let (statements, errors) = parse(&format!("f({args}); print 2;"));

    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("Can't have more than 255 arguments.")));

    // The call and the statement after it still parse.
    assert!(matches!(
        &statements[0],
        Stmt::Expression(Expr::Call { .. })
    ));
    assert!(matches!(&statements[1], Stmt::Print(_)));
}

#[test]
fn too_many_parameters_is_reported_without_abandoning_the_declaration() {
    let params = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let (statements, errors) = parse(&format!("fun big({params}) {{}} print 2;"));

    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("Can't have more than 255 parameters.")));

    assert!(matches!(&statements[0], Stmt::Function(_)));
    assert!(matches!(&statements[1], Stmt::Print(_)));
}
