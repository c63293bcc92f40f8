#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use rox::ast::{Expr, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::diagnostics::Diagnostics;
    use rox::parser::Parser;
    use rox::scanner::Scanner;
    use rox::token::LiteralValue;

    fn parse(source: &str) -> (Vec<Stmt>, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens, &mut diagnostics).parse();
        let errors = diagnostics
            .errors()
            .iter()
            .map(|e| e.to_string())
            .collect();
        (statements, errors)
    }

    fn expression(source: &str) -> String {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let expr = Parser::new(tokens, &mut diagnostics)
            .parse_expression()
            .expect("expression parses");
        assert!(!diagnostics.has_errors());
        AstPrinter::print(&expr)
    }

    #[test]
    fn number_statement_is_a_literal() {
        for (source, value) in [("7;", 7.0), ("0.5;", 0.5), ("1234.125;", 1234.125)] {
            let (statements, errors) = parse(source);
            assert!(errors.is_empty());
            assert_eq!(
                statements,
                vec![Stmt::Expression(Expr::Literal(LiteralValue::Number(value)))]
            );
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(expression("-123 * (45.67)"), "(* (- 123) (group 45.67))");
        assert_eq!(expression("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(expression("1 + 2 * 3 == 7"), "(== (+ 1 (* 2 3)) 7)");
        assert_eq!(expression("a < b == !c"), "(== (< a b) (! c))");
        assert_eq!(expression("a = b = 1"), "(= a (= b 1))");
        assert_eq!(expression("a or b or c"), "(or (or a b) c)");
    }

    #[test]
    fn property_assignment_becomes_set() {
        let (statements, errors) = parse("obj.field = 3;");
        assert!(errors.is_empty());
        assert!(matches!(
            &statements[0],
            Stmt::Expression(Expr::Set { name, .. }) if name.lexeme == "field"
        ));
    }

    #[test]
    fn invalid_assignment_target_is_reported_but_parsing_goes_on() {
        let (statements, errors) = parse("1 + 2 = 3; print 4;");

        assert_eq!(
            errors,
            vec!["[line 1] Error at '=': Invalid assignment target.".to_string()]
        );
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn for_loop_is_desugared() {
        let (statements, errors) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
        assert!(errors.is_empty());

        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected block, got {:?}", statements[0]);
        };
        assert!(matches!(outer[0], Stmt::Var { .. }));

        let Stmt::While { body, .. } = &outer[1] else {
            panic!("expected while, got {:?}", outer[1]);
        };
        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected block body, got {:?}", body);
        };
        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn for_loop_without_clauses_loops_on_true() {
        let (statements, errors) = parse("for (;;) print 1;");
        assert!(errors.is_empty());

        assert!(matches!(
            &statements[0],
            Stmt::While {
                condition: Expr::Literal(LiteralValue::Bool(true)),
                ..
            }
        ));
    }

    #[test]
    fn class_with_superclass_and_methods() {
        let (statements, errors) = parse("class B < A { init(x) { this.x = x; } get() { return this.x; } }");
        assert!(errors.is_empty());

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &statements[0]
        else {
            panic!("expected class");
        };
        assert_eq!(name.lexeme, "B");
        assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));
        let names: Vec<&str> = methods.iter().map(|m| m.name.lexeme.as_str()).collect();
        assert_eq!(names, vec!["init", "get"]);
        assert_eq!(methods[0].params.len(), 1);
    }

    #[test]
    fn recovers_at_statement_boundaries() {
        let (statements, errors) = parse("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.".to_string(),
                "[line 3] Error at ';': Expect expression.".to_string(),
            ]
        );
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
    }

    #[test]
    fn error_at_end_of_input() {
        let (_, errors) = parse("print 1");
        assert_eq!(
            errors,
            vec!["[line 1] Error at end: Expect ';' after value.".to_string()]
        );
    }

    #[test]
    fn too_many_arguments_is_reported_once_and_parsing_continues() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});\nprint 1 +;", args.join(", "));

        let (_, errors) = parse(&source);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            "[line 1] Error at '255': Can't have more than 255 arguments."
        );
        assert_eq!(errors[1], "[line 2] Error at ';': Expect expression.");
    }

    #[test]
    fn too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (statements, errors) = parse(&source);

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'p255': Can't have more than 255 parameters.".to_string()]
        );
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn super_requires_a_method_name() {
        let (_, errors) = parse("super;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at ';': Expect '.' after 'super'.".to_string()]
        );
    }

    #[test]
    fn single_expression_must_consume_all_input() {
        for (source, expected) in [
            ("1 2", "[line 1] Error at '2': Expect end of expression."),
            ("1 + 2 )", "[line 1] Error at ')': Expect end of expression."),
        ] {
            let mut diagnostics = Diagnostics::new();
            let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
            let expr = Parser::new(tokens, &mut diagnostics).parse_expression();

            assert!(expr.is_none(), "source: {}", source);
            let errors: Vec<String> = diagnostics.errors().iter().map(|e| e.to_string()).collect();
            assert_eq!(errors, vec![expected.to_string()]);
        }
    }
}
