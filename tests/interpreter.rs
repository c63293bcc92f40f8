mod common;

#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use super::common::{output_of, run, runtime_error, SharedBuffer};
    use rox::session::{RunError, Session};
    use rox::value::Value;

    #[test]
    fn arithmetic_and_printing() {
        assert_eq!(
            output_of("print 1 + 2; print 7 / 2; print -3 * 2; print 10 - 0.5; print 2 * 3.0;"),
            "3\n3.5\n-6\n9.5\n6\n"
        );
    }

    #[test]
    fn strings_concatenate() {
        assert_eq!(output_of("print \"foo\" + \"bar\";"), "foobar\n");
    }

    #[test]
    fn equality_and_truthiness() {
        let source = r#"
            print nil == nil;
            print nil == false;
            print 1 == 1;
            print "a" != "a";
            print 1 == "1";
            if (0) print "zero is truthy";
            if ("") print "empty string is truthy";
            if (nil) print "unreachable"; else print "nil is falsy";
            print !nil;
        "#;
        assert_eq!(
            output_of(source),
            "true\nfalse\ntrue\nfalse\nfalse\nzero is truthy\nempty string is truthy\nnil is falsy\ntrue\n"
        );
    }

    #[test]
    fn logical_operators_return_operands() {
        assert_eq!(
            output_of("print nil or \"yes\"; print 1 or 2; print nil and 1; print 1 and 2;"),
            "yes\n1\nnil\n2\n"
        );
    }

    #[test]
    fn logical_operators_short_circuit() {
        let source = r#"
            var calls = 0;
            fun bump() { calls = calls + 1; return true; }
            print true or bump();
            print false and bump();
            print calls;
        "#;
        assert_eq!(output_of(source), "true\nfalse\n0\n");
    }

    #[test]
    fn block_scoping_and_assignment() {
        let source = r#"
            var a = "outer";
            {
              var a = "inner";
              print a;
              a = "changed";
              print a;
            }
            print a;
        "#;
        assert_eq!(output_of(source), "inner\nchanged\nouter\n");
    }

    #[test]
    fn while_and_for_loops() {
        let source = r#"
            var i = 0;
            while (i < 3) { print i; i = i + 1; }
            for (var j = 10; j > 7; j = j - 1) print j;
        "#;
        assert_eq!(output_of(source), "0\n1\n2\n10\n9\n8\n");
    }

    #[test]
    fn recursion_and_return() {
        let source = r#"
            fun fib(n) {
              if (n < 2) return n;
              return fib(n - 1) + fib(n - 2);
            }
            print fib(15);
        "#;
        assert_eq!(output_of(source), "610\n");
    }

    #[test]
    fn return_from_inside_a_loop() {
        let source = r#"
            fun first_over(limit) {
              for (var i = 0; ; i = i + 1) {
                if (i * i > limit) return i;
              }
            }
            print first_over(50);
        "#;
        assert_eq!(output_of(source), "8\n");
    }

    #[test]
    fn function_without_return_yields_nil() {
        assert_eq!(output_of("fun f() {} print f();"), "nil\n");
    }

    #[test]
    fn closures_keep_their_environment() {
        let source = r#"
            fun makeCounter() {
              var i = 0;
              fun count() { i = i + 1; return i; }
              return count;
            }
            var a = makeCounter();
            var b = makeCounter();
            print a(); print a(); print b();
        "#;
        assert_eq!(output_of(source), "1\n2\n1\n");
    }

    #[test]
    fn closures_capture_one_binding_per_iteration() {
        let source = r#"
            var f0; var f1; var f2;
            for (var i = 0; i < 3; i = i + 1) {
              var j = i;
              fun show() { print j; }
              if (j == 0) f0 = show;
              if (j == 1) f1 = show;
              if (j == 2) f2 = show;
            }
            f0(); f1(); f2();
        "#;
        assert_eq!(output_of(source), "0\n1\n2\n");
    }

    #[test]
    fn values_print_in_natural_form() {
        let source = r#"
            fun f() {}
            class K {}
            print f;
            print K;
            print K();
            print clock;
        "#;
        assert_eq!(output_of(source), "<fn f>\nK\nK instance\n<native fn>\n");
    }

    #[test]
    fn clock_returns_a_number() {
        assert_eq!(output_of("print clock() > 0;"), "true\n");
    }

    #[test]
    fn classes_fields_and_methods() {
        let source = r#"
            class Point {
              init(x, y) { this.x = x; this.y = y; }
              sum() { return this.x + this.y; }
            }
            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            print p.sum();
            var m = p.sum;
            print m();
        "#;
        assert_eq!(output_of(source), "3\n12\n12\n");
    }

    #[test]
    fn fields_shadow_methods() {
        let source = r#"
            class A { m() { return "method"; } }
            var a = A();
            print a.m();
            a.m = "field";
            print a.m;
        "#;
        assert_eq!(output_of(source), "method\nfield\n");
    }

    #[test]
    fn initializer_always_returns_the_instance() {
        let source = r#"
            class A { init() { this.n = 1; } }
            var a = A();
            print a.init() == a;
            print a.n;
        "#;
        assert_eq!(output_of(source), "true\n1\n");
    }

    #[test]
    fn inherited_methods_and_super_dispatch() {
        let source = r#"
            class A {
              method() { print "A method"; }
              describe() { print "A describe"; this.method(); }
            }
            class B < A {
              method() { print "B method"; }
              describe() { print "B describe"; super.describe(); }
            }
            B().describe();
        "#;
        assert_eq!(
            output_of(source),
            "B describe\nA describe\nB method\n"
        );
    }

    #[test]
    fn super_chain_starts_at_the_defining_class() {
        let source = r#"
            class A { say() { print "A"; } }
            class B < A { say() { print "B"; super.say(); } }
            class C < B { say() { print "C"; super.say(); } }
            C().say();
        "#;
        assert_eq!(output_of(source), "C\nB\nA\n");
    }

    #[test]
    fn inherited_initializer_sets_arity() {
        let source = r#"
            class A { init(n) { this.n = n; } }
            class B < A {}
            print B(4).n;
        "#;
        assert_eq!(output_of(source), "4\n");
    }

    #[test]
    fn wrong_arity_is_fatal() {
        let (output, error) = runtime_error("fun f(a, b) {}\nprint \"before\";\nf(1);\nprint \"after\";");
        assert_eq!(output, "before\n");
        assert_eq!(error, "Expected 2 arguments but got 1.\n[line 3]");
    }

    #[test]
    fn class_arity_follows_init() {
        let (_, error) = runtime_error("class A {}\nA(1);");
        assert_eq!(error, "Expected 0 arguments but got 1.\n[line 2]");
    }

    #[test]
    fn runtime_type_errors() {
        let cases = [
            ("print -\"x\";", "Operand must be a number.\n[line 1]"),
            ("print 1 + \"x\";", "Operands must be two numbers or two strings.\n[line 1]"),
            ("print 1 < nil;", "Operands must be numbers.\n[line 1]"),
            ("print \"a\" * 2;", "Operands must be numbers.\n[line 1]"),
            ("print missing;", "Undefined variable 'missing'.\n[line 1]"),
            ("missing = 1;", "Undefined variable 'missing'.\n[line 1]"),
            ("\"str\"();", "Can only call functions and classes.\n[line 1]"),
            ("var x = 1; print x.y;", "Only instances have properties.\n[line 1]"),
            ("var x = 1; x.y = 2;", "Only instances have fields.\n[line 1]"),
            ("class A {} print A().nope;", "Undefined property 'nope'.\n[line 1]"),
            ("var NotClass = 1; class B < NotClass {}", "Superclass must be a class.\n[line 1]"),
        ];

        for (source, expected) in cases {
            let (_, error) = runtime_error(source);
            assert_eq!(error, expected, "source: {}", source);
        }
    }

    #[test]
    fn runtime_error_inside_block_restores_environment() {
        let buffer = SharedBuffer::default();
        let mut session = Session::with_writer(buffer.clone());

        session.run("var x = \"global\";").unwrap();
        let result = session.run("{ var x = \"local\"; print nil + 1; }");
        assert!(matches!(result, Err(RunError::Runtime(_))));

        // A later run must see globals, not the abandoned block scope.
        session.run("print x;").unwrap();
        assert_eq!(buffer.contents(), "global\n");
    }

    #[test]
    fn globals_persist_across_runs() {
        let buffer = SharedBuffer::default();
        let mut session = Session::with_writer(buffer.clone());

        session.run("var count = 1; fun inc() { count = count + 1; }").unwrap();
        session.run("inc(); inc();").unwrap();
        session.run("print count;").unwrap();

        assert_eq!(buffer.contents(), "3\n");
    }

    #[test]
    fn static_errors_stop_before_execution() {
        let (output, result) = run("print \"side effect\";\nprint 1 +;");
        assert_eq!(output, "");
        match result {
            Err(e @ RunError::Static(_)) => assert_eq!(e.exit_code(), 65),
            other => panic!("expected static error, got {:?}", other),
        }
    }

    #[test]
    fn runtime_errors_exit_with_70() {
        let (_, result) = run("print nil - 1;");
        assert_eq!(result.map_err(|e| e.exit_code()), Err(70));
    }

    #[test]
    fn evaluate_single_expression() {
        let mut session = Session::with_writer(SharedBuffer::default());
        let value = session.evaluate("(1 + 2) * 3 == 9").unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        assert_eq!(output_of("print 1 / 0 > 1000;"), "true\n");
    }
}
