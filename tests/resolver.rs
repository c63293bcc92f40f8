mod common;

#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;

    use super::common::{output_of, static_errors};

    #[test]
    fn return_at_top_level_is_rejected_and_nothing_runs() {
        assert_eq!(
            static_errors("print 1;\nreturn 2;"),
            vec!["[line 2] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn duplicate_local_declaration() {
        assert_eq!(
            static_errors("{\n  var a = 1;\n  var a = 2;\n}"),
            vec!["[line 3] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn duplicate_parameter() {
        assert_eq!(
            static_errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn reading_local_in_its_own_initializer() {
        assert_eq!(
            static_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn shadowing_initializer_reads_the_outer_binding() {
        assert_eq!(output_of("var a = 1; { var a = a + 1; print a; }"), "2\n");
        assert_eq!(
            output_of("{ var b = 10; { var b = b * 2; print b; } print b; }"),
            "20\n10\n"
        );
    }

    #[test]
    fn returning_a_value_from_init() {
        assert_eq!(
            static_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn bare_return_in_init_is_allowed() {
        assert_eq!(
            output_of("class A { init() { this.x = 1; return; this.x = 2; } }\nprint A().x;"),
            "1\n"
        );
    }

    #[test]
    fn this_outside_a_class() {
        assert_eq!(
            static_errors("print this;\nfun f() { return this; }"),
            vec![
                "[line 1] Error at 'this': Can't use 'this' outside of a class.",
                "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            ]
        );
    }

    #[test]
    fn super_misuse() {
        assert_eq!(
            static_errors("super.x();\nclass A { f() { super.f(); } }"),
            vec![
                "[line 1] Error at 'super': Can't use 'super' outside of a class.",
                "[line 2] Error at 'super': Can't use 'super' in a class with no superclass.",
            ]
        );
    }

    #[test]
    fn class_inheriting_from_itself() {
        assert_eq!(
            static_errors("class Oops < Oops {}"),
            vec!["[line 1] Error at 'Oops': A class can't inherit from itself."]
        );
    }

    #[test]
    fn errors_accumulate_across_the_whole_program() {
        let errors = static_errors("return;\n{ var x; var x; }\nclass C < C {}");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn resolution_is_static_not_dynamic() {
        let source = r#"
            var a = "global";
            {
              fun showA() { print a; }
              showA();
              var a = "block";
              showA();
              print a;
            }
        "#;
        assert_eq!(output_of(source), "global\nglobal\nblock\n");
    }

    #[test]
    fn global_redeclaration_is_allowed() {
        assert_eq!(output_of("var x = 1; var x; print x; var x = 3; print x;"), "nil\n3\n");
    }

    #[test]
    fn own_initializer_only_sees_globals_declared_earlier() {
        // Resolution is static: `zz` is not yet a global when `h` is resolved.
        assert_eq!(
            static_errors("fun h() { { var zz = zz; } }\nvar zz = 1;\nh();"),
            vec!["[line 1] Error at 'zz': Can't read local variable in its own initializer."]
        );

        assert_eq!(
            output_of("var zz = 1;\nfun h() { { var zz = zz + 1; print zz; } }\nh();"),
            "2\n"
        );
    }
}
