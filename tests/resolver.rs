#[cfg(test)]
mod resolver_tests {
    use slox::error::LoxError;
    use slox::interpreter::Interpreter;
    use slox::lox::Lox;
    use slox::parser::Parser;
    use slox::reporting::MemoryReporter;
    use slox::resolver::Resolver;
    use slox::scanner::Scanner;

    fn run(source: &str) -> (Result<(), LoxError>, MemoryReporter, MemoryReporter) {
        let output = MemoryReporter::new();
        let errors = MemoryReporter::new();
        let mut lox = Lox::new(output.clone(), errors.clone());
        let result = lox.run(source);
        (result, output, errors)
    }

    #[test]
    fn test_resolver_01_closure_binds_statically() {
        let source = r#"
            var a = "global";
            {
                fun showA() {
                    print a;
                }

                showA();
                var a = "block";
                showA();
            }
        "#;

        let (result, output, errors) = run(source);

        assert!(result.is_ok(), "{:?}", errors.errors());
        assert_eq!(output.prints(), ["global", "global"]);
    }

    #[test]
    fn test_resolver_02_redeclaration_in_local_scope() {
        let (result, output, errors) = run("{\n  var a = 1;\n  var a = 2;\n  print a;\n}");

        assert!(matches!(result, Err(LoxError::Resolve { .. })));
        assert_eq!(
            errors.errors(),
            ["[line 3] Error at 'a': Already a variable with this name in this scope."]
        );
        // nothing runs after a static error
        assert!(output.prints().is_empty());
    }

    #[test]
    fn test_resolver_03_global_redeclaration_is_allowed() {
        let (result, output, _) = run("var a = 1; var a = 2; print a;");

        assert!(result.is_ok());
        assert_eq!(output.prints(), ["2"]);
    }

    #[test]
    fn test_resolver_04_top_level_return() {
        let (result, output, errors) = run("print 1;\nreturn 2;");

        assert!(matches!(result, Err(LoxError::Resolve { .. })));
        assert_eq!(
            errors.errors(),
            ["[line 2] Error at 'return': Can't return from top-level code."]
        );
        assert!(output.prints().is_empty());
    }

    #[test]
    fn test_resolver_05_read_in_own_initializer() {
        let (result, _, errors) = run("var a = 1;\n{\n  var a = a;\n}");

        assert!(result.is_err());
        assert_eq!(
            errors.errors(),
            ["[line 3] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_resolver_06_duplicate_parameter() {
        let (result, _, errors) = run("fun f(a, a) {}");

        assert!(result.is_err());
        assert_eq!(
            errors.errors(),
            ["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_resolver_07_return_inside_function_is_fine() {
        let (result, output, _) = run("fun f() { return 7; } print f();");

        assert!(result.is_ok());
        assert_eq!(output.prints(), ["7"]);
    }

    #[test]
    fn test_resolver_08_direct_use_without_driver() {
        let mut reporter = MemoryReporter::new();
        let tokens = Scanner::new("{ var x = 1; { print x; } }").scan_tokens(&mut reporter);
        let statements = Parser::new(tokens, &mut reporter)
            .parse()
            .expect("program should parse");

        let output = MemoryReporter::new();
        let mut interpreter = Interpreter::with_reporters(output.clone(), reporter.clone());

        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .expect("program should resolve");
        interpreter
            .interpret(&statements)
            .expect("program should run");

        assert_eq!(output.prints(), ["1"]);
    }
}
