#[cfg(test)]
mod parser_tests {
    use slox::ast::{Expr, Stmt};
    use slox::ast_printer::AstPrinter;
    use slox::error::LoxError;
    use slox::parser::Parser;
    use slox::reporting::MemoryReporter;
    use slox::scanner::Scanner;
    use slox::token::{Token, TokenType};

    fn tokens(source: &str, reporter: &mut MemoryReporter) -> Vec<Token> {
        Scanner::new(source).scan_tokens(reporter)
    }

    fn parse_program(source: &str) -> (Result<Vec<Stmt>, LoxError>, MemoryReporter) {
        let mut reporter = MemoryReporter::new();
        let toks: Vec<Token> = tokens(source, &mut reporter);
        let result = Parser::new(toks, &mut reporter).parse();
        (result, reporter)
    }

    fn parse_expression(source: &str) -> (Result<Expr, LoxError>, MemoryReporter) {
        let mut reporter = MemoryReporter::new();
        let toks: Vec<Token> = tokens(source, &mut reporter);
        let result = Parser::new(toks, &mut reporter).parse_expression();
        (result, reporter)
    }

    /// Parses a program that must be valid and prints each statement.
    fn printed(source: &str) -> Vec<String> {
        let (result, reporter) = parse_program(source);
        let statements: Vec<Stmt> = match result {
            Ok(statements) => statements,
            Err(e) => panic!("{}: {:?}", e, reporter.errors()),
        };
        statements.iter().map(AstPrinter::print_stmt).collect()
    }

    #[test]
    fn test_parser_01_assignment_expression_structure() {
        let (result, reporter) =
            parse_expression("t = (13 + 4) - myFun(true, x < y and x >= -z)");

        assert!(reporter.errors().is_empty());

        let expr: Expr = result.expect("expression should parse");

        let Expr::Assign { name, value, .. } = &expr else {
            panic!("expected assignment, got {:?}", expr);
        };
        assert_eq!(name.lexeme, "t");

        let Expr::Binary { left, operator, right } = value.as_ref() else {
            panic!("expected subtraction, got {:?}", value);
        };
        assert_eq!(operator.token_type, TokenType::MINUS);
        assert!(matches!(left.as_ref(), Expr::Grouping(_)));

        let Expr::Call { callee, arguments, paren } = right.as_ref() else {
            panic!("expected call, got {:?}", right);
        };
        assert!(matches!(callee.as_ref(), Expr::Variable { name, .. } if name.lexeme == "myFun"));
        assert_eq!(arguments.len(), 2);
        assert_eq!(paren.token_type, TokenType::RIGHT_PAREN);
        assert!(matches!(&arguments[1], Expr::Logical { operator, .. } if operator.lexeme == "and"));

        assert_eq!(
            AstPrinter::print(&expr),
            "(= t (- (group (+ 13 4)) (call myFun true (and (< x y) (>= x (- z))))))"
        );
    }

    #[test]
    fn test_parser_02_precedence_and_associativity() {
        let (result, _) = parse_expression("1 - 2 - 3 * 4 == !false or nil");
        let expr: Expr = result.expect("expression should parse");

        assert_eq!(
            AstPrinter::print(&expr),
            "(or (== (- (- 1 2) (* 3 4)) (! false)) nil)"
        );
    }

    #[test]
    fn test_parser_03_assignment_is_right_associative() {
        let (result, _) = parse_expression("a = b = 3");
        let expr: Expr = result.expect("expression should parse");

        assert_eq!(AstPrinter::print(&expr), "(= a (= b 3))");
    }

    #[test]
    fn test_parser_04_var_declarations() {
        assert_eq!(
            printed("var language = \"slox\"; var empty;"),
            ["(var language slox)", "(var empty)"]
        );
    }

    #[test]
    fn test_parser_05_function_declaration() {
        assert_eq!(
            printed("fun add(a, b) { print a + b; }"),
            ["(fun add (a b) (print (+ a b)))"]
        );
    }

    #[test]
    fn test_parser_06_anonymous_function() {
        assert_eq!(
            printed("var f = fun (a, b) { return a + b; }; fun () {};"),
            [
                "(var f (lambda (a b) (return (+ a b))))",
                "(; (lambda ()))",
            ]
        );
    }

    #[test]
    fn test_parser_07_for_loop_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            ["(block (var i 0) (while (< i 3) (block (print i) (; (= i (+ i 1))))))"]
        );

        assert_eq!(printed("for (;;) print 1;"), ["(while true (print 1))"]);
    }

    #[test]
    fn test_parser_08_control_flow_statements() {
        assert_eq!(
            printed("if (a) print 1; else { print 2; } while (b) b = false;"),
            [
                "(if a (print 1) (block (print 2)))",
                "(while b (; (= b false)))",
            ]
        );
    }

    #[test]
    fn test_parser_09_calls_chain() {
        assert_eq!(printed("f(1)(2, 3)();"), ["(; (call (call (call f 1) 2 3)))"]);
    }

    #[test]
    fn test_parser_10_reports_every_error() {
        let (result, reporter) = parse_program("print ;\nvar = 1;\nprint 2;");

        assert!(matches!(result, Err(LoxError::Syntax { errors: 2 })));
        assert_eq!(
            reporter.errors(),
            [
                "[line 1] Error at ';': Expect expression.",
                "[line 2] Error at '=': Expect variable name.",
            ]
        );
    }

    #[test]
    fn test_parser_11_invalid_assignment_target() {
        let (result, reporter) = parse_program("1 = 2;\nprint 3;");

        assert!(matches!(result, Err(LoxError::Syntax { errors: 1 })));
        assert_eq!(
            reporter.errors(),
            ["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn test_parser_12_error_at_end() {
        let (result, reporter) = parse_program("print 1");

        assert!(result.is_err());
        assert_eq!(
            reporter.errors(),
            ["[line 1] Error at end: Expect ';' after value."]
        );
    }

    #[test]
    fn test_parser_13_trailing_tokens_after_expression() {
        let (result, reporter) = parse_expression("1 2");

        assert!(matches!(result, Err(LoxError::Syntax { errors: 1 })));
        assert_eq!(
            reporter.errors(),
            ["[line 1] Error at '2': Expect end of expression."]
        );
    }

    #[test]
    fn test_parser_14_too_many_arguments() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source: String = format!("f({});", args.join(", "));

        let (result, reporter) = parse_program(&source);

        assert!(result.is_err());
        assert_eq!(
            reporter.errors(),
            ["[line 1] Error at '255': Can't have more than 255 arguments."]
        );
    }

    #[test]
    fn test_parser_15_missing_eof_is_appended() {
        let mut reporter = MemoryReporter::new();
        let toks: Vec<Token> = vec![
            Token::new(TokenType::PRINT, "print", 1),
            Token::new(TokenType::TRUE, "true", 1),
            Token::new(TokenType::SEMICOLON, ";", 1),
        ];

        let statements = Parser::new(toks, &mut reporter)
            .parse()
            .expect("program should parse");

        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parser_16_variables_get_distinct_ids() {
        let (result, _) = parse_expression("a + a");
        let expr: Expr = result.expect("expression should parse");

        let Expr::Binary { left, right, .. } = expr else {
            panic!("expected binary");
        };

        match (*left, *right) {
            (Expr::Variable { id: l, .. }, Expr::Variable { id: r, .. }) => assert_ne!(l, r),
            other => panic!("unexpected operands: {:?}", other),
        }
    }
}
