#[cfg(test)]
mod printer_tests {
    use slox::ast::{Expr, LiteralValue};
    use slox::ast_printer::{AstPrinter, RpnPrinter};
    use slox::lox::Lox;
    use slox::reporting::{MemoryReporter, NullReporter};
    use slox::token::{Token, TokenType};

    fn number(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(LiteralValue::Number(n)))
    }

    fn binary(left: Box<Expr>, ttype: TokenType, lexeme: &str, right: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::Binary {
            left,
            operator: Token::new(ttype, lexeme, 1),
            right,
        })
    }

    fn parse_tree(source: &str) -> String {
        let mut lox = Lox::new(NullReporter, MemoryReporter::new());
        lox.parse_tree(source).expect("program should parse")
    }

    #[test]
    fn test_printer_01_s_expression() {
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: Token::new(TokenType::MINUS, "-", 1),
                right: number(123.0),
            }),
            operator: Token::new(TokenType::STAR, "*", 1),
            right: Box::new(Expr::Grouping(number(45.67))),
        };

        assert_eq!(AstPrinter::print(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn test_printer_02_reverse_polish() {
        let expr = binary(
            binary(number(1.0), TokenType::PLUS, "+", number(2.0)),
            TokenType::STAR,
            "*",
            binary(number(4.0), TokenType::MINUS, "-", number(3.0)),
        );

        assert_eq!(RpnPrinter::print(&expr), "1 2 + 4 3 - *");
    }

    #[test]
    fn test_printer_03_reverse_polish_names() {
        let expr = Expr::assign(
            Token::new(TokenType::IDENTIFIER, "t", 1),
            Expr::Call {
                callee: Box::new(Expr::variable(Token::new(TokenType::IDENTIFIER, "f", 1))),
                paren: Token::new(TokenType::RIGHT_PAREN, ")", 1),
                arguments: vec![
                    Expr::Literal(LiteralValue::True),
                    Expr::Grouping(number(2.5)),
                ],
            },
        );

        assert_eq!(RpnPrinter::print(&expr), "true 2.5 group f := t");
    }

    #[test]
    fn test_printer_04_literals() {
        assert_eq!(AstPrinter::print(&Expr::Literal(LiteralValue::Nil)), "nil");
        assert_eq!(
            AstPrinter::print(&Expr::Literal(LiteralValue::Str("hi".into()))),
            "hi"
        );
        assert_eq!(AstPrinter::print(&number(4.0)), "4");
    }

    #[test]
    fn test_printer_05_statements() {
        assert_eq!(
            parse_tree("var a = 1;\n{ print a; }\nfun f(x) { return; }\nf(a);"),
            "(var a 1)\n(block (print a))\n(fun f (x) (return))\n(; (call f a))"
        );
    }
}
