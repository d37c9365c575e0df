#[cfg(test)]
mod scanner_tests {
    use slox::reporting::MemoryReporter;
    use slox::scanner::*;
    use slox::token::*;

    fn scan(source: &str) -> (Vec<Token>, MemoryReporter) {
        let mut reporter = MemoryReporter::new();
        let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut reporter);
        (tokens, reporter)
    }

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let (tokens, reporter) = scan(source);

        assert!(reporter.errors().is_empty(), "{:?}", reporter.errors());
        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_empty_input() {
        for source in ["", "   \t\r  "] {
            let (tokens, _) = scan(source);

            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].token_type, TokenType::EOF);
            assert_eq!(tokens[0].line, 1);
        }
    }

    #[test]
    fn test_scanner_04_var_declaration() {
        let (tokens, _) = scan("var language = \"slox\";");

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].token_type, TokenType::VAR);
        assert_eq!(tokens[1].token_type, TokenType::IDENTIFIER);
        assert_eq!(tokens[1].lexeme, "language");
        assert_eq!(tokens[2].token_type, TokenType::EQUAL);
        assert_eq!(tokens[3].token_type, TokenType::STRING("slox".to_string()));
        assert_eq!(tokens[3].lexeme, "\"slox\"");
        assert_eq!(tokens[4].token_type, TokenType::SEMICOLON);
        assert_eq!(tokens[5].token_type, TokenType::EOF);
    }

    #[test]
    fn test_scanner_05_comments_are_skipped() {
        let (tokens, _) = scan("// nothing here\nprint 1; // trailing\n");

        let kinds: Vec<&'static str> = tokens.iter().map(|t| t.token_type.name()).collect();
        assert_eq!(kinds, ["PRINT", "NUMBER", "SEMICOLON", "EOF"]);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_scanner_06_keywords_and_identifiers() {
        assert_token_sequence(
            "and or fun return nil orchid _x1",
            &[
                (TokenType::AND, "and"),
                (TokenType::OR, "or"),
                (TokenType::FUN, "fun"),
                (TokenType::RETURN, "return"),
                (TokenType::NIL, "nil"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_numbers() {
        let (tokens, _) = scan("123 45.67 8.");

        match (&tokens[0].token_type, &tokens[1].token_type, &tokens[2].token_type) {
            (TokenType::NUMBER(a), TokenType::NUMBER(b), TokenType::NUMBER(c)) => {
                assert_eq!(*a, 123.0);
                assert_eq!(*b, 45.67);
                assert_eq!(*c, 8.0);
            }
            other => panic!("unexpected tokens: {:?}", other),
        }

        // the trailing dot is its own token
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_scanner_08_multiline_string_counts_lines() {
        let (tokens, _) = scan("\"one\ntwo\"\nx");

        assert_eq!(tokens[0].token_type, TokenType::STRING("one\ntwo".to_string()));
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_scanner_09_token_display() {
        let (tokens, _) = scan("var x = 3; \"hi\" 2.5");
        let shown: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            shown,
            [
                "VAR var null",
                "IDENTIFIER x null",
                "EQUAL = null",
                "NUMBER 3 3.0",
                "SEMICOLON ; null",
                "STRING \"hi\" hi",
                "NUMBER 2.5 2.5",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_10_tokens_serialize_to_json() {
        let (tokens, _) = scan("var n = 3;");
        let json: String = serde_json::to_string(&tokens).expect("tokens serialize");

        assert!(json.starts_with(r#"[{"token_type":"VAR","lexeme":"var","line":1}"#));
        assert!(json.contains(r#"{"token_type":{"NUMBER":3.0},"lexeme":"3","line":1}"#));
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let (tokens, reporter) = scan(",.$(#");

        let kinds: Vec<&'static str> = tokens.iter().map(|t| t.token_type.name()).collect();
        assert_eq!(kinds, ["COMMA", "DOT", "LEFT_PAREN", "EOF"]);

        assert_eq!(
            reporter.errors(),
            [
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );
    }

    #[test]
    fn test_unexpected_multibyte_character_is_one_error() {
        let mut scanner = Scanner::new("a é b");
        let mut reporter = MemoryReporter::new();
        let tokens: Vec<Token> = scanner.scan_tokens(&mut reporter);

        assert_eq!(scanner.error_count(), 1);
        assert_eq!(reporter.errors(), ["[line 1] Error: Unexpected character: é"]);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, reporter) = scan("print \"oops\n");

        assert_eq!(reporter.errors(), ["[line 2] Error: Unterminated string."]);
        assert_eq!(tokens.last().map(|t| t.token_type.name()), Some("EOF"));
    }

    #[test]
    fn test_iterator_is_fused_after_eof() {
        let mut scanner = Scanner::new("1");

        assert!(matches!(scanner.next(), Some(Ok(_))));
        assert!(matches!(scanner.next(), Some(Ok(t)) if t.token_type == TokenType::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
