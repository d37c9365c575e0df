/*!
Time & Space Complexity: whole‑file overview
============================================

Definitions
-----------
* **n** = number of tokens (including the sole EOF).
* **m** = number of AST nodes (`m ≤ n`, because each token contributes at most one node).

### Time

| Phase / function              | Cost | Rationale                                                             |
|-------------------------------|-----:|-----------------------------------------------------------------------|
| `Parser::parse` main loop     | Θ(n) | Each token is consumed once via `advance()`.                          |
| Individual productions        | O(1) per token | Recursive descent is stream‑oriented; no extra scans.       |
| Error recovery `synchronize()`| O(k) | Discards tokens ≤ next statement boundary ( `k ≤ n`).                 |

**Overall:** **Θ(n)**.

### Space

| Structure                | Asymptotic | Notes                                                         |
|--------------------------|-----------:|---------------------------------------------------------------|
| Owned token vector       | O(n)       | Moved in from the scanner.                                    |
| AST (`Vec`, `Box`)       | O(m) ≈ O(n)| One `Box` per interior node; literals reuse data from tokens. |
| Parser scratch fields    | O(1)       | A few indices and temporaries.                                |

Call‑stack depth grows with syntactic nesting (≪ n in practice).

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| Error paths (`consume`, etc.)| `debug`| Context before returning structured error.|


--------------------------------------------------------------------------------
Grammar (EBNF, condensed, Crafting Interpreters dialect)
--------------------------------------------------------

```text
program        → declaration* EOF ;
declaration    → funDecl | varDecl | statement ;
funDecl        → "fun" IDENT "(" parameters? ")" block ;   (IDENT must follow "fun")
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | printStmt | whileStmt | forStmt
               | ifStmt | block | returnStmt ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
returnStmt     → "return" expression? ";" ;
exprStmt       → expression ";" ;
printStmt      → "print" expression ";" ;
whileStmt      → "while" "(" expression ")" statement ;
ifStmt         → "if" "(" expression ")" statement
               ( "else" statement )? ;
block          → "{" declaration* "}" ;
parameters     → IDENT ( "," IDENT )* ;
expression     → assignment ;
assignment     → IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality  ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" )* ;
arguments      → expression ( "," expression )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil"
               | IDENT | "(" expression ")" | funExpr ;
funExpr        → "fun" "(" parameters? ")" block ;
```

Each binary precedence level parses the next‑higher level, then folds
left‑associatively while the current token is one of its operators.
Assignment is the exception: right‑associative, and only a bare variable is a
valid target.  `for` never reaches the AST; it is desugared into a block
holding the initializer and a `while` loop.

Errors are reported to the [`ErrorReporter`] the moment they are found, then
unwind to the nearest declaration, which synchronizes and lets parsing carry on.
A single pass can therefore report several independent syntax errors.
*/

use std::rc::Rc;

use crate::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::error::{LoxError, Result};
use crate::reporting::ErrorReporter;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Upper bound on call arguments and function parameters.
const MAX_ARITY: usize = 255;

/// Top‑level parser over the scanner's token vector.
pub struct Parser<'r> {
    tokens: Vec<Token>,
    current: usize,
    reporter: &'r mut dyn ErrorReporter,
    errors: usize,
}

impl<'r> Parser<'r> {
    /// Construct a new parser.  `tokens` must end with an `EOF` token.
    pub fn new(mut tokens: Vec<Token>, reporter: &'r mut dyn ErrorReporter) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        if tokens.last().map(|t| t.token_type != TokenType::EOF).unwrap_or(true) {
            let line: usize = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenType::EOF, "", line));
        }

        Self {
            tokens,
            current: 0,
            reporter,
            errors: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement list.
    ///
    /// Every syntax error is reported as it is found; if there was at least
    /// one, the result is `LoxError::Syntax` and no statements are returned.
    pub fn parse(&mut self) -> Result<Vec<Stmt>> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.finish(statements)
    }

    /// Parse a single expression (debug tooling, REPL `:eval`).
    pub fn parse_expression(&mut self) -> Result<Expr> {
        info!("Beginning expression parse");

        let parsed: Result<Expr> = self.expression();

        if parsed.is_ok() && !self.is_at_end() {
            self.report_at_peek("Expect end of expression.");
        }

        // Failures were reported as they happened; only the summary is returned.
        match parsed {
            Ok(expr) => self.finish(expr),
            Err(_) => Err(LoxError::Syntax {
                errors: self.errors,
            }),
        }
    }

    /// Number of syntax errors reported so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    fn finish<T>(&self, parsed: T) -> Result<T> {
        if self.errors > 0 {
            debug!("Parse finished with {} error(s)", self.errors);

            return Err(LoxError::Syntax {
                errors: self.errors,
            });
        }

        Ok(parsed)
    }

    // ──────────────────────── declaration rules ───────────────────

    /// A statement boundary: errors below this point are caught here,
    /// followed by synchronization.
    fn declaration(&mut self) -> Option<Stmt> {
        debug!("Entering declaration");

        let result: Result<Stmt> =
            if self.check(TokenType::FUN) && self.check_next(TokenType::IDENTIFIER) {
                self.advance();
                self.function_declaration()
            } else if self.matches(TokenType::VAR) {
                self.var_declaration()
            } else {
                self.statement()
            };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                debug!("Synchronizing after: {}", e);
                self.synchronize();
                None
            }
        }
    }

    fn function_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expect function name.")?;

        self.consume(TokenType::LEFT_PAREN, "Expect '(' after function name.")?;
        let function: Rc<FunctionDecl> = self.function_body()?;

        debug!(
            "Parsed function '{}' with {} parameter(s)",
            name.lexeme,
            function.params.len()
        );

        Ok(Stmt::Function { name, function })
    }

    /// Parameters and body, starting just after the opening `(`.
    fn function_body(&mut self) -> Result<Rc<FunctionDecl>> {
        let mut params: Vec<Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    // Reported, but parsing goes on.
                    self.report_at_peek("Can't have more than 255 parameters.");
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expect parameter name.")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after parameters.")?;
        self.consume(TokenType::LEFT_BRACE, "Expect '{' before function body.")?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Rc::new(FunctionDecl { params, body }))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self.consume(TokenType::IDENTIFIER, "Expect variable name.")?;

        let initializer: Option<Expr> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expect ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `for (init; cond; incr) body` becomes
    /// `{ init; while (cond) { body; incr; } }`.
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'for'.")?;

        let initializer: Option<Stmt> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::SEMICOLON, "Expect ';' after loop condition.")?;

        let increment: Option<Expr> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after for clauses.")?;

        let mut body: Stmt = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition: Expr = condition.unwrap_or(Expr::Literal(LiteralValue::True));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        debug!("Desugared for loop");

        Ok(body)
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expect ';' after value.")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'if'.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after if condition.")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'while'.")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expect ')' after condition.")?;
        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    /// Legal anywhere at parse time; the resolver rejects top‑level returns.
    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();
        let value: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// Statements up to the closing `}`; the `{` is already consumed.
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expect '}' after block.")?;
        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token = self.previous().clone();
            let value: Expr = self.assignment()?;

            if let Expr::Variable { name, .. } = expr {
                return Ok(Expr::assign(name, value));
            }

            // Reported, not thrown: the left side is still a usable expression.
            self.report(&equals, "Invalid assignment target.");
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        self.binary(
            Self::comparison,
            &[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL],
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.binary(
            Self::term,
            &[
                TokenType::GREATER,
                TokenType::GREATER_EQUAL,
                TokenType::LESS,
                TokenType::LESS_EQUAL,
            ],
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.binary(Self::factor, &[TokenType::MINUS, TokenType::PLUS])
    }

    fn factor(&mut self) -> Result<Expr> {
        self.binary(Self::unary, &[TokenType::SLASH, TokenType::STAR])
    }

    /// One left‑associative binary level: `operand ( op operand )*`.
    fn binary(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr>,
        operators: &[TokenType],
    ) -> Result<Expr> {
        let mut expr: Expr = operand(self)?;

        while operators.iter().any(|op| self.check(op.clone())) {
            let operator: Token = self.advance().clone();
            let right: Expr = operand(self)?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        while self.matches(TokenType::LEFT_PAREN) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    self.report_at_peek("Can't have more than 255 arguments.");
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token = self.consume(TokenType::RIGHT_PAREN, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if self.check(TokenType::NUMBER(0.0)) || self.check(TokenType::STRING(String::new())) {
            if let Some(literal) = self.advance().literal() {
                return Ok(Expr::Literal(literal));
            }
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::variable(self.previous().clone()));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        if self.matches(TokenType::FUN) {
            self.consume(TokenType::LEFT_PAREN, "Expect '(' after 'fun'.")?;

            return Ok(Expr::Function(self.function_body()?));
        }

        Err(self.error_at_peek("Expect expression."))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<Token> {
        if self.check(ttype) {
            return Ok(self.advance().clone());
        }

        Err(self.error_at_peek(message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn check_next(&self, ttype: TokenType) -> bool {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.token_type == ttype)
            .unwrap_or(false)
    }

    #[inline(always)]
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Report a syntax error at `token` without unwinding.
    fn report(&mut self, token: &Token, message: &str) {
        self.errors += 1;
        debug!("Syntax error at line {}: {}", token.line, message);
        self.reporter.report_at(token, message);
    }

    fn report_at_peek(&mut self, message: &str) {
        let token: Token = self.peek().clone();
        self.report(&token, message);
    }

    /// Report at the current token and build the error that unwinds to the
    /// enclosing declaration.
    fn error_at_peek(&mut self, message: &str) -> LoxError {
        let token: Token = self.peek().clone();
        self.report(&token, message);
        LoxError::parse(&token, message)
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
