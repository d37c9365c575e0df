//! One‑pass lexer for slox source text.
//!
//! The scanner is a `FusedIterator` of `Result<Token>` that ends with exactly
//! one `EOF`.  Most callers use [`Scanner::scan_tokens`] instead, which drains
//! the iterator, sends each lexical error to an [`ErrorReporter`] and keeps
//! going; [`Scanner::error_count`] then says whether the pass was clean.
//!
//! Tokens own their lexemes, so nothing produced here borrows the source.
//! An unexpected non‑ASCII character is consumed as a whole UTF‑8 sequence
//! and reported once.
//!
//! ```rust
//! use slox::reporting::MemoryReporter;
//! use slox::scanner::Scanner;
//!
//! let mut reporter = MemoryReporter::new();
//! let mut scanner = Scanner::new("print 123; // example");
//! let tokens = scanner.scan_tokens(&mut reporter);
//!
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(scanner.error_count(), 0);
//! ```

use crate::error::{LoxError, Result};
use crate::reporting::ErrorReporter;
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;


// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts UTF‑8 source text into a
/// sequence of [`Token`]s.  The lifetime `'a` only ties the scanner to the
/// borrowed source; emitted tokens own their lexemes.
pub struct Scanner<'a> {
    text: &'a str,              // entire source text
    src: &'a [u8],              // byte view of `text`
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    errors: usize,              // lexical errors yielded so far
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            src: text.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
            errors: 0,
        }
    }

    /// Scan the whole source, reporting every lexical error through
    /// `reporter` and returning the tokens (always terminated by `EOF`).
    pub fn scan_tokens(&mut self, reporter: &mut dyn ErrorReporter) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for result in self.by_ref() {
            match result {
                Ok(token) => tokens.push(token),
                Err(LoxError::Lex { message, line }) => reporter.report(line, &message),
                Err(e) => reporter.report(0, &e.to_string()),
            }
        }

        info!(
            "Scanned {} token(s) with {} error(s)",
            tokens.len(),
            self.errors
        );

        tokens
    }

    /// Number of lexical errors produced so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input slice.
    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  *Panics* if called at EOF; higher‑level
    /// code always guards with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past EOF
    /// to avoid branching at call‑site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Pick `matched` if the next byte is `=` (consuming it), else `single`.
    #[inline(always)]
    fn either(&mut self, matched: TokenType, single: TokenType) -> TokenType {
        if self.match_byte(b'=') {
            matched
        } else {
            single
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'*' => self.pending = Some(TokenType::STAR),

            // ── two‑character operators (!=, ==, <=, >=) ─────────────────
            b'!' => self.pending = Some(self.either(TokenType::BANG_EQUAL, TokenType::BANG)),
            b'=' => self.pending = Some(self.either(TokenType::EQUAL_EQUAL, TokenType::EQUAL)),
            b'<' => self.pending = Some(self.either(TokenType::LESS_EQUAL, TokenType::LESS)),
            b'>' => {
                self.pending = Some(self.either(TokenType::GREATER_EQUAL, TokenType::GREATER))
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(()); // skip insignificants
            }

            b'\n' => {
                self.line += 1;

                return Ok(());
            }

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // Stop *on* the newline so the main loop still counts it.
                    if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => {
                self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                // Step over the whole UTF‑8 sequence so one bad character
                // yields exactly one error.
                let c: char = self.text[self.start..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.curr = self.start + c.len_utf8();

                return Err(LoxError::lex(
                    self.line,
                    format!("Unexpected character: {}", c),
                ));
            }
        }

        Ok(())
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1; // multi‑line strings are allowed
            }
        }

        if self.is_at_end() {
            return Err(LoxError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // consume closing quote

        // Both ends sit on an ASCII `"`, so the slice is on char boundaries.
        let s: &str = &self.text[self.start + 1..self.curr - 1];

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional; a
    /// trailing `.` without digits is left for the next token.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: &str = &self.text[self.start..self.curr];
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // digits only, cannot fail
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard: emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                self.errors += 1;
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let lex: &str = &self.text[self.start..self.curr];
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
