//! IG-Script scanner — splits statement text into delimiter, operator and text tokens
//!
//! Handles: parentheses, braces, the written logical operators
//! `[AND]`, `[OR]`, `[XOR]`, and free text runs in between.
//! Annotation brackets (`[dir]`) are plain text to the scanner.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Every token carries its byte range and line:column position

use serde::{Deserialize, Serialize};

use crate::config::OPERATOR_TOKENS;
use crate::error::{ParseError, Result};
use crate::parser::ast::LogicalOperator;

/// Token types for IG-Script syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    Operator(LogicalOperator),
    Text(String),
}

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Span {
    /// Locate a byte offset inside `text`
    pub fn at(text: &str, offset: usize) -> Span {
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in text.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Span { line, column, offset }
    }
}

/// Token with source position; `end` is the exclusive byte offset
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub end: usize,
}

/// Scanner over one statement (or component content) string
pub struct Tokenizer<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input text
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            chars: text.char_indices().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input into a stream of spanned tokens
    pub fn tokenize(&mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            tokens.push(self.next_token());
        }
        tokens
    }

    // ── Character helpers ──────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).map(|(_, c)| *c)
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map(|(i, _)| *i)
            .unwrap_or(self.text.len())
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.byte_offset(),
        }
    }

    fn operator_here(&self) -> Option<(LogicalOperator, usize)> {
        let rest = &self.text[self.byte_offset()..];
        OPERATOR_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
            .map(|(token, op)| (*op, token.chars().count()))
    }

    // ── Main dispatch ──────────────────────────────────────

    fn next_token(&mut self) -> SpannedToken {
        let span = self.current_span();
        let single = match self.peek() {
            Some('(') => Some(Token::LParen),
            Some(')') => Some(Token::RParen),
            Some('{') => Some(Token::LBrace),
            Some('}') => Some(Token::RBrace),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return SpannedToken { token, span, end: self.byte_offset() };
        }

        if let Some((op, len)) = self.operator_here() {
            for _ in 0..len {
                self.advance();
            }
            return SpannedToken {
                token: Token::Operator(op),
                span,
                end: self.byte_offset(),
            };
        }

        self.read_text(span)
    }

    // ── Free text ──────────────────────────────────────────

    fn read_text(&mut self, span: Span) -> SpannedToken {
        let start = span.offset;
        self.advance();
        while let Some(ch) = self.peek() {
            if matches!(ch, '(' | ')' | '{' | '}') || (ch == '[' && self.operator_here().is_some()) {
                break;
            }
            self.advance();
        }
        let end = self.byte_offset();
        SpannedToken {
            token: Token::Text(self.text[start..end].to_string()),
            span,
            end,
        }
    }
}

/// Tokenize `text` in one call
pub fn tokenize(text: &str) -> Vec<SpannedToken> {
    Tokenizer::new(text).tokenize()
}

/// Verify that parentheses and braces both balance and never close early
pub fn check_balance(text: &str) -> Result<()> {
    for (open, close) in [('(', ')'), ('{', '}')] {
        let mut depth: i64 = 0;
        let mut opened = 0;
        let mut closed = 0;
        let mut misordered = None;
        for (i, ch) in text.char_indices() {
            if ch == open {
                depth += 1;
                opened += 1;
            } else if ch == close {
                depth -= 1;
                closed += 1;
                if depth < 0 && misordered.is_none() {
                    misordered = Some(i);
                }
            }
        }
        if opened != closed {
            return Err(ParseError::ImbalancedDelimiters {
                open,
                close,
                opened,
                closed,
            });
        }
        if let Some(offset) = misordered {
            return Err(ParseError::MisorderedDelimiter {
                delimiter: close,
                span: Span::at(text, offset),
            });
        }
    }
    Ok(())
}

/// Find all written operators outside parentheses and braces
pub fn top_level_operators(text: &str) -> Vec<(LogicalOperator, Span)> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for st in tokenize(text) {
        match st.token {
            Token::LParen | Token::LBrace => depth += 1,
            Token::RParen | Token::RBrace => depth = depth.saturating_sub(1),
            Token::Operator(op) if depth == 0 => found.push((op, st.span)),
            _ => {}
        }
    }
    found
}
