// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::*;

use core::fmt::{self, Debug, Formatter};
use core::iter::Peekable;
use core::str::CharIndices;

/// Byte range of a token within the text being lexed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn error(&self, kind: ErrorKind, msg: impl Into<String>) -> ParseError {
        ParseError::at(kind, msg, self.start, self.len())
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Symbol,
    /// Quoted string. The span excludes the quotes.
    String,
    Number,
    Ident,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Token(pub TokenKind, pub Span);

const TWO_CHAR_SYMBOLS: [&str; 8] = ["??", "?.", "==", "!=", "<=", ">=", "&&", "||"];

#[derive(Clone)]
pub struct Lexer<'source> {
    source: &'source str,
    iter: Peekable<CharIndices<'source>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            iter: source.char_indices().peekable(),
        }
    }

    pub fn source(&self) -> &'source str {
        self.source
    }

    fn peek(&mut self) -> (usize, char) {
        match self.iter.peek() {
            Some((index, chr)) => (*index, *chr),
            _ => (self.source.len(), '\x00'),
        }
    }

    fn peekahead(&mut self, n: usize) -> (usize, char) {
        match self.iter.clone().nth(n) {
            Some((index, chr)) => (index, chr),
            _ => (self.source.len(), '\x00'),
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.peek().0;
        loop {
            let ch = self.peek().1;
            if ch.is_alphanumeric() || ch == '_' {
                self.iter.next();
            } else {
                break;
            }
        }
        let end = self.peek().0;
        Token(TokenKind::Ident, Span { start, end })
    }

    fn read_digits(&mut self) {
        while self.peek().1.is_ascii_digit() {
            self.iter.next();
        }
    }

    fn read_number(&mut self) -> ParseResult<Token> {
        let start = self.peek().0;
        self.read_digits();

        // `.` must be followed by at least one digit to be a fraction.
        if self.peek().1 == '.' && self.peekahead(1).1.is_ascii_digit() {
            self.iter.next();
            self.read_digits();
        }

        // Type suffix.
        if matches!(self.peek().1, 'f' | 'F' | 'd' | 'D' | 'm' | 'M' | 'l' | 'L') {
            self.iter.next();
        }

        let end = self.peek().0;
        let ch = self.peek().1;
        if ch == '_' || ch.is_alphanumeric() {
            return Err(ParseError::at(
                ErrorKind::Syntax,
                "invalid number",
                start,
                end - start + 1,
            ));
        }
        Ok(Token(TokenKind::Number, Span { start, end }))
    }

    fn read_string(&mut self) -> ParseResult<Token> {
        let (open_pos, quote) = self.peek();
        self.iter.next();
        let start = self.peek().0;
        loop {
            let (pos, ch) = self.peek();
            match ch {
                '\x00' if pos == self.source.len() => {
                    return Err(ParseError::at(
                        ErrorKind::Syntax,
                        "unmatched quote in string literal",
                        open_pos,
                        1,
                    ))
                }
                '\\' => {
                    self.iter.next();
                    self.iter.next();
                }
                c if c == quote => {
                    self.iter.next();
                    return Ok(Token(TokenKind::String, Span { start, end: pos }));
                }
                _ => {
                    self.iter.next();
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().1.is_whitespace() {
            self.iter.next();
        }
    }

    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_ws();

        let (start, chr) = self.peek();
        match chr {
            '\x00' if start == self.source.len() => Ok(Token(
                TokenKind::Eof,
                Span {
                    start,
                    end: start,
                },
            )),
            '\'' | '"' => self.read_string(),
            _ if chr.is_ascii_digit() => self.read_number(),
            _ if chr.is_alphabetic() || chr == '_' => Ok(self.read_ident()),
            _ => {
                let next = self.peekahead(1).1;
                let pair: String = [chr, next].iter().collect();
                if TWO_CHAR_SYMBOLS.contains(&pair.as_str()) {
                    self.iter.next();
                    self.iter.next();
                    return Ok(Token(
                        TokenKind::Symbol,
                        Span {
                            start,
                            end: start + 2,
                        },
                    ));
                }
                match chr {
                    '.' | '/' | '\\' | '[' | ']' | '(' | ')' | ',' | '?' | ':' | '+' | '-'
                    | '*' | '%' | '!' | '<' | '>' | '=' | '{' | '}' => {
                        self.iter.next();
                        Ok(Token(
                            TokenKind::Symbol,
                            Span {
                                start,
                                end: start + chr.len_utf8(),
                            },
                        ))
                    }
                    _ => Err(ParseError::at(
                        ErrorKind::Syntax,
                        format!("invalid character `{chr}`"),
                        start,
                        chr.len_utf8(),
                    )),
                }
            }
        }
    }
}

/// Decode the backslash escapes of a string literal body.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}
