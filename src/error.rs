// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

use thiserror::Error;

/// Broad classification of a binding compilation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum ErrorKind {
    /// Malformed attribute segment, unknown attribute name, malformed expression.
    Syntax,
    /// Unknown type, member, event or overload.
    Resolution,
    /// Well-formed but meaningless declaration (non-settable write target, bad enum value ...).
    Semantic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => f.write_str("syntax error"),
            ErrorKind::Resolution => f.write_str("resolution error"),
            ErrorKind::Semantic => f.write_str("semantic error"),
        }
    }
}

/// The single fatal error raised while compiling a binding scope.
///
/// `position` and `length` count characters of the declaration string being parsed.
/// Nested parses report positions relative to the text they were given; callers shift
/// them with [`ParseError::offset`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<usize>,
    pub length: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            length: 0,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, position: usize, length: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Some(position),
            length,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resolution, message)
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, message)
    }

    pub fn with_span(mut self, position: usize, length: usize) -> Self {
        self.position = Some(position);
        self.length = length;
        self
    }

    /// Shift the reported position by `by`.
    /// An error without a position is anchored at `by`.
    pub fn offset(mut self, by: usize) -> Self {
        self.position = Some(self.position.unwrap_or(0) + by);
        self
    }

    /// Turn a span given in bytes of `source` into one given in characters.
    pub(crate) fn in_chars(mut self, source: &str) -> Self {
        if let Some(pos) = self.position {
            let start = char_offset(source, pos);
            let end = char_offset(source, pos + self.length);
            self.position = Some(start);
            self.length = end - start;
        }
        self
    }

    /// Render the error with a caret under the offending text.
    pub fn message_for(&self, source: &str) -> String {
        match self.position {
            Some(pos) => {
                let width = self.length.max(1);
                format!(
                    "{}: {}\n  | {}\n  | {:pos$}{}",
                    self.kind,
                    self.message,
                    source,
                    "",
                    "^".repeat(width),
                    pos = pos
                )
            }
            None => format!("{}: {}", self.kind, self.message),
        }
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    source.char_indices().take_while(|(i, _)| *i < byte).count()
}

pub type ParseResult<T> = core::result::Result<T, ParseError>;
