//! [`Error`] is the error type returned by [`crate::compile`].

use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::{engine::Flags, lexer::Token, span::Span};

#[derive(Error, Clone, Debug, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("{0}")]
    Depth(#[from] DepthError),
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::Lex(err) => err.span.clone(),
            Error::Syntax(err) => err.span.clone(),
            Error::Depth(err) => err.span.clone(),
        }
    }
}

/// No token class matches the input at `span`.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("unexpected character `{found}`")]
pub struct LexError {
    pub found: char,
    pub span: Span,
    /// The input from the offending character to the end.
    pub remainder: String,
}

impl LexError {
    pub(crate) fn new(source: &str, offset: usize) -> Self {
        Self::from_remainder(&source[offset..], offset)
    }

    pub(crate) fn from_remainder(remainder: &str, offset: usize) -> Self {
        let found = remainder.chars().next().unwrap_or_default();
        Self {
            found,
            span: Span::new(offset..offset + found.len_utf8()),
            remainder: remainder.to_string(),
        }
    }
}

/// Tokens remain that no rule accepts and that are not the expected terminator.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxError {
    /// The flags active when the rules stopped matching.
    pub flags: Flags,
    /// Text of the token that was allowed to end the sequence, if any.
    pub expected: Option<String>,
    /// The last token consumed before the failure.
    pub last: Option<Token>,
    /// The unconsumed tokens, joined by spaces.
    pub remainder: String,
    /// Source range of the unconsumed tokens.
    pub span: Span,
}

impl SyntaxError {
    pub(crate) fn new(
        flags: Flags,
        expected: Option<&str>,
        tokens: &[Token],
        pos: usize,
    ) -> Self {
        let rest = &tokens[pos..];
        let span = match (rest.first(), rest.last()) {
            (Some(first), Some(last)) => first.span.extend(&last.span),
            _ => Span::at(tokens.last().map(|t| t.span.end).unwrap_or_default()),
        };
        Self {
            flags,
            expected: expected.map(str::to_string),
            last: pos.checked_sub(1).map(|i| tokens[i].clone()),
            remainder: rest.iter().map(|t| &t.text).join(" "),
            span,
        }
    }
}

impl std::error::Error for SyntaxError {}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expected = self
            .expected
            .as_ref()
            .map(|e| format!("`{e}`"))
            .unwrap_or_else(|| "end of input".to_string());
        let last = self
            .last
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "failed to process tokens: `{}` (flags: {}, expected: {expected}, last token: {last})",
            self.remainder, self.flags
        )
    }
}

/// Rules nested deeper than the parser allows.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("nesting deeper than {limit} levels")]
pub struct DepthError {
    pub limit: usize,
    /// The token where the limit was reached.
    pub span: Span,
}

impl DepthError {
    pub(crate) fn new(limit: usize, tokens: &[Token], pos: usize) -> Self {
        let span = match tokens.get(pos) {
            Some(token) => token.span.clone(),
            None => Span::at(tokens.last().map(|t| t.span.end).unwrap_or_default()),
        };
        Self { limit, span }
    }
}

/// Returned by the `FromStr` impls of the syntax tree enums.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("`{text}` is not a valid {expected}")]
pub struct FromStrError {
    pub expected: &'static str,
    pub text: String,
}

impl FromStrError {
    pub(crate) fn new(expected: &'static str, text: &str) -> Self {
        Self {
            expected,
            text: text.to_string(),
        }
    }
}
