//! Prefer using [`crate::compile`]. You shouldn't need to manipulate the lexer.
//!
//! The token classes are matched longest-first. When two classes match the same length,
//! the higher priority wins. Whitespace and comments are skipped.

use derive_more::derive::Display;
use logos::{Logos, SpannedIter};

use crate::{error::LexError, span::Span};

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[logos(
    skip r"\s+",
    skip r"//[^\n]*", // line comment
    skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/" // block comment
)]
pub enum TokenKind {
    #[display("identifier")]
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,
    #[display("integer")]
    #[regex(r"[0-9]+")]
    Integer,
    #[display("float")]
    #[regex(r"[0-9]*\.[0-9]+")]
    Float,
    #[display("bracket")]
    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    Bracket,
    #[display("operator")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("!")]
    #[token("%")]
    Operator,
    // the two-character comparisons win over their one-character prefixes.
    #[display("equality")]
    #[token("==", priority = 3)]
    #[token("!=", priority = 3)]
    #[token(">=", priority = 3)]
    #[token("<=", priority = 3)]
    #[token(">", priority = 3)]
    #[token("<", priority = 3)]
    Equality,
    #[display("boolop")]
    #[token("||")]
    #[token("&&")]
    BoolOp,
    #[display("marker")]
    #[token(",")]
    #[token(";")]
    #[token(":")]
    #[token(".")]
    #[token("?")]
    #[token("|")]
    Marker,
    #[display("assign")]
    #[token("=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    Assign,
    #[display("crement")]
    #[token("++")]
    #[token("--")]
    Crement,
    #[display("string")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
}

/// A classified lexical unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}>", self.kind, self.text)
    }
}

#[derive(Clone)]
pub struct Lexer<'s> {
    source: &'s str,
    token_stream: SpannedIter<'s, TokenKind>,
    /// Where `token_stream` starts in `source`.
    offset: usize,
    failed: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            token_stream: TokenKind::lexer(source).spanned(),
            offset: 0,
            failed: false,
        }
    }

    fn restart_at(&mut self, offset: usize) {
        self.token_stream = TokenKind::lexer(&self.source[offset..]).spanned();
        self.offset = offset;
    }

    pub fn source(&self) -> &str {
        self.source
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (kind, span) = self.token_stream.next()?;
        let span = self.offset + span.start..self.offset + span.end;
        match kind {
            Ok(kind) => {
                let text = &self.source[span.clone()];
                Some(Ok(Token::new(kind, text, span.into())))
            }
            // an unterminated block comment is a `/` operator followed by `*`.
            Err(()) if self.source[span.start..].starts_with("/*") => {
                let start = span.start;
                self.restart_at(start + 1);
                Some(Ok(Token::new(
                    TokenKind::Operator,
                    "/",
                    Span::new(start..start + 1),
                )))
            }
            Err(()) => {
                // lexing stops at the first position no token class matches.
                self.failed = true;
                Some(Err(LexError::new(self.source, span.start)))
            }
        }
    }
}

/// The result of [`tokenize`]: the tokens read so far and the input that could not be
/// lexed, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexed<'s> {
    pub tokens: Vec<Token>,
    pub remainder: &'s str,
    pub offset: usize,
}

impl<'s> Lexed<'s> {
    pub fn is_complete(&self) -> bool {
        self.remainder.is_empty()
    }

    /// The tokens, or an error if part of the input could not be lexed.
    pub fn into_tokens(self) -> Result<Vec<Token>, LexError> {
        if self.is_complete() {
            Ok(self.tokens)
        } else {
            Err(LexError::from_remainder(self.remainder, self.offset))
        }
    }
}

/// Split `source` into tokens, dropping whitespace and comments.
///
/// ```rust
/// # use glsl_parse::lexer::{tokenize, TokenKind};
/// let lexed = tokenize("x >= 1.5; // done");
/// let kinds = lexed.tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
/// assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Equality, TokenKind::Float, TokenKind::Marker]);
/// assert!(lexed.is_complete());
/// ```
pub fn tokenize(source: &str) -> Lexed<'_> {
    let mut tokens = Vec::new();
    for token in Lexer::new(source) {
        match token {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let offset = err.span.start;
                return Lexed {
                    tokens,
                    remainder: &source[offset..],
                    offset,
                };
            }
        }
    }
    Lexed {
        tokens,
        remainder: "",
        offset: source.len(),
    }
}
