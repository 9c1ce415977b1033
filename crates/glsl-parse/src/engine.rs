//! A small combinator runtime. A [`Grammar`] is an ordered table of [`Rule`]s. Each rule
//! is gated by [`Flags`] and built by a function that drives a [`Cursor`] over the tokens.
//!
//! Rules are tried in registration order and the first one that completes wins. A rule
//! that fails is discarded and the cursor position is restored to where it started,
//! because every attempt works on its own cursor.
//!
//! ```rust
//! # use glsl_parse::engine::{Attempt, Cursor, Flags, Grammar};
//! # use glsl_parse::lexer::{tokenize, TokenKind};
//! # use glsl_parse::syntax::{IntLiteral, Node};
//! fn int(c: &mut Cursor) -> Attempt<Node> {
//!     let token = c.read(TokenKind::Integer)?;
//!     c.read(";")?;
//!     Ok(IntLiteral::from(token.text.clone()).into())
//! }
//!
//! let mut grammar = Grammar::new();
//! grammar.define("int", Flags::ROOT, int);
//! let tokens = tokenize("1; 2;").into_tokens().unwrap();
//! assert_eq!(grammar.compile(&tokens).unwrap().len(), 2);
//! ```

use std::{
    fmt::{Display, Formatter},
    ops::BitOr,
};

use itertools::Itertools;

use crate::{
    error::{DepthError, Error, FromStrError, SyntaxError},
    lexer::{Token, TokenKind},
    syntax::Node,
};

/// The set of contexts a rule can be read in.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// A top-level statement.
    pub const ROOT: Flags = Flags(1 << 0);
    /// A statement in a block.
    pub const STATEMENT: Flags = Flags(1 << 1);
    /// A `for` clause: no trailing `;`.
    pub const SIMPLE: Flags = Flags(1 << 2);
    /// An expression, including binary operator chains.
    pub const VALUE: Flags = Flags(1 << 3);
    /// An expression without binary continuation, the operand of a prefix operator.
    pub const OPERAND: Flags = Flags(1 << 4);
    /// A single value, before postfix productions.
    pub const SINGLE: Flags = Flags(1 << 5);
    /// A production applied to a previously read value.
    pub const POSTFIX: Flags = Flags(1 << 6);

    const NAMES: [(Flags, &'static str); 7] = [
        (Self::ROOT, "root"),
        (Self::STATEMENT, "statement"),
        (Self::SIMPLE, "simple"),
        (Self::VALUE, "value"),
        (Self::OPERAND, "operand"),
        (Self::SINGLE, "single"),
        (Self::POSTFIX, "postfix"),
    ];

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
            .format(" | ");
        write!(f, "{names}")
    }
}

/// Why a rule attempt did not produce a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Reject {
    /// The tokens don't fit the rule. The next rule is tried.
    Mismatch,
    /// A nested sequence failed. The whole compilation is aborted.
    Fatal(Box<Error>),
}

impl From<Error> for Reject {
    fn from(err: Error) -> Self {
        Reject::Fatal(Box::new(err))
    }
}

impl From<FromStrError> for Reject {
    fn from(_: FromStrError) -> Self {
        Reject::Mismatch
    }
}

pub type Attempt<T> = Result<T, Reject>;

pub type Builder = fn(&mut Cursor<'_>) -> Attempt<Node>;

/// How many nested [`Cursor::value`], [`Cursor::postfix`] and [`Cursor::all`] calls a
/// compilation may stack before it fails with a [`DepthError`].
pub const MAX_DEPTH: usize = 128;

#[derive(Clone, Debug)]
pub struct Rule {
    pub name: &'static str,
    pub flags: Flags,
    pub build: Builder,
}

/// A node read by [`Grammar::parse_one`] and the position after it.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub pos: usize,
    pub node: Node,
}

/// An ordered rule table. It is not modified while parsing, so a single grammar can
/// serve any number of compilations.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. It will be tried after all the rules defined before.
    pub fn define(&mut self, name: &'static str, flags: Flags, build: Builder) -> &mut Self {
        self.rules.push(Rule { name, flags, build });
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Try each rule eligible under `flags` at `pos` and return the first match.
    ///
    /// `subject` is the value postfix rules apply to.
    pub fn parse_one(
        &self,
        tokens: &[Token],
        pos: usize,
        flags: Flags,
        subject: Option<&Node>,
    ) -> Result<Option<Step>, Error> {
        self.parse_one_at(tokens, pos, flags, subject, 0)
    }

    fn parse_one_at(
        &self,
        tokens: &[Token],
        pos: usize,
        flags: Flags,
        subject: Option<&Node>,
        depth: usize,
    ) -> Result<Option<Step>, Error> {
        for rule in self.rules.iter().filter(|rule| rule.flags.intersects(flags)) {
            let mut cursor = Cursor {
                grammar: self,
                tokens,
                pos,
                flags,
                subject,
                depth,
            };
            match (rule.build)(&mut cursor) {
                Ok(node) => {
                    log::trace!("rule `{}` matched tokens {pos}..{}", rule.name, cursor.pos);
                    return Ok(Some(Step {
                        pos: cursor.pos,
                        node,
                    }));
                }
                Err(Reject::Mismatch) => continue,
                Err(Reject::Fatal(err)) => return Err(*err),
            }
        }
        Ok(None)
    }

    /// Read nodes until no rule matches. The tokens must then be exhausted or the next one
    /// must be `terminator`, which is not consumed.
    pub fn parse_all(
        &self,
        tokens: &[Token],
        mut pos: usize,
        flags: Flags,
        terminator: Option<&str>,
    ) -> Result<(usize, Vec<Node>), Error> {
        self.parse_all_at(tokens, pos, flags, terminator, 0)
    }

    fn parse_all_at(
        &self,
        tokens: &[Token],
        mut pos: usize,
        flags: Flags,
        terminator: Option<&str>,
        depth: usize,
    ) -> Result<(usize, Vec<Node>), Error> {
        let mut nodes = Vec::new();
        while let Some(step) = self.parse_one_at(tokens, pos, flags, None, depth)? {
            // zero-width matches would repeat forever
            if step.pos == pos {
                break;
            }
            pos = step.pos;
            nodes.push(step.node);
        }

        let at_end = pos >= tokens.len();
        let at_terminator =
            terminator.is_some_and(|end| tokens.get(pos).is_some_and(|t| t.text == end));
        if at_end || at_terminator {
            Ok((pos, nodes))
        } else {
            Err(SyntaxError::new(flags, terminator, tokens, pos).into())
        }
    }

    /// Read a whole program of root statements.
    pub fn compile(&self, tokens: &[Token]) -> Result<Vec<Node>, Error> {
        let (_, nodes) = self.parse_all(tokens, 0, Flags::ROOT, None)?;
        Ok(nodes)
    }
}

/// Something a token can be tested against.
pub trait Pattern {
    fn matches(&self, token: &Token) -> bool;
}

impl Pattern for TokenKind {
    fn matches(&self, token: &Token) -> bool {
        token.kind == *self
    }
}

/// Matches the token text exactly.
impl Pattern for str {
    fn matches(&self, token: &Token) -> bool {
        token.text == self
    }
}

/// Matches any of the texts.
impl<const N: usize> Pattern for [&str; N] {
    fn matches(&self, token: &Token) -> bool {
        self.contains(&token.text.as_str())
    }
}

impl<P: Pattern + ?Sized> Pattern for &P {
    fn matches(&self, token: &Token) -> bool {
        (**self).matches(token)
    }
}

/// Matches when the predicate returns `true`.
#[derive(Clone, Copy, Debug)]
pub struct Is<F>(pub F);

impl<F: Fn(&Token) -> bool> Pattern for Is<F> {
    fn matches(&self, token: &Token) -> bool {
        (self.0)(token)
    }
}

/// The state of one rule attempt.
pub struct Cursor<'a> {
    grammar: &'a Grammar,
    tokens: &'a [Token],
    pos: usize,
    flags: Flags,
    subject: Option<&'a Node>,
    depth: usize,
}

impl<'a> Cursor<'a> {
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The value a postfix rule applies to. Other rules have none.
    pub fn subject(&self) -> Attempt<&'a Node> {
        self.subject.ok_or(Reject::Mismatch)
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn matches(&self, pat: impl Pattern) -> bool {
        self.peek().is_some_and(|token| pat.matches(token))
    }

    /// Consume the next token if it matches, fail the attempt otherwise.
    pub fn read(&mut self, pat: impl Pattern) -> Attempt<&'a Token> {
        self.maybe_read(pat).ok_or(Reject::Mismatch)
    }

    /// Consume the next token if it matches.
    pub fn maybe_read(&mut self, pat: impl Pattern) -> Option<&'a Token> {
        let token = self.peek().filter(|token| pat.matches(token))?;
        self.pos += 1;
        Some(token)
    }

    /// [`Self::read`] when `cond` holds, nothing otherwise.
    pub fn read_if(&mut self, cond: bool, pat: impl Pattern) -> Attempt<Option<&'a Token>> {
        if cond {
            self.read(pat).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The depth of a nested read, or a fatal error past [`MAX_DEPTH`].
    fn nested(&self) -> Attempt<usize> {
        if self.depth >= MAX_DEPTH {
            let err = DepthError::new(MAX_DEPTH, self.tokens, self.pos);
            return Err(Error::from(err).into());
        }
        Ok(self.depth + 1)
    }

    /// Read one node under different flags.
    pub fn value(&mut self, flags: Flags) -> Attempt<Node> {
        let depth = self.nested()?;
        let step = self
            .grammar
            .parse_one_at(self.tokens, self.pos, flags, None, depth)?
            .ok_or(Reject::Mismatch)?;
        self.pos = step.pos;
        Ok(step.node)
    }

    /// Apply one postfix rule to `subject`, if any matches.
    pub fn postfix(&mut self, subject: &Node) -> Attempt<Option<Node>> {
        let depth = self.nested()?;
        let step =
            self.grammar
                .parse_one_at(self.tokens, self.pos, Flags::POSTFIX, Some(subject), depth)?;
        Ok(step.map(|step| {
            self.pos = step.pos;
            step.node
        }))
    }

    /// Read a sequence of nodes up to `terminator`, which is left unread.
    pub fn all(&mut self, flags: Flags, terminator: &str) -> Attempt<Vec<Node>> {
        let depth = self.nested()?;
        let (pos, nodes) =
            self.grammar
                .parse_all_at(self.tokens, self.pos, flags, Some(terminator), depth)?;
        self.pos = pos;
        Ok(nodes)
    }

    /// Run `body` until the next token matches `pat`. The body receives the iteration
    /// count.
    pub fn repeat_until(
        &mut self,
        pat: impl Pattern,
        mut body: impl FnMut(&mut Self, usize) -> Attempt<()>,
    ) -> Attempt<()> {
        let mut count = 0;
        while !self.at_end() && !self.matches(&pat) {
            let start = self.pos;
            body(&mut *self, count)?;
            if self.pos == start {
                break;
            }
            count += 1;
        }
        Ok(())
    }

    /// Run `body` while the next token matches `pat`.
    pub fn repeat_while(
        &mut self,
        pat: impl Pattern,
        mut body: impl FnMut(&mut Self, usize) -> Attempt<()>,
    ) -> Attempt<()> {
        let mut count = 0;
        while self.matches(&pat) {
            let start = self.pos;
            body(&mut *self, count)?;
            if self.pos == start {
                break;
            }
            count += 1;
        }
        Ok(())
    }

    /// Fail the attempt unless `cond` holds.
    pub fn validate(&self, cond: bool) -> Attempt<()> {
        if cond {
            Ok(())
        } else {
            Err(Reject::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, syntax::*};

    fn int(c: &mut Cursor) -> Attempt<Node> {
        let token = c.read(TokenKind::Integer)?;
        Ok(IntLiteral::from(token.text.clone()).into())
    }

    fn int_statement(c: &mut Cursor) -> Attempt<Node> {
        let node = c.value(Flags::SINGLE)?;
        c.read(";")?;
        Ok(node)
    }

    fn block(c: &mut Cursor) -> Attempt<Node> {
        c.read("{")?;
        let body = c.all(Flags::ROOT, "}")?;
        c.read("}")?;
        Ok(FunctionDecl {
            return_ty: "void".to_string(),
            name: "block".to_string(),
            params: Vec::new(),
            body,
        }
        .into())
    }

    fn nothing(_: &mut Cursor) -> Attempt<Node> {
        Ok(EmptyStatement.into())
    }

    fn grammar() -> Grammar {
        let mut grammar = Grammar::new();
        grammar
            .define("int", Flags::SINGLE, int)
            .define("int_statement", Flags::ROOT, int_statement)
            .define("block", Flags::ROOT, block);
        grammar
    }

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).into_tokens().unwrap()
    }

    fn syntax_error(grammar: &Grammar, source: &str) -> SyntaxError {
        match grammar.compile(&tokens(source)) {
            Err(Error::Syntax(err)) => err,
            res => panic!("expected a syntax error, got {res:?}"),
        }
    }

    #[test]
    fn flags() {
        let flags = Flags::ROOT | Flags::STATEMENT;
        assert!(flags.contains(Flags::ROOT));
        assert!(!flags.contains(Flags::ROOT | Flags::SIMPLE));
        assert!(flags.intersects(Flags::ROOT | Flags::SIMPLE));
        assert!(!flags.intersects(Flags::VALUE));
        assert_eq!(flags.to_string(), "root | statement");
        assert_eq!(Flags::NONE.to_string(), "none");
    }

    #[test]
    fn first_rule_wins() {
        fn second(c: &mut Cursor) -> Attempt<Node> {
            c.read(TokenKind::Integer)?;
            Ok(Break.into())
        }
        let mut grammar = Grammar::new();
        grammar
            .define("first", Flags::ROOT, int)
            .define("second", Flags::ROOT, second);
        let nodes = grammar.compile(&tokens("1")).unwrap();
        assert!(nodes[0].is_int());
    }

    #[test]
    fn rules_are_gated_by_flags() {
        let grammar = grammar();
        let toks = tokens("1");
        assert!(grammar
            .parse_one(&toks, 0, Flags::ROOT, None)
            .unwrap()
            .is_none());
        let step = grammar
            .parse_one(&toks, 0, Flags::SINGLE, None)
            .unwrap()
            .unwrap();
        assert_eq!(step.pos, 1);
    }

    #[test]
    fn failed_attempts_backtrack() {
        // `int_statement` reads `1` then fails on the missing `;`, `block` starts over.
        let grammar = grammar();
        let err = syntax_error(&grammar, "1 }");
        assert_eq!(err.remainder, "1 }");
        assert!(err.last.is_none());
    }

    #[test]
    fn nested_sequences_stop_at_terminator() {
        let grammar = grammar();
        let nodes = grammar.compile(&tokens("{ 1; { 2; } } 3;")).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_function_decl());
    }

    #[test]
    fn syntax_error_fields() {
        let grammar = grammar();
        let err = syntax_error(&grammar, "1; { 2; 3 4 }");
        assert_eq!(err.flags, Flags::ROOT);
        assert_eq!(err.expected.as_deref(), Some("}"));
        assert_eq!(err.last.map(|t| t.text), Some(";".to_string()));
        assert_eq!(err.remainder, "3 4 }");
    }

    #[test]
    fn zero_width_rules_terminate() {
        let mut grammar = grammar();
        grammar.define("nothing", Flags::ROOT, nothing);
        assert_eq!(grammar.compile(&tokens("1; 2;")).unwrap().len(), 2);
        assert!(grammar.compile(&tokens("1; x")).is_err());
    }

    #[test]
    fn nesting_is_limited() {
        let grammar = grammar();
        let shallow = format!("{}{}", "{ ".repeat(MAX_DEPTH - 1), "} ".repeat(MAX_DEPTH - 1));
        assert_eq!(grammar.compile(&tokens(&shallow)).unwrap().len(), 1);

        let deep = format!("{}1;{}", "{ ".repeat(1000), " }".repeat(1000));
        let toks = tokens(&deep);
        let Err(Error::Depth(err)) = grammar.compile(&toks) else {
            panic!("expected a depth error");
        };
        assert_eq!(err.limit, MAX_DEPTH);
        assert_eq!(err.span, toks[MAX_DEPTH].span);
    }
}
