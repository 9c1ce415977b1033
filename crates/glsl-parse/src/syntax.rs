//! A syntax tree for the supported GLSL ES subset. A program is a `Vec<Node>`.
//!
//! ## Strictness
//!
//! The tree is purely syntactic. It doesn't check types, declaration-before-use or the
//! placement of statements beyond what the grammar enforces (qualifiers at root level,
//! crement targets).
//!
//! ## Design considerations
//!
//! Nodes own their strings and children. Rewriting passes take the tree by value and
//! return a new one, see [`crate::walk`].
//!
//! Binary operator chains are flat: `a + b * c` is one [`Binary`] with two operators and
//! three operands, in textual order. Grouping is only expressed with [`Parenthesized`].

use derive_more::derive::{From, IsVariant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, From, IsVariant)]
pub enum Node {
    Precision(Precision),
    VariableDecl(VariableDecl),
    VariableAssign(VariableAssign),
    PropertyAssign(PropertyAssign),
    ExpressionStatement(ExpressionStatement),
    EmptyStatement(EmptyStatement),
    FunctionDecl(FunctionDecl),
    If(If),
    For(For),
    Return(Return),
    Break(Break),
    Float(FloatLiteral),
    Int(IntLiteral),
    Variable(Variable),
    Parenthesized(Parenthesized),
    Unary(Unary),
    Call(Call),
    Binary(Binary),
    Property(Property),
    Crement(Crement),
    Chunk(Chunk),
}

/// The kind of a [`Node`], without its fields.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Precision,
    VariableDecl,
    VariableAssign,
    PropertyAssign,
    ExpressionStatement,
    EmptyStatement,
    FunctionDecl,
    If,
    For,
    Return,
    Break,
    Float,
    Int,
    Variable,
    Parenthesized,
    Unary,
    Call,
    Binary,
    Property,
    Crement,
    Chunk,
}

/// `precision mediump float;`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Precision {
    pub precision: String,
    pub ty: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub qualifier: Option<Qualifier>,
    pub ty: String,
    pub name: String,
    pub value: Option<Box<Node>>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Uniform,
    Varying,
    Const,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VariableAssign {
    pub name: String,
    pub op: AssignOp,
    pub value: Box<Node>,
}

/// Assignment to a property access chain, e.g. `gl_FragColor.a = 1.0;`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyAssign {
    pub target: Box<Node>,
    pub op: AssignOp,
    pub value: Box<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionStatement {
    pub value: Box<Node>,
}

/// A lone `;`, or nothing at all in a `for` clause.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EmptyStatement;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub return_ty: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub condition: Box<Node>,
    pub body: Vec<Node>,
    pub else_ifs: Vec<ElseIf>,
    pub else_body: Option<Vec<Node>>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ElseIf {
    pub condition: Node,
    pub body: Vec<Node>,
}

/// The three clauses are statements read without their trailing `;`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct For {
    pub init: Box<Node>,
    pub check: Box<Node>,
    pub increment: Box<Node>,
    pub body: Vec<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Box<Node>>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Break;

/// Literals keep their source text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, From)]
pub struct FloatLiteral {
    pub value: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, From)]
pub struct IntLiteral {
    pub value: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, From)]
pub struct Variable {
    pub name: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Parenthesized {
    pub value: Box<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub value: Box<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: Box<Node>,
    pub args: Vec<Node>,
}

/// `operands.len() == ops.len() + 1`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Binary {
    pub ops: Vec<BinaryOp>,
    pub operands: Vec<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Or,
    And,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub value: Box<Node>,
    pub property: String,
}

/// Increment or decrement of a variable or property, prefix or postfix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Crement {
    pub op: CrementOp,
    pub postfix: bool,
    pub value: Box<Node>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrementOp {
    Increment,
    Decrement,
}

/// Pre-rendered source text, printed as-is.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, From)]
pub struct Chunk {
    pub text: String,
}
