use std::str::FromStr;

use super::{error::FromStrError, syntax::*};

/// Words that can't name a type, a declaration or a variable.
pub const RESERVED_WORDS: [&str; 9] = [
    "precision",
    "uniform",
    "varying",
    "const",
    "if",
    "else",
    "for",
    "return",
    "break",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Precision(_) => NodeKind::Precision,
            Node::VariableDecl(_) => NodeKind::VariableDecl,
            Node::VariableAssign(_) => NodeKind::VariableAssign,
            Node::PropertyAssign(_) => NodeKind::PropertyAssign,
            Node::ExpressionStatement(_) => NodeKind::ExpressionStatement,
            Node::EmptyStatement(_) => NodeKind::EmptyStatement,
            Node::FunctionDecl(_) => NodeKind::FunctionDecl,
            Node::If(_) => NodeKind::If,
            Node::For(_) => NodeKind::For,
            Node::Return(_) => NodeKind::Return,
            Node::Break(_) => NodeKind::Break,
            Node::Float(_) => NodeKind::Float,
            Node::Int(_) => NodeKind::Int,
            Node::Variable(_) => NodeKind::Variable,
            Node::Parenthesized(_) => NodeKind::Parenthesized,
            Node::Unary(_) => NodeKind::Unary,
            Node::Call(_) => NodeKind::Call,
            Node::Binary(_) => NodeKind::Binary,
            Node::Property(_) => NodeKind::Property,
            Node::Crement(_) => NodeKind::Crement,
            Node::Chunk(_) => NodeKind::Chunk,
        }
    }

    /// Variables and property access chains can be incremented and decremented.
    pub fn is_crement_target(&self) -> bool {
        matches!(self, Node::Variable(_) | Node::Property(_))
    }
}

impl VariableDecl {
    pub fn has_qualifier(&self, qualifier: Qualifier) -> bool {
        self.qualifier == Some(qualifier)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl FromStr for Qualifier {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "varying" => Ok(Self::Varying),
            "const" => Ok(Self::Const),
            _ => Err(FromStrError::new("qualifier", s)),
        }
    }
}

impl FromStr for AssignOp {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Assign),
            "+=" => Ok(Self::AddAssign),
            "-=" => Ok(Self::SubAssign),
            "*=" => Ok(Self::MulAssign),
            "/=" => Ok(Self::DivAssign),
            "%=" => Ok(Self::ModAssign),
            _ => Err(FromStrError::new("assignment operator", s)),
        }
    }
}

impl FromStr for UnaryOp {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "!" => Ok(Self::Not),
            "-" => Ok(Self::Minus),
            "+" => Ok(Self::Plus),
            _ => Err(FromStrError::new("unary operator", s)),
        }
    }
}

impl FromStr for BinaryOp {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            "%" => Ok(Self::Mod),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "<" => Ok(Self::Less),
            ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessEqual),
            ">=" => Ok(Self::GreaterEqual),
            "||" => Ok(Self::Or),
            "&&" => Ok(Self::And),
            _ => Err(FromStrError::new("binary operator", s)),
        }
    }
}

impl FromStr for CrementOp {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "++" => Ok(Self::Increment),
            "--" => Ok(Self::Decrement),
            _ => Err(FromStrError::new("increment operator", s)),
        }
    }
}
