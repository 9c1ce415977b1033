//! A parser for a subset of GLSL ES, built on a small grammar combinator engine.
//!
//! The supported language covers what fragment shaders for 2D effects usually need:
//! precision statements, qualified global declarations, functions, `if`/`else` chains,
//! `for` loops and expressions. There are no arrays, structs, `switch`, ternaries or
//! preprocessor directives.
//!
//! # Parsing a source file
//!
//! ```rust
//! let source = "precision mediump float; uniform float uTime; void main() { gl_FragColor = vec4(uTime); }";
//! let nodes = glsl_parse::compile(source).unwrap();
//! assert_eq!(nodes.len(), 3);
//! ```
//!
//! # Syntax tree
//!
//! see [syntax tree]
//!
//! # Rewriting
//!
//! see [`walk`]
//!
//! # Stringification
//!
//! The syntax tree elements implement [`Display`][std::fmt::Display]. [`reconstruct`]
//! prints a whole program.
//!
//! ```rust
//! let source = "void main(){gl_FragColor=vec4(1.0);}";
//! let nodes = glsl_parse::compile(source).unwrap();
//! // modify the nodes as needed...
//! println!("{}", glsl_parse::reconstruct(&nodes));
//! ```
//!
//! [syntax tree]: syntax

pub mod engine;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod span;
pub mod syntax;
pub mod walk;

mod syntax_display;
mod syntax_impl;

pub use error::Error;
pub use grammar::{compile, compile_with};
pub use lexer::{tokenize, Lexer};
pub use syntax_display::reconstruct;
pub use syntax_impl::{is_reserved, RESERVED_WORDS};
pub use walk::{walk, Walker};
