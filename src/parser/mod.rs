//! Rowan-based error-tolerant parser for PHP
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! Broken or partial source still yields a full tree: unparseable regions
//! become `ERROR` nodes and parsing continues at the next statement or member.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! Name resolution → fully-qualified class names
//! ```

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod expressions;
mod lexer;
pub mod names;
mod syntax_kind;

pub use ast::*;
pub use lexer::{Lexer, Token, tokenize};
pub use names::NameResolver;
pub use parser::{Parse, SyntaxError, parse_php};
pub use syntax_kind::{
    PhpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
