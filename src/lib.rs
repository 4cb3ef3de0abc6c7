//! # classmover-base
//!
//! Core library for locating references to PHP class members (methods,
//! properties and class constants), the search step of rename and move
//! refactorings.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! finder   → Candidate collection, reference classification, results
//!   ↓
//! reflect  → Reflector trait, class index, expression type inference
//!   ↓
//! parser   → Logos lexer, recursive-descent parser, typed AST, name resolution
//!   ↓
//! base     → Primitives (ClassName, MemberName, MemberKind, TextRange)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use classmover::{ClassMemberQuery, ClassName, MemberFinder, MemberName, SourceReflector};
//!
//! let mut reflector = SourceReflector::new();
//! reflector.add_source(source);
//!
//! let query = ClassMemberQuery::new()
//!     .with_class(ClassName::new("A")?)
//!     .with_member(MemberName::new("foo")?)
//!     .only_methods();
//! let references = MemberFinder::new(&reflector).find_members(source, &query)?;
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → reflect → finder)
// ============================================================================

/// Foundation types: class and member names, TextRange, line index
pub mod base;

/// Parser: Logos lexer, rowan syntax tree, typed AST, namespace resolution
pub mod parser;

/// Reflection: type inference and class hierarchy queries
pub mod reflect;

/// Member reference search
pub mod finder;

// Re-export foundation types
pub use base::{ClassName, LineCol, LineIndex, MemberKind, MemberName, NameError, TextRange, TextSize};

// Re-export the search API
pub use finder::{
    ClassMemberQuery, CollectingSink, Diagnostic, DiagnosticSink, FinderError, FinderOptions,
    MemberFinder, MemberReference, MemberReferences, Severity, TracingSink,
};
pub use reflect::{ReflectError, ReflectionClass, Reflector, SourceReflector, Type};
