//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for PHP syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

// ============================================================================
// Helper utilities for reducing code duplication
// ============================================================================

/// Check if a syntax node has a direct child token of the specified kind.
#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// Find the first direct child token of the specified kind.
#[inline]
fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Macro to generate boolean property methods that check for a specific token kind.
///
/// Usage:
/// ```ignore
/// impl MyStruct {
///     has_token_method!(is_static, STATIC_KW, "public static function make()");
/// }
/// ```
macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
    ($name:ident, $kind:ident, $example:literal) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token (e.g., `", $example, "`).")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Macro to generate a method that finds the first child of a specific AST type.
///
/// Usage:
/// ```ignore
/// impl MyStruct {
///     first_child_method!(body, ClassBody);
/// }
/// ```
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
///
/// Usage:
/// ```ignore
/// impl MyStruct {
///     children_method!(params, Param);
/// }
/// ```
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Macro to generate a method returning the first direct token of a kind.
macro_rules! token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Get the `", stringify!($kind), "` token of this node.")]
        pub fn $name(&self) -> Option<SyntaxToken> {
            find_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Find all descendant nodes of a specific AST type
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }

    /// The `/** ... */` docblock attached to this node, if any.
    fn doc_comment(&self) -> Option<String> {
        extract_doc_comment(self.syntax())
    }
}

/// Extract the docblock preceding a node.
///
/// Only `/** */` comments count. Whitespace, ordinary comments and
/// attribute groups may sit between the docblock and the node.
pub fn extract_doc_comment(node: &SyntaxNode) -> Option<String> {
    let mut current = node.prev_sibling_or_token();

    while let Some(node_or_token) = current {
        match node_or_token {
            rowan::NodeOrToken::Token(ref t) => match t.kind() {
                SyntaxKind::DOC_COMMENT => {
                    let text = t.text();
                    let content = text
                        .strip_prefix("/**")
                        .and_then(|s| s.strip_suffix("*/"))
                        .map(clean_doc_comment)
                        .unwrap_or_default();
                    return (!content.is_empty()).then_some(content);
                }
                SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT => {
                    current = t.prev_sibling_or_token();
                }
                _ => return None,
            },
            rowan::NodeOrToken::Node(ref n) if n.kind() == SyntaxKind::ATTRIBUTE_GROUP => {
                current = n.prev_sibling_or_token();
            }
            rowan::NodeOrToken::Node(_) => return None,
        }
    }
    None
}

/// Clean up doc comment content by removing leading asterisks and normalizing whitespace.
fn clean_doc_comment(s: &str) -> String {
    s.lines()
        .map(|line| {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('*') {
                rest.trim_start().to_string()
            } else {
                trimmed.to_string()
            }
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read the type named by a docblock tag, e.g. `@var Foo|null $x` → `Foo|null`.
///
/// When `variable` is given, a tag naming a different variable is skipped.
pub fn doc_tag_type(doc: &str, tag: &str, variable: Option<&str>) -> Option<String> {
    for line in doc.lines() {
        let Some(rest) = line.trim().strip_prefix(tag) else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let mut parts = rest.split_whitespace();
        let Some(ty) = parts.next() else {
            continue;
        };
        if let (Some(wanted), Some(named)) = (variable, parts.next())
            && named.starts_with('$')
            && named.trim_start_matches('$') != wanted.trim_start_matches('$')
        {
            continue;
        }
        return Some(ty.to_string());
    }
    None
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// Submodules declared after the macros so macro_rules! are in scope
mod expressions;
mod items;

// Re-export all public types so external code sees a flat namespace
pub use self::expressions::*;
pub use self::items::*;
