//! Static types as seen by the reflector.

use std::fmt;

use rowan::TextSize;
use smol_str::SmolStr;

use crate::base::ClassName;
use crate::parser::{AstNode, NameRef, NameResolver, TypeRef};

/// The inferred static type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// Inference gave up
    #[default]
    Unknown,
    /// A scalar or other non-class type (`int`, `string`, `array`, `null`, ...)
    Primitive(SmolStr),
    /// A class, interface, trait or enum
    Class(ClassName),
}

impl Type {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_class_like(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn primitive(name: &str) -> Self {
        Type::Primitive(SmolStr::new(name.to_ascii_lowercase()))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => f.write_str("<unknown>"),
            Type::Primitive(name) => f.write_str(name),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}

/// Built-in type keywords that never name a class
const PRIMITIVES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "array", "iterable",
    "callable", "object", "mixed", "void", "never", "null", "false", "true", "resource",
    "list", "class-string", "non-empty-string", "positive-int", "scalar", "numeric",
];

pub(crate) fn is_primitive(name: &str) -> bool {
    PRIMITIVES.iter().any(|p| p.eq_ignore_ascii_case(name))
}

/// A declared type hint, before late static binding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DeclaredType {
    pub(crate) ty: Type,
    /// `static` or `$this`: the type is whatever class the member is accessed on
    pub(crate) late_static: bool,
}

impl DeclaredType {
    pub(crate) fn unknown() -> Self {
        Self::default()
    }

    pub(crate) fn of(ty: Type) -> Self {
        Self { ty, late_static: false }
    }
}

/// Interpret a type hint node (`Foo`, `?Foo`, `Foo|null`, `static`).
///
/// Unions of several non-null types stay unknown.
pub(crate) fn declared_type_from_ref(ty: &TypeRef, resolver: &NameResolver) -> DeclaredType {
    let names: Vec<NameRef> = ty
        .names()
        .filter(|n| !n.text().eq_ignore_ascii_case("null"))
        .collect();
    let [name] = names.as_slice() else {
        return DeclaredType::unknown();
    };
    let text = name.text();
    if text.eq_ignore_ascii_case("static") {
        return DeclaredType {
            ty: resolver.resolve_name_ref(name).map(Type::Class).unwrap_or_default(),
            late_static: true,
        };
    }
    if is_primitive(&text) {
        return DeclaredType::of(Type::primitive(&text));
    }
    DeclaredType::of(resolver.resolve_name_ref(name).map(Type::Class).unwrap_or_default())
}

/// Interpret a docblock type (`@var Foo|null`, `@return static`, `Foo[]`).
///
/// `class` is the class the docblock appears in, for `self`, `static` and `$this`.
pub(crate) fn declared_type_from_doc(
    text: &str,
    resolver: &NameResolver,
    offset: TextSize,
    class: Option<&ClassName>,
) -> DeclaredType {
    let parts: Vec<&str> = text
        .trim_start_matches('?')
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("null"))
        .collect();
    let [part] = parts.as_slice() else {
        return DeclaredType::unknown();
    };

    if part.ends_with("[]") {
        return DeclaredType::of(Type::primitive("array"));
    }
    // Generic arguments do not change the class: `Collection<int, Post>`
    let base = part.split('<').next().unwrap_or(part);

    if base.eq_ignore_ascii_case("static") || base == "$this" {
        return DeclaredType {
            ty: class.cloned().map(Type::Class).unwrap_or_default(),
            late_static: true,
        };
    }
    if base.eq_ignore_ascii_case("self") {
        return DeclaredType::of(class.cloned().map(Type::Class).unwrap_or_default());
    }
    if is_primitive(base) {
        return DeclaredType::of(Type::primitive(base));
    }
    if crate::base::ClassName::new(base).is_err() {
        return DeclaredType::unknown();
    }
    DeclaredType::of(Type::Class(resolver.resolve_text(base, offset)))
}

/// Type of a type hint or, failing that, of a docblock tag on `node`.
pub(crate) fn declared_type<N: AstNode>(
    hint: Option<TypeRef>,
    node: &N,
    tag: &str,
    variable: Option<&str>,
    resolver: &NameResolver,
    class: Option<&ClassName>,
) -> DeclaredType {
    if let Some(hint) = hint {
        let declared = declared_type_from_ref(&hint, resolver);
        if !declared.ty.is_unknown() {
            return declared;
        }
    }
    node.doc_comment()
        .and_then(|doc| crate::parser::doc_tag_type(&doc, tag, variable))
        .map(|text| {
            declared_type_from_doc(&text, resolver, node.syntax().text_range().start(), class)
        })
        .unwrap_or_default()
}
