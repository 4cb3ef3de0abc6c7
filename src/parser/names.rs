//! Resolution of class names written in source to fully-qualified names.
//!
//! A [`NameResolver`] is built once per parsed file. It records each namespace
//! region together with the class imports (`use` statements) visible in it, and
//! answers "what does `Foo` mean at this offset".

use rowan::{TextRange, TextSize};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::ast::{AstNode, ClassLike, NameRef, NamespaceDef, UseClause, UseDecl};
use super::syntax_kind::SyntaxKind;
use super::SyntaxNode;
use crate::base::ClassName;

/// One namespace region with its imports
#[derive(Debug, Clone)]
struct Scope {
    range: TextRange,
    namespace: Option<String>,
    /// Lower-cased local alias → fully-qualified name
    imports: FxHashMap<String, String>,
}

/// Resolves written class names against namespaces and imports
#[derive(Debug, Clone)]
pub struct NameResolver {
    scopes: Vec<Scope>,
}

impl NameResolver {
    pub fn new(root: &SyntaxNode) -> Self {
        let file_range = root.text_range();
        let namespaces: Vec<NamespaceDef> = root.descendants().filter_map(NamespaceDef::cast).collect();

        let mut scopes = Vec::new();
        if namespaces.is_empty() {
            scopes.push(Scope {
                range: file_range,
                namespace: None,
                imports: FxHashMap::default(),
            });
        } else {
            // Code before the first namespace statement lives in the global namespace.
            let first_start = namespaces[0].syntax().text_range().start();
            if first_start > file_range.start() {
                scopes.push(Scope {
                    range: TextRange::new(file_range.start(), first_start),
                    namespace: None,
                    imports: FxHashMap::default(),
                });
            }
            for (idx, ns) in namespaces.iter().enumerate() {
                let start = ns.syntax().text_range().start();
                let end = if ns.is_braced() {
                    ns.syntax().text_range().end()
                } else {
                    namespaces
                        .get(idx + 1)
                        .map(|next| next.syntax().text_range().start())
                        .unwrap_or(file_range.end())
                };
                scopes.push(Scope {
                    range: TextRange::new(start, end),
                    namespace: ns.name().map(|n| n.text().trim_start_matches('\\').to_string()),
                    imports: FxHashMap::default(),
                });
            }
        }

        let mut resolver = Self { scopes };
        for decl in root.descendants().filter_map(UseDecl::cast) {
            if decl.is_function() || decl.is_const() {
                continue;
            }
            resolver.record_imports(&decl);
        }
        resolver
    }

    fn record_imports(&mut self, decl: &UseDecl) {
        let offset = decl.syntax().text_range().start();
        let Some(scope) = self.scope_index(offset) else {
            return;
        };

        let mut add = |clause: &UseClause, prefix: Option<&str>| {
            let (Some(name), Some(local)) = (clause.name(), clause.local_name()) else {
                return;
            };
            let name = name.text();
            let name = name.trim_start_matches('\\');
            let fqn = match prefix {
                Some(prefix) => format!("{}\\{}", prefix, name),
                None => name.to_string(),
            };
            trace!(alias = %local, fqn = %fqn, "recorded import");
            self.scopes[scope].imports.insert(local.to_ascii_lowercase(), fqn);
        };

        for clause in decl.clauses() {
            add(&clause, None);
        }
        for group in decl.groups() {
            let prefix = group
                .prefix()
                .map(|p| p.text().trim_start_matches('\\').to_string())
                .unwrap_or_default();
            for clause in group.clauses() {
                add(&clause, Some(&prefix));
            }
        }
    }

    fn scope_index(&self, offset: TextSize) -> Option<usize> {
        // Innermost (last-starting) scope wins for braced namespaces.
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.range.contains_inclusive(offset))
            .max_by_key(|(_, s)| s.range.start())
            .map(|(idx, _)| idx)
    }

    /// The namespace in effect at an offset (`None` for the global namespace)
    pub fn namespace_at(&self, offset: TextSize) -> Option<&str> {
        self.scope_index(offset)
            .and_then(|idx| self.scopes[idx].namespace.as_deref())
    }

    /// Resolve a class name as written at `offset`.
    ///
    /// Does not handle `self`/`static`/`parent`; see [`NameResolver::resolve_name_ref`].
    pub fn resolve_text(&self, text: &str, offset: TextSize) -> ClassName {
        if let Some(absolute) = text.strip_prefix('\\') {
            return ClassName::from_syntax(absolute);
        }

        let scope = self.scope_index(offset).map(|idx| &self.scopes[idx]);
        let namespace = scope.and_then(|s| s.namespace.as_deref());

        let (first, rest) = match text.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (text, None),
        };

        if first.eq_ignore_ascii_case("namespace") {
            let rest = rest.unwrap_or_default();
            return match namespace {
                Some(ns) => ClassName::from_syntax(&format!("{}\\{}", ns, rest)),
                None => ClassName::from_syntax(rest),
            };
        }

        if let Some(imported) = scope.and_then(|s| s.imports.get(&first.to_ascii_lowercase())) {
            return match rest {
                Some(rest) => ClassName::from_syntax(&format!("{}\\{}", imported, rest)),
                None => ClassName::from_syntax(imported),
            };
        }

        match namespace {
            Some(ns) => ClassName::from_syntax(&format!("{}\\{}", ns, text)),
            None => ClassName::from_syntax(text),
        }
    }

    /// Resolve a name node, including `self`, `static` and `parent`.
    ///
    /// Returns `None` when a relative class name has no enclosing named class
    /// (top-level code, anonymous classes) or `parent` is used without `extends`.
    pub fn resolve_name_ref(&self, name: &NameRef) -> Option<ClassName> {
        let text = name.text();
        if text.eq_ignore_ascii_case("self") || text.eq_ignore_ascii_case("static") {
            return self.enclosing_class(name.syntax());
        }
        if text.eq_ignore_ascii_case("parent") {
            let class = enclosing_class_like(name.syntax())?;
            let parent = class.extends().into_iter().next()?;
            return Some(self.resolve_text(&parent.text(), parent.syntax().text_range().start()));
        }
        Some(self.resolve_text(&text, name.syntax().text_range().start()))
    }

    /// Fully-qualified name of a class-like declaration
    pub fn class_name(&self, class: &ClassLike) -> Option<ClassName> {
        let short = class.name()?;
        let offset = class.syntax().text_range().start();
        Some(match self.namespace_at(offset) {
            Some(ns) => ClassName::from_syntax(&format!("{}\\{}", ns, short)),
            None => ClassName::from_syntax(&short),
        })
    }

    /// Fully-qualified name of the named class-like enclosing a node
    pub fn enclosing_class(&self, node: &SyntaxNode) -> Option<ClassName> {
        let class = enclosing_class_like(node)?;
        self.class_name(&class)
    }
}

/// The nearest enclosing class-like; `None` inside an anonymous class body
pub fn enclosing_class_like(node: &SyntaxNode) -> Option<ClassLike> {
    node.ancestors()
        .find(|n| n.kind().is_class_like() || n.kind() == SyntaxKind::ANON_CLASS)
        .and_then(ClassLike::cast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_php;

    fn resolver(source: &str) -> (SyntaxNode, NameResolver) {
        let root = parse_php(source).syntax();
        let resolver = NameResolver::new(&root);
        (root, resolver)
    }

    fn offset_of(source: &str, needle: &str) -> TextSize {
        TextSize::new(source.find(needle).unwrap() as u32)
    }

    #[test]
    fn test_resolve_in_global_namespace() {
        let (_, r) = resolver("<?php $a = new Foo();");
        assert_eq!(r.resolve_text("Foo", TextSize::new(10)).as_str(), "Foo");
        assert_eq!(r.resolve_text("\\Bar\\Foo", TextSize::new(10)).as_str(), "Bar\\Foo");
    }

    #[test]
    fn test_resolve_relative_to_namespace() {
        let src = "<?php namespace App\\Models; class Post {} $x = new Post();";
        let (_, r) = resolver(src);
        let at = offset_of(src, "new Post");
        assert_eq!(r.namespace_at(at), Some("App\\Models"));
        assert_eq!(r.resolve_text("Post", at).as_str(), "App\\Models\\Post");
        assert_eq!(r.resolve_text("Sub\\Thing", at).as_str(), "App\\Models\\Sub\\Thing");
        assert_eq!(r.resolve_text("\\DateTime", at).as_str(), "DateTime");
        assert_eq!(r.resolve_text("namespace\\Tag", at).as_str(), "App\\Models\\Tag");
    }

    #[test]
    fn test_resolve_imports_case_insensitively() {
        let src = "<?php namespace App; use Vendor\\Lib\\Client as Http; use Vendor\\Util; $x;";
        let (_, r) = resolver(src);
        let at = offset_of(src, "$x");
        assert_eq!(r.resolve_text("http", at).as_str(), "Vendor\\Lib\\Client");
        assert_eq!(r.resolve_text("Util\\Str", at).as_str(), "Vendor\\Util\\Str");
    }

    #[test]
    fn test_resolve_group_imports() {
        let src = "<?php use App\\Models\\{User, Post as Article}; $x;";
        let (_, r) = resolver(src);
        let at = offset_of(src, "$x");
        assert_eq!(r.resolve_text("User", at).as_str(), "App\\Models\\User");
        assert_eq!(r.resolve_text("Article", at).as_str(), "App\\Models\\Post");
    }

    #[test]
    fn test_function_imports_are_ignored() {
        let src = "<?php use function App\\helper; $x;";
        let (_, r) = resolver(src);
        let at = offset_of(src, "$x");
        assert_eq!(r.resolve_text("helper", at).as_str(), "helper");
    }

    #[test]
    fn test_braced_namespaces_are_separate() {
        let src = "<?php namespace A { use X\\Y; $a; } namespace B { $b; }";
        let (_, r) = resolver(src);
        assert_eq!(r.resolve_text("Y", offset_of(src, "$a")).as_str(), "X\\Y");
        assert_eq!(r.resolve_text("Y", offset_of(src, "$b")).as_str(), "B\\Y");
    }

    #[test]
    fn test_resolve_self_static_parent() {
        let src = "<?php namespace App; class Base {} class Child extends Base {
            function f() { self::a(); static::b(); parent::c(); }
        }";
        let (root, r) = resolver(src);
        let names: Vec<_> = root
            .descendants()
            .filter_map(NameRef::cast)
            .filter(|n| n.is_relative_class())
            .map(|n| r.resolve_name_ref(&n).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["App\\Child", "App\\Child", "App\\Base"]);
    }

    #[test]
    fn test_self_outside_class_is_unresolved() {
        let src = "<?php self::a();";
        let (root, r) = resolver(src);
        let name = root.descendants().find_map(NameRef::cast).unwrap();
        assert_eq!(r.resolve_name_ref(&name), None);
    }
}
