//! Best-effort static type inference over a parsed file.
//!
//! Handles the shapes that dominate real code: `$this`, `new X`, typed
//! parameters and properties, return types of called methods, catch variables,
//! `@var` docblocks and the most recent plain assignment to a local variable.
//! Anything else is [`Type::Unknown`].

use rowan::{TextRange, TextSize, TokenAtOffset};
use tracing::trace;

use crate::base::{ClassName, MemberKind};
use crate::parser::{
    AstNode, CallExpr, CatchClause, ClosureExpr, Expr, MemberAccessExpr, NameResolver, Param,
    ParamList, StaticAccessExpr, SyntaxKind, SyntaxNode, VariableExpr, doc_tag_type,
};

use super::class::ReflectionClass;
use super::types::{DeclaredType, Type, declared_type, declared_type_from_doc};

/// Recursion limit for chains like `$a = $b; $b = $c; ...`
const MAX_DEPTH: u8 = 32;

/// Infers expression types in one file
pub(crate) struct Inferrer<'a> {
    resolver: &'a NameResolver,
    lookup: &'a dyn Fn(&ClassName) -> Option<ReflectionClass>,
}

impl<'a> Inferrer<'a> {
    pub(crate) fn new(
        resolver: &'a NameResolver,
        lookup: &'a dyn Fn(&ClassName) -> Option<ReflectionClass>,
    ) -> Self {
        Self { resolver, lookup }
    }

    /// Type of the outermost expression that ends exactly at `offset`
    pub(crate) fn type_at(&self, root: &SyntaxNode, offset: TextSize) -> Type {
        match expression_ending_at(root, offset) {
            Some(expr) => self.type_of(&expr, 0),
            None => {
                trace!(offset = u32::from(offset), "no expression ends at offset");
                Type::Unknown
            }
        }
    }

    fn type_of(&self, expr: &Expr, depth: u8) -> Type {
        if depth > MAX_DEPTH {
            return Type::Unknown;
        }
        let depth = depth + 1;
        match expr {
            Expr::Variable(var) => self.variable_type(var, depth),
            Expr::New(new) => new
                .class_name()
                .and_then(|name| self.resolver.resolve_name_ref(&name))
                .map(Type::Class)
                .unwrap_or_default(),
            Expr::Paren(paren) => paren
                .inner()
                .map(|inner| self.type_of(&inner, depth))
                .unwrap_or_default(),
            Expr::Assign(assign) if assign.is_plain() => assign
                .rhs()
                .map(|rhs| self.type_of(&rhs, depth))
                .unwrap_or_default(),
            Expr::Literal(literal) => Type::primitive(literal.type_name()),
            Expr::Array(_) => Type::primitive("array"),
            Expr::Name(name) => match name.text().to_ascii_lowercase().as_str() {
                "true" | "false" => Type::primitive("bool"),
                "null" => Type::primitive("null"),
                _ => Type::Unknown,
            },
            Expr::Closure(_) | Expr::ArrowFn(_) => Type::Class(ClassName::from_syntax("Closure")),
            Expr::Call(call) => self.call_type(call, depth),
            Expr::MemberAccess(access) => self.property_type(access, depth),
            Expr::StaticAccess(access) => self.static_access_type(access),
            Expr::Other(node) if node.kind() == SyntaxKind::UNARY_EXPR => {
                // `clone $x` keeps the type of its operand
                let is_clone = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .any(|t| t.kind() == SyntaxKind::CLONE_KW);
                if is_clone {
                    node.children()
                        .find_map(Expr::cast)
                        .map(|operand| self.type_of(&operand, depth))
                        .unwrap_or_default()
                } else {
                    Type::Unknown
                }
            }
            _ => Type::Unknown,
        }
    }

    /// Type of `$receiver->method()` or `Class::method()`
    fn call_type(&self, call: &CallExpr, depth: u8) -> Type {
        match call.callee() {
            Some(Expr::MemberAccess(access)) => {
                let Some(name) = access.name_token() else {
                    return Type::Unknown;
                };
                let receiver = access
                    .receiver()
                    .map(|r| self.type_of(&r, depth))
                    .unwrap_or_default();
                self.member_type(&receiver, MemberKind::Method, name.text())
            }
            Some(Expr::StaticAccess(access)) => {
                let Some(name) = access.name_token() else {
                    return Type::Unknown;
                };
                let qualifier = self.static_qualifier_type(&access);
                self.member_type(&qualifier, MemberKind::Method, name.text())
            }
            _ => Type::Unknown,
        }
    }

    /// Type of a property read `$receiver->prop`
    fn property_type(&self, access: &MemberAccessExpr, depth: u8) -> Type {
        let Some(name) = access.name_token() else {
            return Type::Unknown;
        };
        let receiver = access
            .receiver()
            .map(|r| self.type_of(&r, depth))
            .unwrap_or_default();
        self.member_type(&receiver, MemberKind::Property, name.text())
    }

    /// Type of `Class::$prop`, `Class::CONST` or `Class::class`
    fn static_access_type(&self, access: &StaticAccessExpr) -> Type {
        let Some(name) = access.name_token() else {
            return Type::Unknown;
        };
        let kind = match name.kind() {
            SyntaxKind::CLASS_KW => return Type::primitive("string"),
            SyntaxKind::VARIABLE => MemberKind::Property,
            _ => MemberKind::Constant,
        };
        let qualifier = self.static_qualifier_type(access);
        self.member_type(&qualifier, kind, name.text())
    }

    fn static_qualifier_type(&self, access: &StaticAccessExpr) -> Type {
        match access.qualifier() {
            Some(Expr::Name(name)) => self
                .resolver
                .resolve_name_ref(&name)
                .map(Type::Class)
                .unwrap_or_default(),
            // `$obj::method()` is not inferred
            _ => Type::Unknown,
        }
    }

    /// Declared type of a member on the receiver's class
    fn member_type(&self, receiver: &Type, kind: MemberKind, name: &str) -> Type {
        let Some(class_name) = receiver.class_name() else {
            return Type::Unknown;
        };
        let Some(class) = (self.lookup)(class_name) else {
            trace!(class = %class_name, "receiver class not reflectable");
            return Type::Unknown;
        };
        match class.member(Some(kind), name) {
            Some(member) if member.late_static => Type::Class(class_name.clone()),
            Some(member) => member.ty.clone(),
            None => Type::Unknown,
        }
    }

    /// Type of a variable at its point of use
    fn variable_type(&self, var: &VariableExpr, depth: u8) -> Type {
        let Some(name) = var.name() else {
            return Type::Unknown;
        };
        if name == "this" {
            return self
                .resolver
                .enclosing_class(var.syntax())
                .map(Type::Class)
                .unwrap_or_default();
        }
        self.lookup_variable(var.syntax(), &name, var.syntax().text_range().start(), depth)
    }

    /// Find the latest binding of `$name` before `offset` in the scope around `at`
    fn lookup_variable(&self, at: &SyntaxNode, name: &str, offset: TextSize, depth: u8) -> Type {
        let scope = scope_of(at);

        let mut best: Option<(TextSize, Binding)> = None;
        let mut consider = |position: TextSize, binding: Binding| {
            if position <= offset && best.as_ref().is_none_or(|(p, _)| position >= *p) {
                best = Some((position, binding));
            }
        };

        for node in scope_nodes(&scope) {
            match node.kind() {
                SyntaxKind::ASSIGN_EXPR => {
                    let Some(Expr::Assign(assign)) = Expr::cast(node.clone()) else {
                        continue;
                    };
                    let targets_var = matches!(
                        assign.lhs(),
                        Some(Expr::Variable(ref lhs)) if lhs.name().as_deref() == Some(name)
                    );
                    // Only assignments completed before the use count
                    if targets_var && assign.is_plain() && node.text_range().end() <= offset {
                        consider(node.text_range().end(), Binding::Assign(node));
                    }
                }
                SyntaxKind::CATCH_CLAUSE => {
                    if let Some(clause) = CatchClause::cast(node.clone())
                        && clause
                            .variable_token()
                            .is_some_and(|t| t.text().trim_start_matches('$') == name)
                        && node.text_range().start() <= offset
                    {
                        consider(node.text_range().start(), Binding::Catch(clause));
                    }
                }
                _ => {}
            }
        }

        // Inline `/** @var Foo $name */` docblocks override the statement they annotate
        for token in scope
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::DOC_COMMENT && t.text_range().end() <= offset)
            .filter(|t| {
                t.parent_ancestors()
                    .take_while(|a| a != &scope)
                    .all(|a| !opens_scope(a.kind()))
            })
        {
            let Some(statement) = token.siblings_with_tokens(rowan::Direction::Next).find_map(|e| e.into_node()) else {
                continue;
            };
            let Some(doc) = crate::parser::extract_doc_comment(&statement) else {
                continue;
            };
            let names_var = doc.contains(&format!("${}", name)) || assigns_to(&statement, name);
            if let Some(ty) = doc_tag_type(&doc, "@var", Some(name))
                && names_var
            {
                let end = statement.text_range().end();
                let position = if end <= offset { end } else { token.text_range().end() };
                consider(position, Binding::Doc(ty, token.text_range()));
            }
        }

        match best {
            Some((_, Binding::Assign(node))) => Expr::cast(node)
                .map(|assign| self.type_of(&assign, depth))
                .unwrap_or_default(),
            Some((_, Binding::Catch(clause))) => clause
                .type_ref()
                .map(|ty| super::types::declared_type_from_ref(&ty, self.resolver).ty)
                .unwrap_or_default(),
            Some((_, Binding::Doc(text, range))) => {
                let class = self.resolver.enclosing_class(at);
                declared_type_from_doc(&text, self.resolver, range.start(), class.as_ref()).ty
            }
            None => self.parameter_type(&scope, name, depth),
        }
    }

    /// Parameters of the enclosing function-like, or the parent scope for
    /// arrow functions and variables imported with `use (...)`.
    fn parameter_type(&self, scope: &SyntaxNode, name: &str, depth: u8) -> Type {
        if !scope.kind().is_function_like() {
            return Type::Unknown;
        }

        let param = scope
            .children()
            .find_map(ParamList::cast)
            .and_then(|list| {
                list.params().find(|p| {
                    p.variable_token()
                        .is_some_and(|t| t.text().trim_start_matches('$') == name)
                })
            });
        if let Some(param) = param {
            return self.param_declared_type(scope, &param).ty;
        }

        let inherits = match scope.kind() {
            SyntaxKind::ARROW_FN_EXPR => true,
            SyntaxKind::CLOSURE_EXPR => ClosureExpr::cast(scope.clone())
                .and_then(|c| c.uses())
                .is_some_and(|uses| uses.variables().any(|v| v.name().as_deref() == Some(name))),
            _ => false,
        };
        match scope.parent() {
            Some(parent) if inherits => {
                self.lookup_variable(&parent, name, scope.text_range().start(), depth + 1)
            }
            _ => Type::Unknown,
        }
    }

    fn param_declared_type(&self, scope: &SyntaxNode, param: &Param) -> DeclaredType {
        let class = self.resolver.enclosing_class(scope);
        let hinted = declared_type(param.type_ref(), param, "@param", None, self.resolver, class.as_ref());
        if !hinted.ty.is_unknown() {
            return hinted;
        }
        // `@param` lives on the function's docblock, not the parameter
        let variable = param.variable_token().map(|t| t.text().to_string());
        crate::parser::extract_doc_comment(scope)
            .and_then(|doc| doc_tag_type(&doc, "@param", variable.as_deref()))
            .map(|text| {
                declared_type_from_doc(&text, self.resolver, scope.text_range().start(), class.as_ref())
            })
            .unwrap_or_default()
    }
}

enum Binding {
    Assign(SyntaxNode),
    Catch(CatchClause),
    Doc(String, TextRange),
}

/// Whether `statement` is `$name = ...;`
fn assigns_to(statement: &SyntaxNode, name: &str) -> bool {
    match statement.children().find_map(Expr::cast) {
        Some(Expr::Assign(assign)) => matches!(
            assign.lhs(),
            Some(Expr::Variable(ref lhs)) if lhs.name().as_deref() == Some(name)
        ),
        _ => false,
    }
}

/// The variable scope enclosing a node: nearest function-like or the file
fn scope_of(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors()
        .find(|n| n.kind().is_function_like())
        .or_else(|| node.ancestors().last())
        .unwrap_or_else(|| node.clone())
}

/// Nodes belonging to a scope, skipping nested closures, functions and classes
fn scope_nodes(scope: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    scope.descendants().filter(move |node| {
        node.ancestors()
            .take_while(|a| a != scope)
            .all(|a| !opens_scope(a.kind()))
    })
}

fn opens_scope(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::FUNCTION_DECL
            | SyntaxKind::METHOD_DECL
            | SyntaxKind::CLOSURE_EXPR
            | SyntaxKind::ARROW_FN_EXPR
            | SyntaxKind::CLASS_DECL
            | SyntaxKind::INTERFACE_DECL
            | SyntaxKind::TRAIT_DECL
            | SyntaxKind::ENUM_DECL
            | SyntaxKind::ANON_CLASS
    )
}

/// The outermost expression node whose range ends exactly at `offset`
pub(crate) fn expression_ending_at(root: &SyntaxNode, offset: TextSize) -> Option<Expr> {
    let token = match root.token_at_offset(offset) {
        TokenAtOffset::None => return None,
        TokenAtOffset::Single(token) => token,
        TokenAtOffset::Between(left, _) => left,
    };
    if token.text_range().end() != offset {
        return None;
    }

    let mut found = None;
    for node in token.parent_ancestors() {
        if node.text_range().end() != offset {
            break;
        }
        if let Some(expr) = Expr::cast(node) {
            found = Some(expr);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_php;
    use crate::reflect::index::{ClassIndex, reflect};

    /// Infer the type of the expression ending right before `marker` in `source`.
    fn infer(source: &str, before: &str) -> Type {
        let root = parse_php(source).syntax();
        let resolver = NameResolver::new(&root);
        let index = ClassIndex::from_root(&root);
        let lookup = |name: &ClassName| reflect(name, &[&index]).ok();
        let inferrer = Inferrer::new(&resolver, &lookup);
        let offset = TextSize::new(source.find(before).expect("marker") as u32);
        inferrer.type_at(&root, offset)
    }

    fn class(name: &str) -> Type {
        Type::Class(ClassName::new(name).unwrap())
    }

    #[test]
    fn test_new_assignment() {
        let src = "<?php class B {} $b = new B(); $b->foo();";
        assert_eq!(infer(src, "->foo"), class("B"));
    }

    #[test]
    fn test_latest_assignment_wins() {
        let src = "<?php $a = new A(); $a = new B(); $a->x; $a = new C();";
        assert_eq!(infer(src, "->x"), class("B"));
    }

    #[test]
    fn test_this_and_namespaces() {
        let src = "<?php namespace App; class Post { function f() { $this->g(); } }";
        assert_eq!(infer(src, "->g"), class("App\\Post"));
    }

    #[test]
    fn test_typed_parameter() {
        let src = "<?php use Lib\\Client; function send(Client $c) { $c->post(); }";
        assert_eq!(infer(src, "->post"), class("Lib\\Client"));
    }

    #[test]
    fn test_docblock_parameter() {
        let src = "<?php /** @param Mailer $m */ function send($m) { $m->send(); }";
        assert_eq!(infer(src, "->send"), class("Mailer"));
    }

    #[test]
    fn test_inline_var_docblock() {
        let src = "<?php /** @var Repo $repo */ $repo = $container->get('x'); $repo->find();";
        assert_eq!(infer(src, "->find"), class("Repo"));
    }

    #[test]
    fn test_method_return_types() {
        let src = r#"<?php
            class Builder { public function where(): static {} public function first(): ?Post {} }
            class PostBuilder extends Builder {}
            $q = new PostBuilder();
            $q->where()->first()->title;
        "#;
        assert_eq!(infer(src, "->first"), class("PostBuilder"));
        assert_eq!(infer(src, "->title"), class("Post"));
    }

    #[test]
    fn test_property_types() {
        let src = r#"<?php
            class Post { public Author $author; public function __construct(private Tag $tag) {}
                function f() { $this->author->name; $this->tag->label; } }
        "#;
        assert_eq!(infer(src, "->name"), class("Author"));
        assert_eq!(infer(src, "->label"), class("Tag"));
    }

    #[test]
    fn test_static_calls_and_enum_cases() {
        let src = r#"<?php
            class Post { public static function make(): self {} }
            enum Status { case Draft; }
            Post::make()->save(); Status::Draft->label();
        "#;
        assert_eq!(infer(src, "->save"), class("Post"));
        assert_eq!(infer(src, "->label"), class("Status"));
    }

    #[test]
    fn test_closure_scopes() {
        let src = r#"<?php
            $post = new Post();
            $f = function () use ($post) { $post->a(); };
            $g = fn() => $post->b();
            $h = function () { $post->c(); };
        "#;
        assert_eq!(infer(src, "->a"), class("Post"));
        assert_eq!(infer(src, "->b"), class("Post"));
        assert_eq!(infer(src, "->c"), Type::Unknown);
    }

    #[test]
    fn test_catch_variable() {
        let src = "<?php try {} catch (NotFound $e) { $e->report(); }";
        assert_eq!(infer(src, "->report"), class("NotFound"));
    }

    #[test]
    fn test_parenthesized_new_and_clone() {
        assert_eq!(infer("<?php (new Post())->save();", "->save"), class("Post"));
        assert_eq!(infer("<?php $p = new Post(); $q = clone $p; $q->save();", "->save"), class("Post"));
    }

    #[test]
    fn test_primitives_and_unknowns() {
        assert_eq!(infer("<?php $s = 'x'; $s->y;", "->y"), Type::primitive("string"));
        assert_eq!(infer("<?php $n = 1; $n->y;", "->y"), Type::primitive("int"));
        assert_eq!(infer("<?php $u->y;", "->y"), Type::Unknown);
        assert_eq!(infer("<?php $u = foo(); $u->y;", "->y"), Type::Unknown);
    }

    #[test]
    fn test_self_referencing_assignment_terminates() {
        let src = "<?php class Node { public function next(): Node {} } $n = new Node(); $n = $n->next(); $n->z;";
        assert_eq!(infer(src, "->z"), class("Node"));
    }

    #[test]
    fn test_no_expression_at_offset() {
        let src = "<?php $a->b();";
        let root = parse_php(src).syntax();
        let resolver = NameResolver::new(&root);
        let lookup = |_: &ClassName| None;
        let inferrer = Inferrer::new(&resolver, &lookup);
        assert_eq!(inferrer.type_at(&root, TextSize::new(7)), Type::Unknown);
    }
}
