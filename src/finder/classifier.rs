//! Semantic verification of candidates.
//!
//! Each candidate shape gets its own check:
//!
//! - static access is resolved from syntax alone and compared textually with
//!   the target class;
//! - instance access infers the receiver type through the [`Reflector`] and
//!   checks it against the target hierarchy;
//! - declarations are attributed to their enclosing class-like and checked
//!   against the target, or against the interface that declares the member
//!   when the target only inherits it from one.

use std::cell::OnceCell;

use rowan::TextRange;
use tracing::trace;

use crate::base::{ClassName, LineIndex, MemberKind, MemberName};
use crate::parser::{AstNode, Expr, MemberAccessExpr, NameResolver, StaticAccessExpr, SyntaxNode};
use crate::reflect::{Reflector, Type};

use super::collector::{Candidate, NameSyntax};
use super::diagnostics::{Diagnostic, DiagnosticSink, Severity, codes};
use super::query::ClassMemberQuery;
use super::reference::MemberReference;

/// A member name spelled out in the source
struct LiteralName {
    text: MemberName,
    /// Excludes a property's leading `$`
    range: TextRange,
}

impl LiteralName {
    fn of(name: &NameSyntax) -> Option<Self> {
        Some(Self {
            text: MemberName::from_syntax(name.text()?),
            range: name.range()?,
        })
    }
}

/// Decides for each candidate whether it references the queried member.
pub(crate) struct Classifier<'a, R: ?Sized, S: ?Sized> {
    source: &'a str,
    query: &'a ClassMemberQuery,
    reflector: &'a R,
    sink: &'a S,
    resolver: &'a NameResolver,
    line_index: &'a LineIndex,
    /// Class declarations are checked against; computed on first use
    declaration_target: OnceCell<Option<ClassName>>,
}

impl<'a, R: Reflector + ?Sized, S: DiagnosticSink + ?Sized> Classifier<'a, R, S> {
    pub(crate) fn new(
        source: &'a str,
        query: &'a ClassMemberQuery,
        reflector: &'a R,
        sink: &'a S,
        resolver: &'a NameResolver,
        line_index: &'a LineIndex,
    ) -> Self {
        Self {
            source,
            query,
            reflector,
            sink,
            resolver,
            line_index,
            declaration_target: OnceCell::new(),
        }
    }

    pub(crate) fn classify(&self, candidate: &Candidate) -> Option<MemberReference> {
        let kind = candidate.kind();
        let name = candidate.name();
        match candidate {
            Candidate::StaticAccess { node, .. } => {
                let name = self.access_name(kind, name)?;
                self.static_access(kind, node, name)
            }
            Candidate::InstanceAccess { node, .. } => {
                let name = self.access_name(kind, name)?;
                self.instance_access(kind, node, name)
            }
            Candidate::Declaration { node, .. } => self.declaration(kind, node, name),
        }
    }

    /// `Qualifier::member`: the qualifier must be a name, and must be the
    /// target itself; overriding static members are not followed.
    fn static_access(
        &self,
        kind: MemberKind,
        node: &SyntaxNode,
        name: LiteralName,
    ) -> Option<MemberReference> {
        let access = StaticAccessExpr::cast(node.clone())?;

        let qualifier = match access.qualifier() {
            Some(Expr::Name(name_ref)) => name_ref,
            _ => {
                self.report(
                    Severity::Info,
                    node.text_range(),
                    codes::DYNAMIC_QUALIFIER,
                    format!("static access to `{}` through an expression is not resolved", name.text),
                );
                return None;
            }
        };
        let Some(class) = self.resolver.resolve_name_ref(&qualifier) else {
            trace!(qualifier = %qualifier.text(), "qualifier has no enclosing class");
            return None;
        };

        if let Some(target) = self.query.class()
            && class != *target
        {
            trace!(class = %class, target = %target, member = %name.text, "static access on other class");
            return None;
        }
        Some(self.reference(kind, name, Some(class), false))
    }

    /// `$receiver->member`: infer the receiver type and check it against the target.
    fn instance_access(
        &self,
        kind: MemberKind,
        node: &SyntaxNode,
        name: LiteralName,
    ) -> Option<MemberReference> {
        let receiver = MemberAccessExpr::cast(node.clone())?.receiver()?;
        let offset = receiver.syntax().text_range().end();

        match self.reflector.resolve_type(self.source, offset) {
            Type::Unknown if self.query.has_member() => {
                trace!(member = %name.text, "receiver type unknown, rejecting");
                None
            }
            Type::Unknown => {
                trace!(member = %name.text, "receiver type unknown, accepting");
                Some(self.reference(kind, name, None, false))
            }
            Type::Primitive(ty) => {
                trace!(member = %name.text, ty = %ty, "receiver is not an object");
                None
            }
            Type::Class(class) => {
                let Some(target) = self.query.class() else {
                    return Some(self.reference(kind, name, Some(class), false));
                };
                match self.reflector.reflect_class(&class) {
                    Ok(reflection) if reflection.is_instance_of(target) => {
                        Some(self.reference(kind, name, Some(class), false))
                    }
                    Ok(_) => {
                        trace!(class = %class, target = %target, "receiver outside target hierarchy");
                        None
                    }
                    Err(err) => {
                        self.report(
                            Severity::Warning,
                            name.range,
                            codes::UNVERIFIED_MATCH,
                            format!("{}; accepting `{}` on `{}` unverified", err, name.text, class),
                        );
                        Some(self.reference(kind, name, Some(class), false))
                    }
                }
            }
        }
    }

    /// A member declared in a class-like body.
    fn declaration(
        &self,
        kind: MemberKind,
        node: &SyntaxNode,
        name: NameSyntax,
    ) -> Option<MemberReference> {
        let Some(name) = LiteralName::of(&name) else {
            self.report(
                Severity::Warning,
                node.text_range(),
                codes::MALFORMED_DECLARATION,
                format!("{} declaration without a name", kind),
            );
            return None;
        };

        let Some(owner) = self.resolver.enclosing_class(node) else {
            self.report(
                Severity::Info,
                name.range,
                codes::ANONYMOUS_CLASS_MEMBER,
                format!("{} `{}` is declared in an anonymous class; skipped", kind, name.text),
            );
            return None;
        };
        let Some(target) = self.declaration_target() else {
            return Some(self.reference(kind, name, Some(owner), true));
        };

        match self.reflector.reflect_class(&owner) {
            Ok(class) if class.is_trait() || class.is_instance_of(target) => {
                Some(self.reference(kind, name, Some(owner), true))
            }
            Ok(_) => {
                trace!(class = %owner, target = %target, member = %name.text, "declaration outside target hierarchy");
                None
            }
            Err(err) => {
                self.report(
                    Severity::Warning,
                    name.range,
                    codes::CLASS_NOT_FOUND,
                    format!("{}; skipping declaration of `{}`", err, name.text),
                );
                None
            }
        }
    }

    /// Literal member name of an access; computed names are reported and rejected
    fn access_name(&self, kind: MemberKind, name: NameSyntax) -> Option<LiteralName> {
        match name {
            NameSyntax::Literal(_) => LiteralName::of(&name),
            NameSyntax::Dynamic(range) => {
                self.report(
                    Severity::Warning,
                    range,
                    codes::DYNAMIC_MEMBER_NAME,
                    format!("{} name `{}` is computed at runtime", kind, &self.source[range]),
                );
                None
            }
            NameSyntax::Missing => {
                trace!("member access without a name");
                None
            }
        }
    }

    /// The class declarations must belong to, after interface retargeting
    fn declaration_target(&self) -> Option<&ClassName> {
        self.declaration_target
            .get_or_init(|| self.compute_declaration_target())
            .as_ref()
    }

    /// When the target does not have the member itself but implements an
    /// interface that declares it, declarations are checked against that
    /// interface. With several such interfaces the first one wins.
    fn compute_declaration_target(&self) -> Option<ClassName> {
        let target = self.query.class()?;
        let Some(member) = self.query.member() else {
            return Some(target.clone());
        };
        let kind = self.query.kind();

        let class = match self.reflector.reflect_class(target) {
            Ok(class) => class,
            Err(err) => {
                self.report(
                    Severity::Warning,
                    TextRange::empty(0.into()),
                    codes::CLASS_NOT_FOUND,
                    format!("{}; matching declarations against `{}` textually", err, target),
                );
                return Some(target.clone());
            }
        };
        if class.has_member(kind, member.as_str()) {
            return Some(target.clone());
        }

        let mut declaring: Vec<ClassName> = Vec::new();
        for interface in class.interfaces() {
            let Ok(reflection) = self.reflector.reflect_class(interface) else {
                continue;
            };
            if let Some(found) = reflection.member(kind, member.as_str())
                && !declaring.iter().any(|d| d.eq_ignore_case(&found.declaring_class))
            {
                declaring.push(found.declaring_class.clone());
            }
        }

        match declaring.as_slice() {
            [] => Some(target.clone()),
            [only] => {
                trace!(target = %target, interface = %only, member = %member, "retargeting to interface");
                Some(only.clone())
            }
            [first, ..] => {
                let names: Vec<&str> = declaring.iter().map(ClassName::as_str).collect();
                self.report(
                    Severity::Info,
                    TextRange::empty(0.into()),
                    codes::AMBIGUOUS_INTERFACE,
                    format!(
                        "`{}` is declared by several interfaces of `{}` ({}); using `{}`",
                        member,
                        target,
                        names.join(", "),
                        first
                    ),
                );
                Some(first.clone())
            }
        }
    }

    fn reference(
        &self,
        kind: MemberKind,
        name: LiteralName,
        owning_class: Option<ClassName>,
        is_declaration: bool,
    ) -> MemberReference {
        trace!(
            member = %name.text,
            owner = owning_class.as_ref().map(ClassName::as_str).unwrap_or("?"),
            start = u32::from(name.range.start()),
            "accepted"
        );
        MemberReference {
            name: name.text,
            range: name.range,
            owning_class,
            kind,
            is_declaration,
        }
    }

    fn report(&self, severity: Severity, range: TextRange, code: &str, message: String) {
        let position = self.line_index.line_col(range.start());
        self.sink
            .report(Diagnostic::new(severity, range, position, message).with_code(code));
    }
}

#[cfg(test)]
mod tests;
