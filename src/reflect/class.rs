//! Reflection snapshots of class-likes.

use crate::base::{ClassName, MemberKind, MemberName};
use crate::parser::ClassLikeKind;

use super::types::Type;

/// Which class-like construct a reflected class is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl From<ClassLikeKind> for ClassKind {
    fn from(kind: ClassLikeKind) -> Self {
        match kind {
            ClassLikeKind::Class => ClassKind::Class,
            ClassLikeKind::Interface => ClassKind::Interface,
            ClassLikeKind::Trait => ClassKind::Trait,
            ClassLikeKind::Enum => ClassKind::Enum,
        }
    }
}

/// A member visible on a reflected class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedMember {
    pub kind: MemberKind,
    pub name: MemberName,
    /// The class-like whose body declares the member
    pub declaring_class: ClassName,
    pub is_static: bool,
    /// Declared type: property type, method return type or enum case type
    pub ty: Type,
    /// Return type `static`/`$this`: resolves to the class the member is accessed on
    pub late_static: bool,
}

/// Snapshot of a class-like and its hierarchy.
///
/// `ancestors` holds every superclass and every implemented interface, transitively.
/// `members` holds declared members, members inherited along the superclass chain
/// and members imported from traits; members of implemented interfaces are not
/// included for classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionClass {
    name: ClassName,
    kind: ClassKind,
    ancestors: Vec<ClassName>,
    interfaces: Vec<ClassName>,
    members: Vec<ReflectedMember>,
}

impl ReflectionClass {
    pub fn builder(name: ClassName, kind: ClassKind) -> ReflectionClassBuilder {
        ReflectionClassBuilder {
            class: ReflectionClass {
                name,
                kind,
                ancestors: Vec::new(),
                interfaces: Vec::new(),
                members: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_class(&self) -> bool {
        self.kind == ClassKind::Class
    }

    /// True if this class is `other` or extends/implements it, transitively.
    /// Class names compare case-insensitively.
    pub fn is_instance_of(&self, other: &ClassName) -> bool {
        self.name.eq_ignore_case(other) || self.ancestors.iter().any(|a| a.eq_ignore_case(other))
    }

    pub fn ancestors(&self) -> &[ClassName] {
        &self.ancestors
    }

    /// Implemented interfaces: direct ones first, in declaration order
    pub fn interfaces(&self) -> &[ClassName] {
        &self.interfaces
    }

    pub fn members(&self) -> &[ReflectedMember] {
        &self.members
    }

    /// Find a member by name, optionally restricted to one kind
    pub fn member(&self, kind: Option<MemberKind>, name: &str) -> Option<&ReflectedMember> {
        let name = name.trim_start_matches('$');
        self.members.iter().find(|m| {
            kind.is_none_or(|k| k == m.kind) && m.kind.names_match(m.name.as_str(), name)
        })
    }

    pub fn has_member(&self, kind: Option<MemberKind>, name: &str) -> bool {
        self.member(kind, name).is_some()
    }
}

/// Builder for [`ReflectionClass`] snapshots
#[derive(Debug, Clone)]
pub struct ReflectionClassBuilder {
    class: ReflectionClass,
}

impl ReflectionClassBuilder {
    /// Add a superclass
    pub fn ancestor(mut self, name: ClassName) -> Self {
        if !self.class.ancestors.iter().any(|a| a.eq_ignore_case(&name)) {
            self.class.ancestors.push(name);
        }
        self
    }

    /// Add an implemented interface (also recorded as an ancestor)
    pub fn interface(mut self, name: ClassName) -> Self {
        if !self.class.interfaces.iter().any(|i| i.eq_ignore_case(&name)) {
            self.class.interfaces.push(name.clone());
        }
        self.ancestor(name)
    }

    /// Add a member declared on the class itself, with no known type
    pub fn member(self, kind: MemberKind, name: MemberName) -> Self {
        let declaring_class = self.class.name.clone();
        self.reflected_member(ReflectedMember {
            kind,
            name,
            declaring_class,
            is_static: false,
            ty: Type::Unknown,
            late_static: false,
        })
    }

    /// Add a fully described member; an already-present member of the same
    /// kind and name shadows it.
    pub fn reflected_member(mut self, member: ReflectedMember) -> Self {
        if !self.class.has_member(Some(member.kind), member.name.as_str()) {
            self.class.members.push(member);
        }
        self
    }

    pub fn build(self) -> ReflectionClass {
        self.class
    }
}
