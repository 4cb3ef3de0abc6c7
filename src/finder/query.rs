//! What to search for.

use crate::base::{ClassName, MemberKind, MemberName};

/// Immutable search query: an optional target class, member name and
/// member kind. Every unset field matches anything.
///
/// ```ignore
/// let query = ClassMemberQuery::new()
///     .with_class(ClassName::new("App\\Post")?)
///     .with_member(MemberName::new("save")?)
///     .only_methods();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassMemberQuery {
    class: Option<ClassName>,
    member: Option<MemberName>,
    kind: Option<MemberKind>,
}

impl ClassMemberQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: ClassName) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_member(mut self, member: MemberName) -> Self {
        self.member = Some(member);
        self
    }

    pub fn with_kind(mut self, kind: MemberKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn only_methods(self) -> Self {
        self.with_kind(MemberKind::Method)
    }

    pub fn only_properties(self) -> Self {
        self.with_kind(MemberKind::Property)
    }

    pub fn only_constants(self) -> Self {
        self.with_kind(MemberKind::Constant)
    }

    pub fn class(&self) -> Option<&ClassName> {
        self.class.as_ref()
    }

    pub fn member(&self) -> Option<&MemberName> {
        self.member.as_ref()
    }

    pub fn kind(&self) -> Option<MemberKind> {
        self.kind
    }

    pub fn has_class(&self) -> bool {
        self.class.is_some()
    }

    pub fn has_member(&self) -> bool {
        self.member.is_some()
    }

    pub fn has_kind(&self) -> bool {
        self.kind.is_some()
    }

    /// Exact-text comparison; a leading `$` on `name` is ignored
    pub fn matches_member_name(&self, name: &str) -> bool {
        let name = name.strip_prefix('$').unwrap_or(name);
        self.member.as_ref().is_none_or(|m| m.as_str() == name)
    }

    pub fn matches_kind(&self, kind: MemberKind) -> bool {
        self.kind.is_none_or(|k| k == kind)
    }

    /// Textual comparison of fully-qualified names
    pub fn matches_class(&self, class: &ClassName) -> bool {
        self.class.as_ref().is_none_or(|c| c == class)
    }
}
