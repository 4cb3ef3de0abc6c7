//! Search results.

use rowan::{TextRange, TextSize};

use crate::base::{ClassName, MemberKind, MemberName};

/// One accepted occurrence of a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberReference {
    pub name: MemberName,
    /// Covers exactly the member-name token; a property's leading `$` is excluded
    pub range: TextRange,
    /// The class the reference was attributed to; `None` for best-effort matches
    pub owning_class: Option<ClassName>,
    pub kind: MemberKind,
    /// Whether this is the member's declaration (vs a use)
    pub is_declaration: bool,
}

impl MemberReference {
    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.range.end()
    }

    pub fn has_class(&self) -> bool {
        self.owning_class.is_some()
    }
}

/// Accepted references in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberReferences {
    references: Vec<MemberReference>,
}

impl MemberReferences {
    pub(crate) fn new(references: Vec<MemberReference>) -> Self {
        Self { references }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberReference> {
        self.references.iter()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn as_slice(&self) -> &[MemberReference] {
        &self.references
    }

    /// Only references whose owning class is known
    pub fn with_classes(&self) -> MemberReferences {
        self.filtered(MemberReference::has_class)
    }

    /// Only best-effort references with an unknown owner
    pub fn without_classes(&self) -> MemberReferences {
        self.filtered(|r| !r.has_class())
    }

    fn filtered(&self, keep: impl Fn(&MemberReference) -> bool) -> MemberReferences {
        Self::new(self.references.iter().filter(|r| keep(r)).cloned().collect())
    }
}

impl IntoIterator for MemberReferences {
    type Item = MemberReference;
    type IntoIter = std::vec::IntoIter<MemberReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.into_iter()
    }
}

impl<'a> IntoIterator for &'a MemberReferences {
    type Item = &'a MemberReference;
    type IntoIter = std::slice::Iter<'a, MemberReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(start: u32, owner: Option<&str>) -> MemberReference {
        MemberReference {
            name: MemberName::new("foo").unwrap(),
            range: TextRange::at(TextSize::new(start), TextSize::new(3)),
            owning_class: owner.map(|o| ClassName::new(o).unwrap()),
            kind: MemberKind::Method,
            is_declaration: false,
        }
    }

    #[test]
    fn test_class_filters() {
        let refs = MemberReferences::new(vec![
            reference(0, Some("A")),
            reference(10, None),
            reference(20, Some("B")),
        ]);

        assert_eq!(refs.len(), 3);
        let known: Vec<u32> = refs.with_classes().iter().map(|r| r.start().into()).collect();
        assert_eq!(known, vec![0, 20]);
        let unknown = refs.without_classes();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown.as_slice()[0].end(), TextSize::new(13));
    }

    #[test]
    fn test_iteration() {
        let refs = MemberReferences::new(vec![reference(0, None), reference(5, None)]);
        assert_eq!((&refs).into_iter().count(), 2);
        let owned: Vec<MemberReference> = refs.into_iter().collect();
        assert_eq!(owned[1].start(), TextSize::new(5));
        assert!(MemberReferences::default().is_empty());
    }
}
