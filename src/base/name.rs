//! Class and member names.
//!
//! PHP class names are namespace paths separated by `\`. A [`ClassName`] is always
//! stored fully qualified and without the leading separator, so `\App\User` and
//! `App\User` compare equal.

use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing a name from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,
    #[error("Invalid name segment `{segment}` in `{name}`")]
    InvalidSegment { name: String, segment: String },
}

/// A fully-qualified class-like name (class, interface, trait or enum).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassName(SmolStr);

impl ClassName {
    /// Parse a class name, validating each namespace segment.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed = name.trim().trim_start_matches('\\');
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        for segment in trimmed.split('\\') {
            if !is_identifier(segment) {
                return Err(NameError::InvalidSegment {
                    name: name.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self(SmolStr::new(trimmed)))
    }

    /// Build a name from text the parser has already tokenized as a name.
    pub(crate) fn from_syntax(name: &str) -> Self {
        Self(SmolStr::new(name.trim_start_matches('\\')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment, e.g. `User` for `App\Models\User`.
    pub fn short_name(&self) -> &str {
        self.0.rsplit('\\').next().unwrap_or(&self.0)
    }

    /// The namespace part, e.g. `App\Models` for `App\Models\User`.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rfind('\\').map(|idx| &self.0[..idx])
    }

    /// Append a relative name to this one (used to prefix namespaces).
    pub fn join(&self, relative: &str) -> Self {
        Self(SmolStr::new(format!("{}\\{}", self.0, relative.trim_start_matches('\\'))))
    }

    /// PHP class names are case-insensitive.
    pub fn eq_ignore_case(&self, other: &ClassName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ClassName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The name of a method, property or class constant.
///
/// Property names never include the `$` sigil: the declaration `public $title`
/// and the access `$post->title` both have the member name `title`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberName(SmolStr);

impl MemberName {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed = name.trim().trim_start_matches('$');
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if !is_identifier(trimmed) {
            return Err(NameError::InvalidSegment {
                name: name.to_string(),
                segment: trimmed.to_string(),
            });
        }
        Ok(Self(SmolStr::new(trimmed)))
    }

    pub(crate) fn from_syntax(name: &str) -> Self {
        Self(SmolStr::new(name.trim_start_matches('$')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MemberName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MemberName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// PHP identifiers: a letter or underscore followed by letters, digits or underscores.
/// Non-ASCII characters follow Unicode XID rules.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || unicode_ident::is_xid_continue(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_strips_leading_separator() {
        let name = ClassName::new("\\Foobar\\Barfoo\\FooFoo").unwrap();
        assert_eq!(name.as_str(), "Foobar\\Barfoo\\FooFoo");
        assert_eq!(name.short_name(), "FooFoo");
        assert_eq!(name.namespace(), Some("Foobar\\Barfoo"));
    }

    #[test]
    fn test_class_name_single_segment() {
        let name = ClassName::new("Foobar").unwrap();
        assert_eq!(name.to_string(), "Foobar");
        assert_eq!(name.namespace(), None);
    }

    #[test]
    fn test_class_name_rejects_empty() {
        let err = ClassName::new("").unwrap_err();
        assert_eq!(err, NameError::Empty);
        assert_eq!(err.to_string(), "Name cannot be empty");
    }

    #[test]
    fn test_class_name_rejects_bad_segment() {
        assert!(matches!(
            ClassName::new("App\\1Invalid"),
            Err(NameError::InvalidSegment { .. })
        ));
        assert!(ClassName::new("App\\\\User").is_err());
    }

    #[test]
    fn test_class_name_join() {
        let ns = ClassName::new("App").unwrap();
        assert_eq!(ns.join("Models\\User").as_str(), "App\\Models\\User");
    }

    #[test]
    fn test_member_name_strips_sigil() {
        assert_eq!(MemberName::new("$title").unwrap().as_str(), "title");
        assert!(MemberName::new("title").unwrap() == *"title");
        assert!(MemberName::new("$").is_err());
        assert!(MemberName::new("foo-bar").is_err());
    }
}
