use std::fmt;

/// The three kinds of class member a reference can denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Constant,
}

impl MemberKind {
    pub const ALL: [MemberKind; 3] = [MemberKind::Method, MemberKind::Property, MemberKind::Constant];

    /// Whether two names of this kind denote the same member.
    ///
    /// PHP method names are case-insensitive; property and constant names are not.
    pub fn names_match(self, a: &str, b: &str) -> bool {
        match self {
            MemberKind::Method => a.eq_ignore_ascii_case(b),
            MemberKind::Property | MemberKind::Constant => a == b,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Constant => "constant",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_ignore_case() {
        assert!(MemberKind::Method.names_match("getTitle", "gettitle"));
        assert!(!MemberKind::Property.names_match("title", "Title"));
        assert!(MemberKind::Constant.names_match("MAX", "MAX"));
    }

    #[test]
    fn test_display() {
        assert_eq!(MemberKind::Property.to_string(), "property");
    }
}
