//! Search helpers for integration tests.

use classmover::{
    ClassMemberQuery, ClassName, CollectingSink, MemberFinder, MemberName, MemberReferences,
    Reflector, SourceReflector,
};

/// A reflector that knows every class declared in `source`.
pub fn reflector_for(source: &str) -> SourceReflector {
    let mut reflector = SourceReflector::new();
    reflector.add_source(source);
    reflector
}

/// Query for `member` on `class`.
pub fn query(class: &str, member: &str) -> ClassMemberQuery {
    ClassMemberQuery::new()
        .with_class(ClassName::new(class).unwrap())
        .with_member(MemberName::new(member).unwrap())
}

/// Query for `member` on any class.
pub fn member_query(member: &str) -> ClassMemberQuery {
    ClassMemberQuery::new().with_member(MemberName::new(member).unwrap())
}

/// Run a search, collecting diagnostics.
pub fn search<R: Reflector>(
    reflector: R,
    source: &str,
    query: &ClassMemberQuery,
) -> (MemberReferences, CollectingSink) {
    let sink = CollectingSink::new();
    let references = MemberFinder::new(reflector)
        .with_sink(&sink)
        .find_members(source, query)
        .unwrap();
    (references, sink)
}

/// (matched text, owning class) for each reference.
pub fn summarize(references: &MemberReferences, source: &str) -> Vec<(String, Option<String>)> {
    references
        .iter()
        .map(|r| {
            (
                source[r.range].to_string(),
                r.owning_class.as_ref().map(ToString::to_string),
            )
        })
        .collect()
}

/// Build expected `summarize` output.
pub fn expected(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
    pairs
        .iter()
        .map(|(text, owner)| (text.to_string(), owner.map(str::to_string)))
        .collect()
}
