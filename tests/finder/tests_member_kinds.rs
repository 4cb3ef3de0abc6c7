//! Methods, properties and constants never overlap.

use classmover::{ClassMemberQuery, MemberKind, TextRange};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::search_helpers::*;

fn ranges(source: &str, query: &ClassMemberQuery) -> Vec<TextRange> {
    let reflector = reflector_for(source);
    let (refs, _) = search(&reflector, source, query);
    refs.iter().map(|r| r.range).collect()
}

#[test]
fn test_property_read_and_method_call_split_by_kind() {
    let methods = ranges(JOB, &member_query("handler").only_methods());
    let properties = ranges(JOB, &member_query("handler").only_properties());

    assert_eq!(methods.len(), 1, "only `$this->handler()` is a method use");
    assert_eq!(properties.len(), 2, "the declaration and `$this->handler`");
    assert!(methods.iter().all(|m| !properties.contains(m)));
}

#[test]
fn test_unrestricted_kind_is_the_union() {
    let all = ranges(JOB, &member_query("handler"));
    let mut split = ranges(JOB, &member_query("handler").only_methods());
    split.extend(ranges(JOB, &member_query("handler").only_properties()));
    split.sort_by_key(|r| r.start());
    assert_eq!(all, split);
}

#[test]
fn test_property_declaration_span_skips_dollar() {
    let (refs, _) = search(
        reflector_for(JOB),
        JOB,
        &query("Job", "handler").only_properties(),
    );
    let declaration = refs.iter().find(|r| r.is_declaration).unwrap();
    assert_eq!(&JOB[declaration.range], "handler");
    assert_eq!(declaration.kind, MemberKind::Property);
}

#[rstest]
#[case::class_constant("Status", "ACTIVE", 2)]
#[case::enum_case("Suit", "Hearts", 2)]
#[case::other_enum_case("Suit", "Spades", 1)]
#[case::class_keyword_is_not_a_constant("Status", "class", 0)]
fn test_constants(
    #[case] class: &str,
    #[case] member: &str,
    #[case] count: usize,
) {
    let (refs, _) = search(
        reflector_for(STATUS),
        STATUS,
        &query(class, member).only_constants(),
    );
    assert_eq!(refs.len(), count);
    assert!(refs.iter().all(|r| r.kind == MemberKind::Constant));
    assert!(refs.iter().all(|r| &STATUS[r.range] == member));
}

#[test]
fn test_self_constant_inside_class() {
    let (refs, _) = search(
        reflector_for(JOB),
        JOB,
        &query("Job", "QUEUE").only_constants(),
    );
    assert_eq!(
        summarize(&refs, JOB),
        expected(&[("QUEUE", Some("Job")), ("QUEUE", Some("Job"))])
    );
}
