//! End-to-end member search over parsed sources.

use classmover::{
    ClassMemberQuery, FinderOptions, MemberFinder, MemberKind, SourceReflector, TextRange,
    TextSize,
};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::search_helpers::*;

// =============================================================================
// INHERITANCE
// =============================================================================

#[test]
fn test_declaration_and_call_through_subclass() {
    let reflector = reflector_for(SUBCLASS_CALL);
    let (refs, sink) = search(&reflector, SUBCLASS_CALL, &query("A", "foo").only_methods());

    assert_eq!(refs.len(), 2, "expected declaration and call site");
    let declaration = &refs.as_slice()[0];
    let call = &refs.as_slice()[1];

    assert!(declaration.is_declaration);
    assert_eq!(usize::from(declaration.start()), SUBCLASS_CALL.find("foo").unwrap());
    assert_eq!(declaration.owning_class.as_ref().unwrap().as_str(), "A");

    assert!(!call.is_declaration);
    assert_eq!(usize::from(call.start()), SUBCLASS_CALL.rfind("foo").unwrap());
    assert_eq!(call.owning_class.as_ref().unwrap().as_str(), "B");

    assert!(refs.iter().all(|r| r.kind == MemberKind::Method));
    assert!(sink.is_empty());
}

#[test]
fn test_declarations_can_be_excluded() {
    let reflector = reflector_for(SUBCLASS_CALL);
    let finder = MemberFinder::new(&reflector).with_options(FinderOptions {
        include_declarations: false,
        ..FinderOptions::default()
    });
    let refs = finder
        .find_members(SUBCLASS_CALL, &query("A", "foo"))
        .unwrap();
    assert_eq!(summarize(&refs, SUBCLASS_CALL), expected(&[("foo", Some("B"))]));
}

#[test]
fn test_unrelated_target_finds_nothing() {
    let source = format!("{SUBCLASS_CALL} class C {{}}");
    let reflector = reflector_for(&source);
    let (refs, _) = search(&reflector, &source, &query("C", "foo"));
    assert!(refs.is_empty());
}

// =============================================================================
// STATIC ACCESS
// =============================================================================

#[test]
fn test_static_call_span_covers_member_token() {
    let (refs, _) = search(SourceReflector::new(), STATIC_CALL, &query("Foo", "bar"));

    assert_eq!(refs.len(), 1);
    let start = TextSize::from(STATIC_CALL.find("bar").unwrap() as u32);
    assert_eq!(refs.as_slice()[0].range, TextRange::at(start, TextSize::of("bar")));
    assert_eq!(refs.as_slice()[0].owning_class.as_ref().unwrap().as_str(), "Foo");
}

// =============================================================================
// MEMBER-ONLY SEARCH
// =============================================================================

#[test]
fn test_member_only_search_spans_classes() {
    let reflector = reflector_for(UNRELATED_SAVES);
    let (refs, _) = search(&reflector, UNRELATED_SAVES, &member_query("save"));

    // The call on the untyped `$unknown` is dropped when a member name is given
    assert_eq!(
        summarize(&refs, UNRELATED_SAVES),
        expected(&[
            ("save", Some("Post")),
            ("save", Some("Comment")),
            ("save", Some("Post")),
            ("save", Some("Comment")),
        ])
    );
}

#[test]
fn test_search_without_member_name_keeps_unknown_receivers() {
    let reflector = reflector_for(UNRELATED_SAVES);
    let (refs, _) = search(
        &reflector,
        UNRELATED_SAVES,
        &ClassMemberQuery::new().only_methods(),
    );

    assert_eq!(refs.len(), 5);
    assert_eq!(refs.without_classes().len(), 1);
    assert_eq!(refs.with_classes().len(), 4);
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[rstest]
#[case::subclass(SUBCLASS_CALL, query("A", "foo"))]
#[case::member_only(UNRELATED_SAVES, member_query("save"))]
#[case::interfaces(RUNNABLE, query("Task", "run"))]
#[case::everything(JOB, ClassMemberQuery::new())]
fn test_repeated_searches_are_identical(#[case] source: &str, #[case] query: ClassMemberQuery) {
    let reflector = reflector_for(source);
    let finder = MemberFinder::new(&reflector);

    let first = finder.find_members(source, &query).unwrap();
    let second = finder.find_members(source, &query).unwrap();
    assert_eq!(first, second);

    let starts: Vec<TextSize> = first.iter().map(|r| r.start()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted, "references must be in document order");
}

#[test]
fn test_concurrent_searches_share_one_reflector() {
    let reflector = reflector_for(UNRELATED_SAVES);
    let finder = MemberFinder::new(&reflector);
    let query = member_query("save");
    let baseline = finder.find_members(UNRELATED_SAVES, &query).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| finder.find_members(UNRELATED_SAVES, &query).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), baseline);
        }
    });
}

// =============================================================================
// FORMATTING
// =============================================================================

#[test]
fn test_spaced_call_parentheses() {
    let source = "<?php class A { public function foo( $x ){} } $b = new A(); \
                  $b->foo( 1 ); if ( $b ) { $b->foo(2); }";
    let reflector = reflector_for(source);
    let (refs, sink) = search(&reflector, source, &query("A", "foo").only_methods());

    let starts: Vec<usize> = refs.iter().map(|r| usize::from(r.start())).collect();
    let expected: Vec<usize> = source.match_indices("foo").map(|(i, _)| i).collect();
    assert_eq!(starts, expected);
    assert!(sink.is_empty());
}

#[test]
fn test_source_with_open_tag_and_comments() {
    let source = "<?php\n// Entry point\n/** @var A $b */\n$b = make();\nFoo::bar();\n$b->foo();\n";
    let (refs, _) = search(reflector_for(SUBCLASS_CALL), source, &query("A", "foo"));
    assert_eq!(summarize(&refs, source), expected(&[("foo", Some("A"))]));
}
