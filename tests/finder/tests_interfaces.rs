//! Members inherited from interfaces.

use classmover::finder::diagnostics::codes;

use crate::helpers::fixtures::*;
use crate::helpers::search_helpers::*;

#[test]
fn test_interface_member_found_through_implementing_class() {
    let reflector = reflector_for(RUNNABLE);
    let (refs, sink) = search(&reflector, RUNNABLE, &query("Task", "run").only_methods());

    // `Other::run` has the same name but is outside the hierarchy
    assert_eq!(
        summarize(&refs, RUNNABLE),
        expected(&[("run", Some("Runnable")), ("run", Some("Task"))])
    );
    assert!(refs.as_slice()[0].is_declaration);
    assert!(sink.is_empty());
}

#[test]
fn test_interface_target_matches_implementations() {
    let source =
        format!("{RUNNABLE} class Job implements Runnable {{ public function run() {{}} }}");
    let reflector = reflector_for(&source);
    let (refs, _) = search(&reflector, &source, &query("Runnable", "run").only_methods());

    let owners: Vec<Option<String>> = summarize(&refs, &source)
        .into_iter()
        .map(|(_, owner)| owner)
        .collect();
    assert_eq!(
        owners,
        vec![
            Some("Runnable".to_string()),
            Some("Task".to_string()),
            Some("Job".to_string()),
        ]
    );
}

#[test]
fn test_several_declaring_interfaces_pick_the_first() {
    let source = r#"<?php
interface Named { public function name(); }
interface Labeled { public function name(); }
abstract class Tag implements Labeled, Named {}
"#;
    let reflector = reflector_for(source);
    let (refs, sink) = search(&reflector, source, &query("Tag", "name"));

    assert_eq!(summarize(&refs, source), expected(&[("name", Some("Labeled"))]));
    assert!(sink.has_code(codes::AMBIGUOUS_INTERFACE));
}

#[test]
fn test_missing_target_is_reported() {
    let reflector = reflector_for(RUNNABLE);
    let (refs, sink) = search(&reflector, RUNNABLE, &query("Unknown", "run"));

    assert!(refs.is_empty());
    assert!(sink.has_code(codes::CLASS_NOT_FOUND));
}
