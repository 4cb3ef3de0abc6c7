//! Name resolution across namespaces and imports.

use classmover::ClassMemberQuery;

use crate::helpers::fixtures::*;
use crate::helpers::search_helpers::*;

#[test]
fn test_imported_parameter_type() {
    let (refs, sink) = search(
        &*MODELS_REFLECTOR,
        CONTROLLER,
        &query("App\\Models\\Post", "publish"),
    );
    assert_eq!(
        summarize(&refs, CONTROLLER),
        expected(&[("publish", Some("App\\Models\\Post"))])
    );
    assert!(sink.is_empty());
}

#[test]
fn test_imported_static_qualifier() {
    let (refs, _) = search(
        &*MODELS_REFLECTOR,
        CONTROLLER,
        &query("App\\Models\\Post", "find"),
    );
    assert_eq!(
        summarize(&refs, CONTROLLER),
        expected(&[("find", Some("App\\Models\\Post"))])
    );
}

#[test]
fn test_static_access_does_not_follow_inheritance() {
    // `Post::find` resolves to `Model::find` at runtime but names `Post`
    let (refs, _) = search(
        &*MODELS_REFLECTOR,
        CONTROLLER,
        &query("App\\Models\\Model", "find"),
    );
    assert!(refs.is_empty());
}

#[test]
fn test_leading_backslash_is_ignored() {
    let (refs, _) = search(
        &*MODELS_REFLECTOR,
        CONTROLLER,
        &query("\\App\\Models\\Post", "publish"),
    );
    assert_eq!(refs.len(), 1);
}

#[test]
fn test_declarations_in_namespaced_file() {
    let target = classmover::ClassName::new("App\\Models\\Post").unwrap();
    let (refs, _) = search(
        &*MODELS_REFLECTOR,
        MODELS,
        &ClassMemberQuery::new().with_class(target),
    );
    // `Model::find` is declared on a superclass of the target
    assert_eq!(
        summarize(&refs, MODELS),
        expected(&[("publish", Some("App\\Models\\Post"))])
    );
}

#[test]
fn test_grouped_import_static_qualifier() {
    let source = "<?php use App\\Models\\{Post, Model as Base}; Post::find(1); Base::find(2);";
    let (refs, _) = search(&*MODELS_REFLECTOR, source, &query("App\\Models\\Post", "find"));
    assert_eq!(
        summarize(&refs, source),
        expected(&[("find", Some("App\\Models\\Post"))])
    );

    let (refs, _) = search(&*MODELS_REFLECTOR, source, &query("App\\Models\\Model", "find"));
    assert_eq!(
        summarize(&refs, source),
        expected(&[("find", Some("App\\Models\\Model"))])
    );
}
