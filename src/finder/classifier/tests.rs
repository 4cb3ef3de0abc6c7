use rstest::rstest;

use crate::base::{MemberKind, MemberName};
use crate::finder::diagnostics::{CollectingSink, Severity, codes};
use crate::finder::tests::{StubReflector, class, class_name, query};
use crate::finder::{ClassMemberQuery, MemberFinder, MemberReference};
use crate::reflect::ClassKind;

fn method(name: &str) -> MemberName {
    MemberName::new(name).unwrap()
}

/// Run a search and return (matched text, owning class) pairs plus the sink.
fn search(
    reflector: StubReflector,
    source: &str,
    query: &ClassMemberQuery,
) -> (Vec<(String, Option<String>)>, CollectingSink) {
    let sink = CollectingSink::new();
    let refs = MemberFinder::new(reflector)
        .with_sink(&sink)
        .find_members(source, query)
        .unwrap();
    let found = refs
        .iter()
        .map(|r: &MemberReference| {
            (
                source[r.range].to_string(),
                r.owning_class.as_ref().map(|c| c.to_string()),
            )
        })
        .collect();
    (found, sink)
}

fn owned(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
    pairs
        .iter()
        .map(|(text, owner)| (text.to_string(), owner.map(str::to_string)))
        .collect()
}

// ---------------------------------------------------------------------------
// Static access
// ---------------------------------------------------------------------------

#[test]
fn test_static_access_matches_target_textually() {
    let source = r#"<?php
        namespace App;
        class A { function f() { self::make(); static::make(); } }
        A::make(); \App\A::make(); B::make();
    "#;
    let (found, _) = search(StubReflector::new(), source, &query("App\\A", "make").only_methods());
    assert_eq!(
        found,
        owned(&[
            ("make", Some("App\\A")),
            ("make", Some("App\\A")),
            ("make", Some("App\\A")),
            ("make", Some("App\\A")),
        ])
    );
}

#[test]
fn test_static_access_ignores_subclasses() {
    // `Child::create()` may resolve to `Base::create`, but is not followed
    let reflector = StubReflector::new()
        .with_class(class("Child", ClassKind::Class).ancestor(class_name("Base")).build());
    let (found, _) = search(reflector, "<?php Child::create();", &query("Base", "create"));
    assert!(found.is_empty());
}

#[test]
fn test_static_access_parent_qualifier() {
    let source = "<?php class B extends A { function f() { parent::boot(); } }";
    let (found, _) = search(StubReflector::new(), source, &query("A", "boot"));
    assert_eq!(found, owned(&[("boot", Some("A"))]));
}

#[test]
fn test_static_access_through_expression_is_rejected() {
    let (found, sink) = search(
        StubReflector::new(),
        "<?php $obj::VERSION;",
        &ClassMemberQuery::new().only_constants(),
    );
    assert!(found.is_empty());
    assert!(sink.has_code(codes::DYNAMIC_QUALIFIER));
}

#[test]
fn test_static_property_range_excludes_dollar() {
    let (found, _) = search(
        StubReflector::new(),
        "<?php Config::$cache = [];",
        &query("Config", "cache").only_properties(),
    );
    assert_eq!(found, owned(&[("cache", Some("Config"))]));
}

// ---------------------------------------------------------------------------
// Instance access
// ---------------------------------------------------------------------------

#[rstest]
#[case::unknown_with_name(
    ClassMemberQuery::new().with_member(method("run")),
    vec![]
)]
#[case::unknown_without_name(
    ClassMemberQuery::new().only_methods(),
    vec![("run", None)]
)]
#[case::unknown_with_target_only(
    ClassMemberQuery::new().with_class(class_name("Job")).only_methods(),
    vec![("run", None)]
)]
fn test_unknown_receiver_policy(
    #[case] query: ClassMemberQuery,
    #[case] expected: Vec<(&str, Option<&str>)>,
) {
    let (found, sink) = search(StubReflector::new(), "<?php $job->run();", &query);
    assert_eq!(found, owned(&expected));
    assert!(sink.is_empty());
}

#[test]
fn test_primitive_receiver_is_rejected() {
    let reflector = StubReflector::new().with_primitive("$name", "string");
    let (found, _) = search(reflector, "<?php $name->length();", &ClassMemberQuery::new());
    assert!(found.is_empty());
}

#[test]
fn test_known_receiver_without_target() {
    let reflector = StubReflector::new().with_type("$job", "App\\Job");
    let (found, sink) = search(
        reflector,
        "<?php $job->run();",
        &ClassMemberQuery::new().with_member(method("run")),
    );
    assert_eq!(found, owned(&[("run", Some("App\\Job"))]));
    assert!(sink.is_empty());
}

#[test]
fn test_receiver_in_target_hierarchy() {
    let reflector = StubReflector::new()
        .with_type("$mail", "SendMail")
        .with_type("$log", "Logger")
        .with_class(class("SendMail", ClassKind::Class).ancestor(class_name("Job")).build())
        .with_class(class("Logger", ClassKind::Class).build());
    let (found, _) = search(reflector, "<?php $mail->run(); $log->run();", &query("Job", "run"));
    assert_eq!(found, owned(&[("run", Some("SendMail"))]));
}

#[test]
fn test_unreflectable_receiver_is_accepted_with_warning() {
    let reflector = StubReflector::new().with_type("$job", "Vendor\\Job");
    let (found, sink) = search(reflector, "<?php $job->run();", &query("Job", "run"));
    assert_eq!(found, owned(&[("run", Some("Vendor\\Job"))]));
    assert!(sink.has_code(codes::UNVERIFIED_MATCH));
}

#[test]
fn test_dynamic_member_name_is_reported() {
    let (found, sink) = search(
        StubReflector::new(),
        "<?php $job->{$method}();",
        &ClassMemberQuery::new(),
    );
    assert!(found.is_empty());
    assert!(sink.has_code(codes::DYNAMIC_MEMBER_NAME));
}

#[test]
fn test_method_and_property_never_overlap() {
    let source = "<?php $this->handler; $this->handler();";
    let reflector = StubReflector::new().with_type("$this", "Job");
    let named = ClassMemberQuery::new().with_member(method("handler"));
    let (methods, _) = search(reflector, source, &named.clone().only_methods());
    let reflector = StubReflector::new().with_type("$this", "Job");
    let (properties, _) = search(reflector, source, &named.only_properties());
    assert_eq!(methods.len(), 1);
    assert_eq!(properties.len(), 1);
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

const DECLARATIONS: &str = r#"<?php
namespace App;
class Base { public function save() {} }
class Post extends Base { public function save() {} }
class Unrelated { public function save() {} }
trait Saves { public function save() {} }
"#;

fn hierarchy() -> StubReflector {
    StubReflector::new()
        .with_class(
            class("App\\Base", ClassKind::Class)
                .member(MemberKind::Method, method("save"))
                .build(),
        )
        .with_class(
            class("App\\Post", ClassKind::Class)
                .ancestor(class_name("App\\Base"))
                .member(MemberKind::Method, method("save"))
                .build(),
        )
        .with_class(class("App\\Unrelated", ClassKind::Class).build())
        .with_class(class("App\\Saves", ClassKind::Trait).build())
}

#[test]
fn test_declarations_without_target() {
    let (found, _) = search(
        StubReflector::new(),
        DECLARATIONS,
        &ClassMemberQuery::new().with_member(method("save")),
    );
    let owners: Vec<_> = found.into_iter().filter_map(|(_, owner)| owner).collect();
    assert_eq!(owners, vec!["App\\Base", "App\\Post", "App\\Unrelated", "App\\Saves"]);
}

#[test]
fn test_declarations_in_target_hierarchy_and_traits() {
    let (found, _) = search(hierarchy(), DECLARATIONS, &query("App\\Base", "save"));
    assert_eq!(
        found,
        owned(&[
            ("save", Some("App\\Base")),
            ("save", Some("App\\Post")),
            ("save", Some("App\\Saves")),
        ])
    );
}

#[test]
fn test_declaration_in_unknown_class_is_rejected() {
    let reflector = StubReflector::new()
        .with_class(class("App\\Base", ClassKind::Class).member(MemberKind::Method, method("save")).build());
    let (found, sink) = search(reflector, DECLARATIONS, &query("App\\Base", "save"));
    assert_eq!(found, owned(&[("save", Some("App\\Base"))]));
    assert!(sink.has_code(codes::CLASS_NOT_FOUND));
}

#[test]
fn test_declaration_without_name_is_reported() {
    let (found, sink) = search(
        StubReflector::new(),
        "<?php class A { public function () {} }",
        &ClassMemberQuery::new().only_methods(),
    );
    assert!(found.is_empty());
    assert!(sink.has_code(codes::MALFORMED_DECLARATION));
}

#[test]
fn test_declarations_in_anonymous_classes_are_skipped() {
    let (found, sink) = search(
        StubReflector::new(),
        "<?php $x = new class { public function save() {} };",
        &ClassMemberQuery::new().only_methods(),
    );
    assert!(found.is_empty());
    let diagnostics = sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Info);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::ANONYMOUS_CLASS_MEMBER));
}

// ---------------------------------------------------------------------------
// Interface retargeting
// ---------------------------------------------------------------------------

const INTERFACES: &str = r#"<?php
interface Named { public function name(); }
interface Labeled { public function name(); }
class User implements Named { public function name() {} }
"#;

fn interfaces() -> StubReflector {
    StubReflector::new()
        .with_class(
            class("Named", ClassKind::Interface)
                .member(MemberKind::Method, method("name"))
                .build(),
        )
        .with_class(
            class("Labeled", ClassKind::Interface)
                .member(MemberKind::Method, method("name"))
                .build(),
        )
        .with_class(
            class("User", ClassKind::Class)
                .interface(class_name("Named"))
                .member(MemberKind::Method, method("name"))
                .build(),
        )
}

#[test]
fn test_member_only_on_interface_retargets_declarations() {
    let reflector = interfaces().with_class(
        class("Admin", ClassKind::Class)
            .interface(class_name("Named"))
            .build(),
    );
    let (found, sink) = search(reflector, INTERFACES, &query("Admin", "name"));
    // The interface declaration and its other implementations
    assert_eq!(found, owned(&[("name", Some("Named")), ("name", Some("User"))]));
    assert!(sink.is_empty());
}

#[test]
fn test_ambiguous_interfaces_use_the_first() {
    let reflector = interfaces().with_class(
        class("Admin", ClassKind::Class)
            .interface(class_name("Labeled"))
            .interface(class_name("Named"))
            .build(),
    );
    let (found, sink) = search(reflector, INTERFACES, &query("Admin", "name"));
    assert_eq!(found, owned(&[("name", Some("Labeled"))]));
    assert!(sink.has_code(codes::AMBIGUOUS_INTERFACE));
}

#[test]
fn test_unknown_target_falls_back_to_textual_target() {
    let (found, sink) = search(interfaces(), INTERFACES, &query("Missing", "name"));
    assert!(found.is_empty());
    assert!(sink.has_code(codes::CLASS_NOT_FOUND));
}
