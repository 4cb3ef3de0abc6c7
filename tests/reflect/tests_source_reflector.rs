//! SourceReflector over files on disk.

use std::fs;

use classmover::{ClassName, MemberFinder, Reflector, SourceReflector, TextSize, Type};
use tempfile::TempDir;

use crate::helpers::fixtures::*;
use crate::helpers::search_helpers::*;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Models")).unwrap();
    fs::create_dir_all(dir.path().join("Http")).unwrap();
    fs::write(dir.path().join("Models/Post.php"), MODELS).unwrap();
    fs::write(dir.path().join("Http/PostController.php"), CONTROLLER).unwrap();
    fs::write(dir.path().join("README.md"), "class NotPhp {}").unwrap();
    dir
}

fn offset_after(source: &str, needle: &str) -> TextSize {
    TextSize::from((source.find(needle).unwrap() + needle.len()) as u32)
}

#[test]
fn test_load_directory_indexes_php_files() {
    let dir = project();
    let mut reflector = SourceReflector::new();
    let count = reflector.load_directory(dir.path()).unwrap();

    assert_eq!(count, 3);
    let names: Vec<&str> = reflector.class_names().map(ClassName::as_str).collect();
    assert!(names.contains(&"App\\Models\\Post"));
    assert!(names.contains(&"App\\Http\\PostController"));
    assert!(!names.contains(&"NotPhp"));
}

#[test]
fn test_search_against_loaded_directory() {
    let dir = project();
    let mut reflector = SourceReflector::new();
    reflector.load_directory(dir.path()).unwrap();

    let source = fs::read_to_string(dir.path().join("Http/PostController.php")).unwrap();
    let refs = MemberFinder::new(&reflector)
        .find_members(&source, &query("App\\Models\\Post", "publish"))
        .unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(&source[refs.as_slice()[0].range], "publish");
}

#[test]
fn test_resolve_type_of_receivers() {
    let reflector = reflector_for(SUBCLASS_CALL);
    let receiver_end = offset_after(SUBCLASS_CALL, "$b->") - TextSize::of("->");
    let ty = reflector.resolve_type(SUBCLASS_CALL, receiver_end);
    assert_eq!(ty, Type::Class(ClassName::new("B").unwrap()));

    let receiver_end = offset_after(CONTROLLER, "$post->") - TextSize::of("->");
    let ty = MODELS_REFLECTOR.resolve_type(CONTROLLER, receiver_end);
    assert_eq!(ty.class_name().map(ClassName::as_str), Some("App\\Models\\Post"));
}

#[test]
fn test_reflect_class_hierarchy() {
    let post = MODELS_REFLECTOR
        .reflect_class(&ClassName::new("app\\models\\post").unwrap())
        .unwrap();
    assert!(post.is_instance_of(&ClassName::new("App\\Models\\Model").unwrap()));
    assert!(post.has_member(None, "find"));
    assert!(post.has_member(None, "publish"));

    let missing = MODELS_REFLECTOR.reflect_class(&ClassName::new("App\\Missing").unwrap());
    assert!(missing.is_err());
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut reflector = SourceReflector::new();
    assert!(reflector.load_directory(dir.path().join("absent")).is_err());
    assert!(reflector.is_empty());
}
