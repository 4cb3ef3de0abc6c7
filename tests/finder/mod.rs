//! Member search tests
//!
//! Tests for:
//! - Declarations and call sites across a class hierarchy
//! - Static access spans
//! - Member kinds (methods, properties, constants)
//! - Interface retargeting
//! - Namespaces and imports

pub mod tests_find_members;
pub mod tests_interfaces;
pub mod tests_member_kinds;
pub mod tests_namespaces;
