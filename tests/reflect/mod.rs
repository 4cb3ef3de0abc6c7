//! Reflection tests against real source trees

pub mod tests_source_reflector;
