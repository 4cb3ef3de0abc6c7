//! Type and class-hierarchy queries.
//!
//! The finder consumes the [`Reflector`] trait only. [`SourceReflector`] is the
//! bundled implementation: a class index built from PHP sources plus a
//! best-effort expression type inferencer.

mod class;
mod index;
mod infer;
mod source_reflector;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use rowan::TextSize;
use thiserror::Error;

use crate::base::ClassName;

pub use class::{ClassKind, ReflectedMember, ReflectionClass, ReflectionClassBuilder};
pub use source_reflector::SourceReflector;
pub use types::Type;

/// Errors raised by reflection queries.
#[derive(Debug, Error)]
pub enum ReflectError {
    /// No class-like with this name is known
    #[error("Class `{0}` not found")]
    ClassNotFound(ClassName),

    /// A source file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Oracle for static type inference and hierarchy queries.
pub trait Reflector {
    /// Static type of the expression ending at `offset` in `source`.
    ///
    /// Returns [`Type::Unknown`] when inference gives up.
    fn resolve_type(&self, source: &str, offset: TextSize) -> Type;

    /// Snapshot of a class-like and its hierarchy.
    fn reflect_class(&self, name: &ClassName) -> Result<ReflectionClass, ReflectError>;
}

impl<R: Reflector + ?Sized> Reflector for &R {
    fn resolve_type(&self, source: &str, offset: TextSize) -> Type {
        (**self).resolve_type(source, offset)
    }

    fn reflect_class(&self, name: &ClassName) -> Result<ReflectionClass, ReflectError> {
        (**self).reflect_class(name)
    }
}

impl<R: Reflector + ?Sized> Reflector for Arc<R> {
    fn resolve_type(&self, source: &str, offset: TextSize) -> Type {
        (**self).resolve_type(source, offset)
    }

    fn reflect_class(&self, name: &ClassName) -> Result<ReflectionClass, ReflectError> {
        (**self).reflect_class(name)
    }
}
