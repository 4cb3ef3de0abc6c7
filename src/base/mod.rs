//! Foundation types for the class mover toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ClassName`] - Fully-qualified class, interface, trait or enum names
//! - [`MemberName`] - Names of methods, properties and class constants
//! - [`MemberKind`] - Method, property or constant
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//!
//! This module has NO dependencies on other classmover modules.

mod line_index;
mod member_kind;
mod name;

pub use line_index::{LineCol, LineIndex};
pub use member_kind::MemberKind;
pub use name::{ClassName, MemberName, NameError};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
