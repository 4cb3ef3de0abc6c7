//! Member reference search.
//!
//! [`MemberFinder::find_members`] parses a source file, collects every node
//! that could reference the queried member ([`collector`]) and keeps those the
//! [`Reflector`] confirms ([`classifier`]).
//!
//! ```ignore
//! let mut reflector = SourceReflector::new();
//! reflector.load_directory("src")?;
//! let finder = MemberFinder::new(&reflector);
//!
//! let query = ClassMemberQuery::new()
//!     .with_class(ClassName::new("App\\Post")?)
//!     .with_member(MemberName::new("publish")?)
//!     .only_methods();
//! for reference in &finder.find_members(&source, &query)? {
//!     println!("{:?} on {:?}", reference.range, reference.owning_class);
//! }
//! ```

mod classifier;
pub mod collector;
pub mod diagnostics;
pub mod query;
pub mod reference;

use thiserror::Error;
use tracing::debug;

use crate::base::LineIndex;
use crate::parser::{NameResolver, SyntaxError, parse_php};
use crate::reflect::Reflector;

use classifier::Classifier;
use collector::CandidateCollector;

pub use collector::Candidate;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use query::ClassMemberQuery;
pub use reference::{MemberReference, MemberReferences};

/// Errors returned by [`MemberFinder::find_members`].
#[derive(Debug, Error)]
pub enum FinderError {
    /// The source has syntax errors and strict parsing was requested
    #[error("{} syntax error(s), first: {}", .0.len(), first_message(.0))]
    Syntax(Vec<SyntaxError>),
}

fn first_message(errors: &[SyntaxError]) -> String {
    errors.first().map(ToString::to_string).unwrap_or_default()
}

/// Search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderOptions {
    /// Report member declarations as well as uses
    pub include_declarations: bool,
    /// Fail on sources with syntax errors instead of searching the recovered tree
    pub strict_syntax: bool,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            include_declarations: true,
            strict_syntax: false,
        }
    }
}

/// Finds references to class members in PHP sources.
///
/// Holds no per-search state; one finder can serve any number of searches,
/// from several threads when `R` and `S` are `Sync`.
#[derive(Debug, Clone)]
pub struct MemberFinder<R, S = TracingSink> {
    reflector: R,
    sink: S,
    options: FinderOptions,
}

impl<R: Reflector> MemberFinder<R> {
    pub fn new(reflector: R) -> Self {
        Self {
            reflector,
            sink: TracingSink,
            options: FinderOptions::default(),
        }
    }
}

impl<R: Reflector, S: DiagnosticSink> MemberFinder<R, S> {
    /// Replace the diagnostic sink
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> MemberFinder<R, T> {
        MemberFinder {
            reflector: self.reflector,
            sink,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: FinderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FinderOptions {
        &self.options
    }

    pub fn reflector(&self) -> &R {
        &self.reflector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Every reference to the queried member in `source`, in document order.
    pub fn find_members(
        &self,
        source: &str,
        query: &ClassMemberQuery,
    ) -> Result<MemberReferences, FinderError> {
        let parse = parse_php(source);
        if !parse.ok() {
            if self.options.strict_syntax {
                return Err(FinderError::Syntax(parse.errors));
            }
            debug!(errors = parse.errors.len(), "searching recovered syntax tree");
        }
        let root = parse.syntax();

        let candidates =
            CandidateCollector::new(query, self.options.include_declarations).collect(&root);

        let resolver = NameResolver::new(&root);
        let line_index = LineIndex::new(source);
        let classifier = Classifier::new(
            source,
            query,
            &self.reflector,
            &self.sink,
            &resolver,
            &line_index,
        );
        let references: Vec<MemberReference> = candidates
            .iter()
            .filter_map(|candidate| classifier.classify(candidate))
            .collect();

        debug!(
            class = query.class().map(|c| c.as_str()).unwrap_or("*"),
            member = query.member().map(|m| m.as_str()).unwrap_or("*"),
            candidates = candidates.len(),
            references = references.len(),
            "member search finished"
        );
        Ok(MemberReferences::new(references))
    }
}
