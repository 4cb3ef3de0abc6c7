//! A [`Reflector`] backed by PHP sources held in memory.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rayon::prelude::*;
use rowan::{GreenNode, TextSize};
use rustc_hash::FxHasher;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::base::ClassName;
use crate::parser::{NameResolver, SyntaxNode, parse_php};

use super::index::{ClassIndex, ClassInfo, reflect};
use super::infer::Inferrer;
use super::{ReflectError, ReflectionClass, Reflector, Type};

/// Parsed trees kept for repeated `resolve_type` calls on the same text
const CACHE_CAPACITY: usize = 32;

const PHP_EXTENSIONS: &[&str] = &["php", "phtml", "inc"];

/// A source file parsed once and reused across type queries
struct ParsedSource {
    text: Box<str>,
    green: GreenNode,
    resolver: NameResolver,
    /// Class-likes declared in this file
    local: ClassIndex,
}

impl ParsedSource {
    fn new(text: &str) -> Self {
        let root = parse_php(text).syntax();
        Self {
            text: text.into(),
            resolver: NameResolver::new(&root),
            local: ClassIndex::from_root(&root),
            green: root.green().into_owned(),
        }
    }
}

/// Class index built from PHP sources, with expression type inference.
///
/// `reflect_class` sees every class-like added through [`add_source`],
/// [`add_file`] or [`load_directory`]. `resolve_type` additionally sees
/// the class-likes declared in the source being queried.
///
/// [`add_source`]: SourceReflector::add_source
/// [`add_file`]: SourceReflector::add_file
/// [`load_directory`]: SourceReflector::load_directory
#[derive(Default)]
pub struct SourceReflector {
    index: ClassIndex,
    cache: Mutex<IndexMap<u64, Arc<ParsedSource>>>,
}

impl SourceReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the class-likes declared in `source`; returns how many were found
    pub fn add_source(&mut self, source: &str) -> usize {
        let root = parse_php(source).syntax();
        self.insert_all(ClassInfo::extract_all(&root))
    }

    /// Read and index one file
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ReflectError> {
        let infos = read_classes(path.as_ref())?;
        Ok(self.insert_all(infos))
    }

    /// Index every PHP file under `dir`, parsing in parallel.
    ///
    /// Files are inserted in path order, so when two files declare the same
    /// class the one sorting last wins.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize, ReflectError> {
        let mut paths = collect_php_files(dir.as_ref())?;
        paths.sort();

        let parsed: Vec<Vec<ClassInfo>> = paths
            .par_iter()
            .map(|path| read_classes(path))
            .collect::<Result<_, _>>()?;

        let count: usize = parsed.into_iter().map(|infos| self.insert_all(infos)).sum();
        debug!(
            dir = %dir.as_ref().display(),
            files = paths.len(),
            classes = count,
            "loaded directory"
        );
        Ok(count)
    }

    /// Names of all indexed class-likes, in insertion order
    pub fn class_names(&self) -> impl Iterator<Item = &ClassName> {
        self.index.names()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_all(&mut self, infos: Vec<ClassInfo>) -> usize {
        let count = infos.len();
        for info in infos {
            self.index.insert(info);
        }
        count
    }

    fn parsed(&self, source: &str) -> Arc<ParsedSource> {
        let mut hasher = FxHasher::default();
        source.hash(&mut hasher);
        let key = hasher.finish();

        let mut cache = self.cache.lock();
        if let Some(parsed) = cache.get(&key)
            && *parsed.text == *source
        {
            return Arc::clone(parsed);
        }

        trace!(len = source.len(), "parsing source for type inference");
        let parsed = Arc::new(ParsedSource::new(source));
        if cache.len() >= CACHE_CAPACITY && !cache.contains_key(&key) {
            cache.shift_remove_index(0);
        }
        cache.insert(key, Arc::clone(&parsed));
        parsed
    }
}

impl Reflector for SourceReflector {
    fn resolve_type(&self, source: &str, offset: TextSize) -> Type {
        if offset > TextSize::of(source) {
            return Type::Unknown;
        }
        let parsed = self.parsed(source);
        let root = SyntaxNode::new_root(parsed.green.clone());
        let lookup = |name: &ClassName| reflect(name, &[&parsed.local, &self.index]).ok();
        Inferrer::new(&parsed.resolver, &lookup).type_at(&root, offset)
    }

    fn reflect_class(&self, name: &ClassName) -> Result<ReflectionClass, ReflectError> {
        reflect(name, &[&self.index])
    }
}

fn read_classes(path: &Path) -> Result<Vec<ClassInfo>, ReflectError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReflectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_php(&text).syntax();
    Ok(ClassInfo::extract_all(&root))
}

fn collect_php_files(dir: &Path) -> Result<Vec<PathBuf>, ReflectError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let is_php = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| PHP_EXTENSIONS.iter().any(|p| p.eq_ignore_ascii_case(e)));
        if entry.file_type().is_file() && is_php {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
