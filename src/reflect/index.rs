//! In-memory index of class-likes declared in PHP sources.

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::base::{ClassName, MemberKind, MemberName};
use crate::parser::{AstNode, ClassLike, ClassLikeKind, NameResolver, SourceFile, SyntaxNode};

use super::class::{ClassKind, ReflectedMember, ReflectionClass};
use super::types::{DeclaredType, Type, declared_type};
use super::ReflectError;

/// A member as declared in a class-like body
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MemberInfo {
    pub(crate) kind: MemberKind,
    pub(crate) name: MemberName,
    pub(crate) is_static: bool,
    pub(crate) ty: DeclaredType,
}

/// What one class-like declaration says about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassInfo {
    pub(crate) name: ClassName,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<ClassName>,
    /// `implements` for classes and enums, `extends` for interfaces
    pub(crate) interfaces: Vec<ClassName>,
    pub(crate) traits: Vec<ClassName>,
    pub(crate) members: Vec<MemberInfo>,
}

impl ClassInfo {
    /// Extract every named class-like declared in a parsed file
    pub(crate) fn extract_all(root: &SyntaxNode) -> Vec<ClassInfo> {
        let Some(file) = SourceFile::cast(root.clone()) else {
            return Vec::new();
        };
        let resolver = NameResolver::new(root);
        file.class_likes()
            .filter_map(|class| Self::extract(&class, &resolver))
            .collect()
    }

    fn extract(class: &ClassLike, resolver: &NameResolver) -> Option<ClassInfo> {
        let name = resolver.class_name(class)?;
        let kind = ClassKind::from(class.kind());
        let resolve_all = |names: Vec<crate::parser::NameRef>| -> Vec<ClassName> {
            names.iter().filter_map(|n| resolver.resolve_name_ref(n)).collect()
        };

        let (parent, interfaces) = match class.kind() {
            ClassLikeKind::Interface => (None, resolve_all(class.extends())),
            _ => (
                class.extends().first().and_then(|n| resolver.resolve_name_ref(n)),
                resolve_all(class.implements()),
            ),
        };
        let traits = resolve_all(class.trait_names());

        let mut members = Vec::new();
        for method in class.methods() {
            let Some(method_name) = method.name() else {
                continue;
            };
            let ty = declared_type(
                method.return_type().and_then(|r| r.type_ref()),
                &method,
                "@return",
                None,
                resolver,
                Some(&name),
            );
            members.push(MemberInfo {
                kind: MemberKind::Method,
                name: MemberName::from_syntax(&method_name),
                is_static: method.is_static(),
                ty,
            });

            for param in method.promoted_params() {
                let Some(var) = param.variable_token() else {
                    continue;
                };
                let ty = declared_type(param.type_ref(), &param, "@var", None, resolver, Some(&name));
                members.push(MemberInfo {
                    kind: MemberKind::Property,
                    name: MemberName::from_syntax(var.text()),
                    is_static: false,
                    ty,
                });
            }
        }

        for property in class.properties() {
            for element in property.elements() {
                let Some(var) = element.variable_token() else {
                    continue;
                };
                let ty = declared_type(
                    property.type_ref(),
                    &property,
                    "@var",
                    Some(var.text()),
                    resolver,
                    Some(&name),
                );
                members.push(MemberInfo {
                    kind: MemberKind::Property,
                    name: MemberName::from_syntax(var.text()),
                    is_static: property.is_static(),
                    ty,
                });
            }
        }

        for constant in class.constants() {
            for element in constant.elements() {
                if let Some(token) = element.name_token() {
                    members.push(MemberInfo {
                        kind: MemberKind::Constant,
                        name: MemberName::from_syntax(token.text()),
                        is_static: true,
                        ty: DeclaredType::unknown(),
                    });
                }
            }
        }

        // Enum cases are constants whose value is an instance of the enum.
        for case in class.enum_cases() {
            if let Some(token) = case.name_token() {
                members.push(MemberInfo {
                    kind: MemberKind::Constant,
                    name: MemberName::from_syntax(token.text()),
                    is_static: true,
                    ty: DeclaredType::of(Type::Class(name.clone())),
                });
            }
        }

        trace!(class = %name, members = members.len(), "extracted class");
        Some(ClassInfo {
            name,
            kind,
            parent,
            interfaces,
            traits,
            members,
        })
    }
}

fn key(name: &ClassName) -> SmolStr {
    SmolStr::new(name.as_str().to_ascii_lowercase())
}

/// Class-likes keyed by lower-cased fully-qualified name, in insertion order
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassIndex {
    classes: IndexMap<SmolStr, ClassInfo>,
}

impl ClassIndex {
    pub(crate) fn from_root(root: &SyntaxNode) -> Self {
        let mut index = Self::default();
        for info in ClassInfo::extract_all(root) {
            index.insert(info);
        }
        index
    }

    /// Insert a class; a later declaration of the same name replaces the earlier one
    pub(crate) fn insert(&mut self, info: ClassInfo) {
        if let Some(previous) = self.classes.insert(key(&info.name), info) {
            debug!(class = %previous.name, "class redeclared, keeping latest");
        }
    }

    pub(crate) fn get(&self, name: &ClassName) -> Option<&ClassInfo> {
        self.classes.get(&key(name))
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &ClassName> {
        self.classes.values().map(|c| &c.name)
    }

    pub(crate) fn len(&self) -> usize {
        self.classes.len()
    }
}

/// Build a reflection snapshot, looking classes up in each index in turn
pub(crate) fn reflect(
    name: &ClassName,
    layers: &[&ClassIndex],
) -> Result<ReflectionClass, ReflectError> {
    let find = |n: &ClassName| layers.iter().find_map(|index| index.get(n));
    let info = find(name).ok_or_else(|| ReflectError::ClassNotFound(name.clone()))?;

    let mut builder = ReflectionClass::builder(info.name.clone(), info.kind);
    let mut seen: FxHashSet<SmolStr> = FxHashSet::default();
    seen.insert(key(&info.name));

    // Superclass chain
    let mut chain = vec![info];
    let mut cursor = info.parent.clone();
    while let Some(parent) = cursor {
        if !seen.insert(key(&parent)) {
            warn!(class = %info.name, parent = %parent, "inheritance cycle");
            break;
        }
        builder = builder.ancestor(parent.clone());
        match find(&parent) {
            Some(parent_info) => {
                cursor = parent_info.parent.clone();
                chain.push(parent_info);
            }
            None => {
                debug!(class = %info.name, parent = %parent, "parent class not indexed");
                cursor = None;
            }
        }
    }

    // Interfaces, breadth first: direct ones in declaration order, then inherited
    let mut interface_infos = Vec::new();
    let mut queue: VecDeque<ClassName> = chain
        .iter()
        .flat_map(|c| c.interfaces.iter().cloned())
        .collect();
    while let Some(interface) = queue.pop_front() {
        if !seen.insert(key(&interface)) {
            continue;
        }
        builder = builder.interface(interface.clone());
        if let Some(interface_info) = find(&interface) {
            queue.extend(interface_info.interfaces.iter().cloned());
            interface_infos.push(interface_info);
        }
    }

    // Members: own, then traits, then each superclass (with its traits)
    for class in &chain {
        builder = add_members(builder, class);
        let mut trait_seen = FxHashSet::default();
        let mut traits: VecDeque<ClassName> = class.traits.iter().cloned().collect();
        while let Some(trait_name) = traits.pop_front() {
            if !trait_seen.insert(key(&trait_name)) {
                continue;
            }
            if let Some(trait_info) = find(&trait_name) {
                builder = add_members(builder, trait_info);
                traits.extend(trait_info.traits.iter().cloned());
            }
        }
    }
    if info.kind == ClassKind::Interface {
        for interface in interface_infos {
            builder = add_members(builder, interface);
        }
    }

    Ok(builder.build())
}

fn add_members(
    mut builder: super::class::ReflectionClassBuilder,
    class: &ClassInfo,
) -> super::class::ReflectionClassBuilder {
    for member in &class.members {
        builder = builder.reflected_member(ReflectedMember {
            kind: member.kind,
            name: member.name.clone(),
            declaring_class: class.name.clone(),
            is_static: member.is_static,
            ty: member.ty.ty.clone(),
            late_static: member.ty.late_static,
        });
    }
    builder
}
