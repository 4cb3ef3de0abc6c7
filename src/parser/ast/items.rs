use super::*;

// ============================================================================
// Files, namespaces and imports
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// All class-like declarations in the file, including nested namespaces.
    pub fn class_likes(&self) -> impl Iterator<Item = ClassLike> + '_ {
        self.0.descendants().filter_map(ClassLike::cast)
    }

    pub fn functions(&self) -> impl Iterator<Item = FunctionDecl> + '_ {
        self.0.descendants().filter_map(FunctionDecl::cast)
    }
}

ast_node!(NamespaceDef, NAMESPACE_DEF);

impl NamespaceDef {
    first_child_method!(name, NameRef);
    first_child_method!(body, Block);

    /// `namespace Foo { ... }` rather than `namespace Foo;`
    pub fn is_braced(&self) -> bool {
        self.body().is_some()
    }
}

ast_node!(UseDecl, USE_DECL);

impl UseDecl {
    has_token_method!(is_function, FUNCTION_KW, "use function App\\helper;");
    has_token_method!(is_const, CONST_KW, "use const App\\VERSION;");
    children_method!(clauses, UseClause);
    children_method!(groups, UseGroup);
}

ast_node!(UseGroup, USE_GROUP);

impl UseGroup {
    first_child_method!(prefix, NameRef);
    children_method!(clauses, UseClause);
}

ast_node!(UseClause, USE_CLAUSE);

impl UseClause {
    first_child_method!(name, NameRef);

    /// The alias introduced with `as`, if any.
    pub fn alias(&self) -> Option<SyntaxToken> {
        let mut seen_as = false;
        for token in self.0.children_with_tokens().filter_map(|e| e.into_token()) {
            match token.kind() {
                SyntaxKind::AS_KW => seen_as = true,
                SyntaxKind::IDENT if seen_as => return Some(token),
                _ => {}
            }
        }
        None
    }

    /// The name this import binds locally: the alias or the last segment.
    pub fn local_name(&self) -> Option<String> {
        if let Some(alias) = self.alias() {
            return Some(alias.text().to_string());
        }
        let name = self.name()?.text();
        Some(name.rsplit('\\').next().unwrap_or(&name).to_string())
    }
}

// A name as written in source: `Foo`, `App\Foo`, `\App\Foo`, `static`, `self`
ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn text(&self) -> String {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect()
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.text().starts_with('\\')
    }

    /// `self`, `static` or `parent`
    pub fn is_relative_class(&self) -> bool {
        let text = self.text();
        ["self", "static", "parent"]
            .iter()
            .any(|kw| text.eq_ignore_ascii_case(kw))
    }
}

// ============================================================================
// Class-likes
// ============================================================================

/// Which class-like construct a declaration is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLikeKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// A `class`, `interface`, `trait` or `enum` declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassLike(pub(crate) SyntaxNode);

impl AstNode for ClassLike {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_class_like()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self(node))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl ClassLike {
    token_method!(name_token, IDENT);
    has_token_method!(is_abstract, ABSTRACT_KW, "abstract class Shape {}");
    has_token_method!(is_final, FINAL_KW, "final class Money {}");
    first_child_method!(body, ClassBody);

    pub fn kind(&self) -> ClassLikeKind {
        match self.0.kind() {
            SyntaxKind::INTERFACE_DECL => ClassLikeKind::Interface,
            SyntaxKind::TRAIT_DECL => ClassLikeKind::Trait,
            SyntaxKind::ENUM_DECL => ClassLikeKind::Enum,
            _ => ClassLikeKind::Class,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    /// Names after `extends` (one for classes, several for interfaces)
    pub fn extends(&self) -> Vec<NameRef> {
        self.clause_names(SyntaxKind::EXTENDS_CLAUSE)
    }

    /// Names after `implements`
    pub fn implements(&self) -> Vec<NameRef> {
        self.clause_names(SyntaxKind::IMPLEMENTS_CLAUSE)
    }

    fn clause_names(&self, clause: SyntaxKind) -> Vec<NameRef> {
        self.0
            .children()
            .filter(|n| n.kind() == clause)
            .flat_map(|n| n.children().filter_map(NameRef::cast).collect::<Vec<_>>())
            .collect()
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> + '_ {
        self.body().into_iter().flat_map(|b| b.methods().collect::<Vec<_>>())
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyDecl> + '_ {
        self.body().into_iter().flat_map(|b| b.properties().collect::<Vec<_>>())
    }

    pub fn constants(&self) -> impl Iterator<Item = ClassConstDecl> + '_ {
        self.body().into_iter().flat_map(|b| b.constants().collect::<Vec<_>>())
    }

    pub fn enum_cases(&self) -> impl Iterator<Item = EnumCase> + '_ {
        self.body().into_iter().flat_map(|b| b.enum_cases().collect::<Vec<_>>())
    }

    /// Traits pulled in with `use` inside the body
    pub fn trait_names(&self) -> Vec<NameRef> {
        self.body()
            .into_iter()
            .flat_map(|b| b.trait_uses().collect::<Vec<_>>())
            .flat_map(|u| u.names().collect::<Vec<_>>())
            .collect()
    }
}

ast_node!(ClassBody, CLASS_BODY);

impl ClassBody {
    children_method!(methods, MethodDecl);
    children_method!(properties, PropertyDecl);
    children_method!(constants, ClassConstDecl);
    children_method!(trait_uses, TraitUse);
    children_method!(enum_cases, EnumCase);
}

ast_node!(TraitUse, TRAIT_USE);

impl TraitUse {
    children_method!(names, NameRef);
}

// ============================================================================
// Members
// ============================================================================

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    token_method!(name_token, IDENT);
    has_token_method!(is_static, STATIC_KW, "public static function create()");
    has_token_method!(is_abstract, ABSTRACT_KW);
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
    first_child_method!(body, Block);

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    /// Parameters of a constructor that declare promoted properties
    pub fn promoted_params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.params().filter(Param::is_promoted).collect())
            .unwrap_or_default()
    }
}

ast_node!(PropertyDecl, PROPERTY_DECL);

impl PropertyDecl {
    has_token_method!(is_static, STATIC_KW, "private static $instances");
    first_child_method!(type_ref, TypeRef);
    children_method!(elements, PropertyElement);
}

ast_node!(PropertyElement, PROPERTY_ELEMENT);

impl PropertyElement {
    token_method!(variable_token, VARIABLE);
}

ast_node!(ClassConstDecl, CLASS_CONST_DECL);

impl ClassConstDecl {
    children_method!(elements, ConstElement);
}

ast_node!(ConstElement, CONST_ELEMENT);

impl ConstElement {
    token_method!(name_token, IDENT);
}

ast_node!(EnumCase, ENUM_CASE);

impl EnumCase {
    token_method!(name_token, IDENT);
}

// ============================================================================
// Functions, parameters and types
// ============================================================================

ast_node!(FunctionDecl, FUNCTION_DECL);

impl FunctionDecl {
    token_method!(name_token, IDENT);
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
    first_child_method!(body, Block);
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_method!(params, Param);
}

ast_node!(Param, PARAM);

impl Param {
    token_method!(variable_token, VARIABLE);
    first_child_method!(type_ref, TypeRef);

    /// Constructor promotion: `public function __construct(private Foo $foo)`
    pub fn is_promoted(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::PUBLIC_KW
                        | SyntaxKind::PROTECTED_KW
                        | SyntaxKind::PRIVATE_KW
                        | SyntaxKind::READONLY_KW
                )
            })
    }
}

ast_node!(ReturnType, RETURN_TYPE);

impl ReturnType {
    first_child_method!(type_ref, TypeRef);
}

ast_node!(TypeRef, TYPE);

impl TypeRef {
    children_method!(names, NameRef);
    has_token_method!(is_nullable, QUESTION, "?Foo");
    has_token_method!(is_union, PIPE, "Foo|Bar");
}

ast_node!(Block, BLOCK);

ast_node!(CatchClause, CATCH_CLAUSE);

impl CatchClause {
    token_method!(variable_token, VARIABLE);
    first_child_method!(type_ref, TypeRef);
}

ast_node!(AttributeGroup, ATTRIBUTE_GROUP);
