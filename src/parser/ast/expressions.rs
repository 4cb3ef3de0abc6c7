use super::*;

// ============================================================================
// Expression
// ============================================================================

/// Any expression node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Variable(VariableExpr),
    Literal(Literal),
    Array(ArrayExpr),
    Paren(ParenExpr),
    New(NewExpr),
    Call(CallExpr),
    MemberAccess(MemberAccessExpr),
    StaticAccess(StaticAccessExpr),
    Assign(AssignExpr),
    Name(NameRef),
    Closure(ClosureExpr),
    ArrowFn(ArrowFnExpr),
    /// Operators, match, ternaries and anything else without typed accessors
    Other(SyntaxNode),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_expr()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::VARIABLE_EXPR => Expr::Variable(VariableExpr(node)),
            SyntaxKind::LITERAL => Expr::Literal(Literal(node)),
            SyntaxKind::ARRAY_EXPR => Expr::Array(ArrayExpr(node)),
            SyntaxKind::PAREN_EXPR => Expr::Paren(ParenExpr(node)),
            SyntaxKind::NEW_EXPR => Expr::New(NewExpr(node)),
            SyntaxKind::CALL_EXPR => Expr::Call(CallExpr(node)),
            SyntaxKind::MEMBER_ACCESS_EXPR => Expr::MemberAccess(MemberAccessExpr(node)),
            SyntaxKind::STATIC_ACCESS_EXPR => Expr::StaticAccess(StaticAccessExpr(node)),
            SyntaxKind::ASSIGN_EXPR => Expr::Assign(AssignExpr(node)),
            SyntaxKind::NAME_REF => Expr::Name(NameRef(node)),
            SyntaxKind::CLOSURE_EXPR => Expr::Closure(ClosureExpr(node)),
            SyntaxKind::ARROW_FN_EXPR => Expr::ArrowFn(ArrowFnExpr(node)),
            kind if kind.is_expr() => Expr::Other(node),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Variable(n) => &n.0,
            Expr::Literal(n) => &n.0,
            Expr::Array(n) => &n.0,
            Expr::Paren(n) => &n.0,
            Expr::New(n) => &n.0,
            Expr::Call(n) => &n.0,
            Expr::MemberAccess(n) => &n.0,
            Expr::StaticAccess(n) => &n.0,
            Expr::Assign(n) => &n.0,
            Expr::Name(n) => &n.0,
            Expr::Closure(n) => &n.0,
            Expr::ArrowFn(n) => &n.0,
            Expr::Other(n) => n,
        }
    }
}

/// First child node that is an expression
fn first_expr(node: &SyntaxNode) -> Option<Expr> {
    node.children().find_map(Expr::cast)
}

ast_node!(VariableExpr, VARIABLE_EXPR);

impl VariableExpr {
    token_method!(variable_token, VARIABLE);

    /// Variable name without `$`; `None` for variable-variables
    pub fn name(&self) -> Option<String> {
        self.variable_token()
            .map(|t| t.text().trim_start_matches('$').to_string())
    }

    pub fn is_this(&self) -> bool {
        self.name().as_deref() == Some("this")
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    /// The PHP type of the literal value
    pub fn type_name(&self) -> &'static str {
        let token = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_literal());
        match token.map(|t| t.kind()) {
            Some(SyntaxKind::INTEGER) => "int",
            Some(SyntaxKind::FLOAT) => "float",
            _ => "string",
        }
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        first_expr(&self.0)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    first_child_method!(class_name, NameRef);
    first_child_method!(anon_class, AnonClass);
    first_child_method!(arg_list, ArgList);
}

ast_node!(AnonClass, ANON_CLASS);

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    first_child_method!(arg_list, ArgList);

    /// The called expression: a function name, member access or static access
    pub fn callee(&self) -> Option<Expr> {
        first_expr(&self.0)
    }
}

ast_node!(ArgList, ARG_LIST);

// `$receiver->name` or `$receiver?->name`
ast_node!(MemberAccessExpr, MEMBER_ACCESS_EXPR);

impl MemberAccessExpr {
    has_token_method!(is_nullsafe, NULLSAFE_ARROW, "$user?->address");

    /// The dereferenced expression left of the arrow
    pub fn receiver(&self) -> Option<Expr> {
        first_expr(&self.0)
    }

    /// The member name token; `None` when the name is computed (`$a->$b`, `$a->{'b'}`)
    pub fn name_token(&self) -> Option<SyntaxToken> {
        let mut after_arrow = false;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t)
                    if matches!(t.kind(), SyntaxKind::ARROW | SyntaxKind::NULLSAFE_ARROW) =>
                {
                    after_arrow = true;
                }
                rowan::NodeOrToken::Token(t) if after_arrow && t.kind() == SyntaxKind::IDENT => {
                    return Some(t);
                }
                _ => {}
            }
        }
        None
    }
}

// `Qualifier::NAME`, `Qualifier::$prop`, `Qualifier::method` or `Qualifier::class`
ast_node!(StaticAccessExpr, STATIC_ACCESS_EXPR);

impl StaticAccessExpr {
    /// The class reference or expression left of `::`
    pub fn qualifier(&self) -> Option<Expr> {
        first_expr(&self.0)
    }

    /// The member token after `::`; `None` when computed (`Foo::{$name}()`)
    pub fn name_token(&self) -> Option<SyntaxToken> {
        let mut after_colons = false;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::COLON_COLON => {
                    after_colons = true;
                }
                rowan::NodeOrToken::Token(t)
                    if after_colons
                        && matches!(
                            t.kind(),
                            SyntaxKind::IDENT | SyntaxKind::VARIABLE | SyntaxKind::CLASS_KW
                        ) =>
                {
                    return Some(t);
                }
                _ => {}
            }
        }
        None
    }

    /// `Foo::class`
    pub fn is_class_constant(&self) -> bool {
        self.name_token()
            .is_some_and(|t| t.kind() == SyntaxKind::CLASS_KW)
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    /// Plain `=` rather than a compound operator like `.=`
    pub fn is_plain(&self) -> bool {
        has_token(&self.0, SyntaxKind::EQ)
    }

    pub fn lhs(&self) -> Option<Expr> {
        first_expr(&self.0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(ClosureExpr, CLOSURE_EXPR);

impl ClosureExpr {
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
    first_child_method!(uses, ClosureUse);
}

ast_node!(ClosureUse, CLOSURE_USE);

impl ClosureUse {
    children_method!(variables, VariableExpr);
}

ast_node!(ArrowFnExpr, ARROW_FN_EXPR);

impl ArrowFnExpr {
    first_child_method!(param_list, ParamList);
    first_child_method!(return_type, ReturnType);
}
