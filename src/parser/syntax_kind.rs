//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! for the PHP subset the parser understands.

/// All syntax kinds (tokens and nodes) in a PHP source file
///
/// Tokens are leaf nodes (identifiers, variables, keywords, punctuation).
/// Nodes are composite (class declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace, comments and open/close tags)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,
    OPEN_TAG,           // <?php, <?=
    CLOSE_TAG,          // ?>

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    IDENT,              // foo
    QUALIFIED_NAME,     // Foo\Bar, \Foo
    VARIABLE,           // $foo
    INTEGER,            // 42, 0x2A
    FLOAT,              // 3.14
    STRING,             // 'a', "b"
    CAST,               // `(int)` prefix of a cast, built by the parser

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_PAREN,            // (
    R_PAREN,            // )
    HASH_BRACKET,       // #[
    SEMICOLON,          // ;
    COMMA,              // ,
    COLON,              // :
    COLON_COLON,        // ::
    ARROW,              // ->
    NULLSAFE_ARROW,     // ?->
    FAT_ARROW,          // =>
    BACKSLASH,          // \
    DOLLAR,             // $
    ELLIPSIS,           // ...
    QUESTION,           // ?
    QUESTION_QUESTION,  // ??
    AT,                 // @
    EQ,                 // =
    EQ_EQ,              // ==
    EQ_EQ_EQ,           // ===
    BANG_EQ,            // != or <>
    BANG_EQ_EQ,         // !==
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    SPACESHIP,          // <=>
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    PERCENT,            // %
    STAR_STAR,          // **
    DOT,                // .
    PLUS_PLUS,          // ++
    MINUS_MINUS,        // --
    BANG,               // !
    TILDE,              // ~
    AMP,                // &
    PIPE,               // |
    CARET,              // ^
    AMP_AMP,            // &&
    PIPE_PIPE,          // ||
    SHL,                // <<
    SHR,                // >>
    ASSIGN_OP,          // += -= *= /= .= %= **= ??= &= |= ^= <<= >>=

    // =========================================================================
    // KEYWORDS (case-insensitive in PHP)
    // =========================================================================
    ABSTRACT_KW,
    AND_KW,
    ARRAY_KW,
    AS_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CLONE_KW,
    CONST_KW,
    CONTINUE_KW,
    DECLARE_KW,
    DEFAULT_KW,
    DO_KW,
    ECHO_KW,
    ELSE_KW,
    ELSEIF_KW,
    ENUM_KW,
    EXTENDS_KW,
    FINAL_KW,
    FINALLY_KW,
    FN_KW,
    FOR_KW,
    FOREACH_KW,
    FUNCTION_KW,
    GLOBAL_KW,
    IF_KW,
    IMPLEMENTS_KW,
    INCLUDE_KW,         // include, include_once, require, require_once
    INSTANCEOF_KW,
    INSTEADOF_KW,
    INTERFACE_KW,
    MATCH_KW,
    NAMESPACE_KW,
    NEW_KW,
    OR_KW,
    PRINT_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    RETURN_KW,
    STATIC_KW,
    SWITCH_KW,
    THROW_KW,
    TRAIT_KW,
    TRY_KW,
    USE_KW,
    VAR_KW,
    WHILE_KW,
    XOR_KW,
    YIELD_KW,

    // =========================================================================
    // COMPOSITE NODES
    // =========================================================================
    // Root
    SOURCE_FILE,

    // Namespaces and imports
    NAMESPACE_DEF,
    USE_DECL,
    USE_CLAUSE,
    USE_GROUP,
    NAME_REF,

    // Class-likes
    CLASS_DECL,
    INTERFACE_DECL,
    TRAIT_DECL,
    ENUM_DECL,
    EXTENDS_CLAUSE,
    IMPLEMENTS_CLAUSE,
    CLASS_BODY,
    ATTRIBUTE_GROUP,

    // Class members
    METHOD_DECL,
    PROPERTY_DECL,
    PROPERTY_ELEMENT,
    CLASS_CONST_DECL,
    CONST_ELEMENT,
    TRAIT_USE,
    ENUM_CASE,

    // Functions
    FUNCTION_DECL,
    PARAM_LIST,
    PARAM,
    TYPE,
    RETURN_TYPE,

    // Statements
    BLOCK,
    EXPR_STMT,
    RETURN_STMT,
    ECHO_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    DO_WHILE_STMT,
    FOR_STMT,
    FOREACH_STMT,
    SWITCH_STMT,
    SWITCH_CASE,
    TRY_STMT,
    CATCH_CLAUSE,
    FINALLY_CLAUSE,
    JUMP_STMT,
    GLOBAL_STMT,
    STATIC_VAR_STMT,
    DECLARE_STMT,
    CONST_STMT,
    EMPTY_STMT,

    // Expressions
    VARIABLE_EXPR,
    LITERAL,
    ARRAY_EXPR,
    ARRAY_ELEMENT,
    PAREN_EXPR,
    NEW_EXPR,
    ANON_CLASS,
    CALL_EXPR,
    ARG_LIST,
    ARG,
    MEMBER_ACCESS_EXPR,
    STATIC_ACCESS_EXPR,
    MEMBER_NAME_EXPR,
    INDEX_EXPR,
    ASSIGN_EXPR,
    BINARY_EXPR,
    UNARY_EXPR,
    POSTFIX_EXPR,
    TERNARY_EXPR,
    CLOSURE_EXPR,
    CLOSURE_USE,
    ARROW_FN_EXPR,
    MATCH_EXPR,
    MATCH_ARM,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment or PHP tag)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE
                | Self::LINE_COMMENT
                | Self::BLOCK_COMMENT
                | Self::DOC_COMMENT
                | Self::OPEN_TAG
                | Self::CLOSE_TAG
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::YIELD_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::ASSIGN_OP as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(self, Self::INTEGER | Self::FLOAT | Self::STRING)
    }

    /// Tokens that can spell a member name after `->`, `::` or `function`.
    /// PHP allows reserved words there (`$query->list()`, `const DEFAULT`).
    pub fn is_member_name(self) -> bool {
        self == Self::IDENT || self.is_keyword()
    }

    /// Class-like declaration nodes whose bodies can declare members
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::CLASS_DECL | Self::INTERFACE_DECL | Self::TRAIT_DECL | Self::ENUM_DECL
        )
    }

    /// Function-like nodes that open a new variable scope
    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FUNCTION_DECL | Self::METHOD_DECL | Self::CLOSURE_EXPR | Self::ARROW_FN_EXPR
        )
    }

    /// Expression nodes
    pub fn is_expr(self) -> bool {
        if self == Self::NAME_REF {
            return true;
        }
        let in_range = (self as u16) >= (Self::VARIABLE_EXPR as u16)
            && (self as u16) <= (Self::MATCH_EXPR as u16);
        in_range
            && !matches!(
                self,
                Self::ARRAY_ELEMENT
                    | Self::ANON_CLASS
                    | Self::ARG_LIST
                    | Self::ARG
                    | Self::MEMBER_NAME_EXPR
                    | Self::CLOSURE_USE
            )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhpLanguage {}

impl rowan::Language for PhpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<PhpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<PhpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<PhpLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<PhpLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_range() {
        assert!(SyntaxKind::CLASS_KW.is_keyword());
        assert!(SyntaxKind::YIELD_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(!SyntaxKind::SOURCE_FILE.is_keyword());
    }

    #[test]
    fn test_expression_kinds() {
        assert!(SyntaxKind::CALL_EXPR.is_expr());
        assert!(SyntaxKind::MATCH_EXPR.is_expr());
        assert!(SyntaxKind::NAME_REF.is_expr());
        assert!(!SyntaxKind::ARG_LIST.is_expr());
        assert!(!SyntaxKind::MATCH_ARM.is_expr());
        assert!(!SyntaxKind::BLOCK.is_expr());
    }

    #[test]
    fn test_raw_round_trip() {
        let raw: rowan::SyntaxKind = SyntaxKind::METHOD_DECL.into();
        assert_eq!(SyntaxKind::from(raw), SyntaxKind::METHOD_DECL);
    }
}
