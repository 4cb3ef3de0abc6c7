//! Recursive descent parser for PHP
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Trivia is flushed into the enclosing node right before the next significant
//! token or node, so no node starts or ends with whitespace or comments. The
//! text range of an expression node therefore ends exactly after its last token.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize, Checkpoint};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// Parse PHP source code into a CST
pub fn parse_php(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Tokens that may start a class member declaration
const MEMBER_MODIFIERS: &[SyntaxKind] = &[
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PROTECTED_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::STATIC_KW,
    SyntaxKind::ABSTRACT_KW,
    SyntaxKind::FINAL_KW,
    SyntaxKind::READONLY_KW,
    SyntaxKind::VAR_KW,
];

/// The parser state
pub(super) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is invisible to lookahead)
    // =========================================================================

    /// Index of the n-th significant token from the current position
    fn significant_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        for idx in self.pos..self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    pub(super) fn nth(&self, n: usize) -> SyntaxKind {
        self.significant_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    pub(super) fn nth_text(&self, n: usize) -> &str {
        self.significant_index(n)
            .map(|idx| self.tokens[idx].text)
            .unwrap_or("")
    }

    pub(super) fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(super) fn current_text(&self) -> &str {
        self.significant_index(0)
            .map(|idx| self.tokens[idx].text)
            .unwrap_or("")
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    pub(super) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    pub(super) fn at_eof(&self) -> bool {
        self.significant_index(0).is_none()
    }

    /// Position used by progress guards in loops
    pub(super) fn position(&self) -> usize {
        self.significant_index(0).unwrap_or(self.tokens.len())
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(super) fn bump(&mut self) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Bump the current token, recording it under a different kind.
    /// Used for reserved words that act as names (`$q->list()`).
    pub(super) fn bump_remap(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    /// Statements end with `;`, or implicitly at a closing tag / end of file
    fn expect_semicolon(&mut self) {
        if self.eat(SyntaxKind::SEMICOLON) || self.at_eof() {
            return;
        }
        if self.tokens.get(self.pos).map(|t| t.kind) == Some(SyntaxKind::CLOSE_TAG) {
            return;
        }
        self.error("expected ';'");
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(super) fn error(&mut self, message: impl Into<String>) {
        let range = match self.significant_index(0) {
            Some(idx) => {
                let token = &self.tokens[idx];
                TextRange::at(token.offset, TextSize::of(token.text))
            }
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    pub(super) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    /// Skip a balanced `{ ... }` group into the current node
    fn skip_braced(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.error("unterminated block");
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Grammar rules: files and statements
    // =========================================================================

    /// SourceFile = Statement*
    fn parse_source_file(&mut self) {
        // The root must own leading trivia, so it opens before any is eaten
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        while !self.at_eof() {
            let before = self.position();
            if self.at(SyntaxKind::R_BRACE) {
                self.error_recover("unmatched '}'", &[]);
                continue;
            }
            self.parse_statement();
            if self.position() == before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.eat_trivia();

        self.finish_node();
    }

    /// Statement list inside braces, up to (not including) `}`
    fn parse_statements_until_brace(&mut self) {
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.position();
            self.parse_statement();
            if self.position() == before && !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
    }

    pub(super) fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::NAMESPACE_KW if self.nth(1) != SyntaxKind::BACKSLASH => {
                self.parse_namespace()
            }
            SyntaxKind::USE_KW => self.parse_use_decl(),
            SyntaxKind::HASH_BRACKET => {
                self.parse_attribute_group();
            }
            SyntaxKind::ABSTRACT_KW | SyntaxKind::FINAL_KW
                if self.nth_non_modifier_is(SyntaxKind::CLASS_KW) =>
            {
                self.parse_class_like()
            }
            SyntaxKind::READONLY_KW if self.nth_non_modifier_is(SyntaxKind::CLASS_KW) => {
                self.parse_class_like()
            }
            SyntaxKind::CLASS_KW if self.nth(1) != SyntaxKind::L_PAREN => self.parse_class_like(),
            SyntaxKind::INTERFACE_KW | SyntaxKind::TRAIT_KW => self.parse_class_like(),
            SyntaxKind::ENUM_KW if self.nth(1).is_member_name() => self.parse_class_like(),
            SyntaxKind::FUNCTION_KW
                if self.nth(1).is_member_name()
                    || (self.nth(1) == SyntaxKind::AMP && self.nth(2).is_member_name()) =>
            {
                self.parse_function_decl()
            }
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::WHILE_KW => self.parse_while(),
            SyntaxKind::DO_KW => self.parse_do_while(),
            SyntaxKind::FOR_KW => self.parse_for(),
            SyntaxKind::FOREACH_KW => self.parse_foreach(),
            SyntaxKind::SWITCH_KW => self.parse_switch(),
            SyntaxKind::TRY_KW => self.parse_try(),
            SyntaxKind::RETURN_KW => self.parse_keyword_expr_stmt(SyntaxKind::RETURN_STMT),
            SyntaxKind::ECHO_KW => self.parse_echo(),
            SyntaxKind::BREAK_KW | SyntaxKind::CONTINUE_KW => {
                self.parse_keyword_expr_stmt(SyntaxKind::JUMP_STMT)
            }
            SyntaxKind::GLOBAL_KW => self.parse_global(),
            SyntaxKind::STATIC_KW if self.nth(1) == SyntaxKind::VARIABLE => self.parse_static_vars(),
            SyntaxKind::DECLARE_KW => self.parse_declare(),
            SyntaxKind::CONST_KW => self.parse_const_stmt(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// Look past leading modifiers (`abstract final readonly`) for a keyword
    fn nth_non_modifier_is(&self, kind: SyntaxKind) -> bool {
        let mut n = 0;
        while matches!(
            self.nth(n),
            SyntaxKind::ABSTRACT_KW | SyntaxKind::FINAL_KW | SyntaxKind::READONLY_KW
        ) {
            n += 1;
        }
        self.nth(n) == kind
    }

    /// ExprStmt = Expr ';'
    fn parse_expr_stmt(&mut self) {
        self.start_node(SyntaxKind::EXPR_STMT);
        self.parse_expr();
        self.expect_semicolon();
        self.finish_node();
    }

    /// `return expr?;`, `break 2;`, `continue;`
    fn parse_keyword_expr_stmt(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if !self.at(SyntaxKind::SEMICOLON) && !self.at_eof() {
            self.parse_expr();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// Echo = 'echo' Expr (',' Expr)* ';'
    fn parse_echo(&mut self) {
        self.start_node(SyntaxKind::ECHO_STMT);
        self.bump();
        self.parse_expr_list();
        self.expect_semicolon();
        self.finish_node();
    }

    fn parse_expr_list(&mut self) {
        self.parse_expr();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_expr();
        }
    }

    /// Global = 'global' Variable (',' Variable)* ';'
    fn parse_global(&mut self) {
        self.start_node(SyntaxKind::GLOBAL_STMT);
        self.bump();
        self.parse_expr_list();
        self.expect_semicolon();
        self.finish_node();
    }

    /// StaticVars = 'static' Variable ('=' Expr)? (',' ...)* ';'
    fn parse_static_vars(&mut self) {
        self.start_node(SyntaxKind::STATIC_VAR_STMT);
        self.bump();
        self.parse_expr_list();
        self.expect_semicolon();
        self.finish_node();
    }

    /// Declare = 'declare' '(' Directive (',' Directive)* ')' (';' | Statement)
    fn parse_declare(&mut self) {
        self.start_node(SyntaxKind::DECLARE_STMT);
        self.bump();
        if self.expect(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                let before = self.position();
                if self.current_kind().is_member_name() {
                    self.bump_remap(SyntaxKind::IDENT);
                }
                if self.eat(SyntaxKind::EQ) {
                    self.parse_expr();
                }
                self.eat(SyntaxKind::COMMA);
                if self.position() == before {
                    self.error_recover("unexpected token in declare", &[SyntaxKind::R_PAREN]);
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        if !self.eat(SyntaxKind::SEMICOLON) && !self.at_eof() {
            self.parse_statement();
        }
        self.finish_node();
    }

    /// ConstStmt = 'const' ConstElement (',' ConstElement)* ';'
    fn parse_const_stmt(&mut self) {
        self.start_node(SyntaxKind::CONST_STMT);
        self.bump();
        loop {
            self.parse_const_element();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// Block = '{' Statement* '}'
    pub(super) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        self.parse_statements_until_brace();
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Namespace = 'namespace' Name? (';' | Block)
    fn parse_namespace(&mut self) {
        self.start_node(SyntaxKind::NAMESPACE_DEF);
        self.bump();
        if self.at_any(&[SyntaxKind::IDENT, SyntaxKind::QUALIFIED_NAME]) {
            self.parse_name_ref();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.expect_semicolon();
        }
        self.finish_node();
    }

    /// UseDecl = 'use' ('function' | 'const')? UseClause (',' UseClause)* ';'
    fn parse_use_decl(&mut self) {
        self.start_node(SyntaxKind::USE_DECL);
        self.bump();
        if self.at_any(&[SyntaxKind::FUNCTION_KW, SyntaxKind::CONST_KW]) {
            self.bump();
        }
        loop {
            self.parse_use_clause_or_group();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// UseClause = Name ('as' Ident)?
    /// UseGroup = Name '\' '{' UseClause (',' UseClause)* '}'
    fn parse_use_clause_or_group(&mut self) {
        if !self.at_any(&[SyntaxKind::IDENT, SyntaxKind::QUALIFIED_NAME]) {
            self.error_recover(
                "expected imported name",
                &[SyntaxKind::COMMA, SyntaxKind::SEMICOLON],
            );
            return;
        }
        // The name is wrapped once we know whether it is a group prefix
        let checkpoint = self.checkpoint();
        self.parse_name_ref();

        if self.at(SyntaxKind::BACKSLASH) && self.nth(1) == SyntaxKind::L_BRACE {
            self.start_node_at(checkpoint, SyntaxKind::USE_GROUP);
            self.bump();
            self.bump();
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                let before = self.position();
                if self.at_any(&[SyntaxKind::FUNCTION_KW, SyntaxKind::CONST_KW]) {
                    self.bump();
                }
                self.start_node(SyntaxKind::USE_CLAUSE);
                if self.at_any(&[SyntaxKind::IDENT, SyntaxKind::QUALIFIED_NAME]) {
                    self.parse_name_ref();
                }
                self.parse_use_alias();
                self.finish_node();
                self.eat(SyntaxKind::COMMA);
                if self.position() == before {
                    self.error_recover("unexpected token in use group", &[SyntaxKind::R_BRACE]);
                }
            }
            self.expect(SyntaxKind::R_BRACE);
            self.finish_node();
            return;
        }

        self.start_node_at(checkpoint, SyntaxKind::USE_CLAUSE);
        self.parse_use_alias();
        self.finish_node();
    }

    fn parse_use_alias(&mut self) {
        if self.eat(SyntaxKind::AS_KW) {
            if self.current_kind().is_member_name() {
                self.bump_remap(SyntaxKind::IDENT);
            } else {
                self.error("expected alias name");
            }
        }
    }

    /// Name = Ident | QualifiedName | 'static' | 'array'
    pub(super) fn parse_name_ref(&mut self) {
        self.start_node(SyntaxKind::NAME_REF);
        match self.current_kind() {
            SyntaxKind::IDENT | SyntaxKind::QUALIFIED_NAME | SyntaxKind::STATIC_KW
            | SyntaxKind::ARRAY_KW => self.bump(),
            kind if kind.is_keyword() => self.bump_remap(SyntaxKind::IDENT),
            _ => self.error("expected name"),
        }
        self.finish_node();
    }

    fn parse_name_list(&mut self) {
        loop {
            self.parse_name_ref();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    /// AttributeGroup = '#[' Expr (',' Expr)* ']'
    pub(super) fn parse_attribute_group(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE_GROUP);
        self.bump();
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACKET) {
            let before = self.position();
            self.parse_expr();
            self.eat(SyntaxKind::COMMA);
            if self.position() == before {
                self.error_recover("unexpected token in attribute", &[SyntaxKind::R_BRACKET]);
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    fn parse_attributes(&mut self) {
        while self.at(SyntaxKind::HASH_BRACKET) {
            self.parse_attribute_group();
        }
    }

    // =========================================================================
    // Grammar rules: class-likes
    // =========================================================================

    /// ClassLike = Modifiers? ('class' | 'interface' | 'trait' | 'enum') Ident
    ///             Extends? Implements? ClassBody
    fn parse_class_like(&mut self) {
        let checkpoint = self.checkpoint();
        while self.at_any(&[SyntaxKind::ABSTRACT_KW, SyntaxKind::FINAL_KW, SyntaxKind::READONLY_KW])
        {
            self.bump();
        }
        let kind = match self.current_kind() {
            SyntaxKind::INTERFACE_KW => SyntaxKind::INTERFACE_DECL,
            SyntaxKind::TRAIT_KW => SyntaxKind::TRAIT_DECL,
            SyntaxKind::ENUM_KW => SyntaxKind::ENUM_DECL,
            _ => SyntaxKind::CLASS_DECL,
        };
        self.start_node_at(checkpoint, kind);
        self.bump();

        if self.current_kind().is_member_name() {
            self.bump_remap(SyntaxKind::IDENT);
        } else {
            self.error("expected class name");
        }

        if kind == SyntaxKind::ENUM_DECL && self.eat(SyntaxKind::COLON) {
            self.parse_type();
        }
        if self.at(SyntaxKind::EXTENDS_KW) {
            self.start_node(SyntaxKind::EXTENDS_CLAUSE);
            self.bump();
            self.parse_name_list();
            self.finish_node();
        }
        if self.at(SyntaxKind::IMPLEMENTS_KW) {
            self.start_node(SyntaxKind::IMPLEMENTS_CLAUSE);
            self.bump();
            self.parse_name_list();
            self.finish_node();
        }
        self.parse_class_body();

        self.finish_node();
    }

    /// ClassBody = '{' ClassMember* '}'
    pub(super) fn parse_class_body(&mut self) {
        self.start_node(SyntaxKind::CLASS_BODY);
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                let before = self.position();
                self.parse_class_member();
                if self.position() == before && !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                    self.error(format!("stuck on token: {:?}", self.current_kind()));
                    self.bump();
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// ClassMember = TraitUse | EnumCase | Method | Property | ClassConst
    fn parse_class_member(&mut self) {
        self.parse_attributes();

        match self.current_kind() {
            SyntaxKind::USE_KW => return self.parse_trait_use(),
            SyntaxKind::CASE_KW => return self.parse_enum_case(),
            SyntaxKind::R_BRACE => return,
            _ => {}
        }

        let checkpoint = self.checkpoint();
        while self.at_any(MEMBER_MODIFIERS) {
            self.bump();
        }

        match self.current_kind() {
            SyntaxKind::FUNCTION_KW => {
                self.start_node_at(checkpoint, SyntaxKind::METHOD_DECL);
                self.parse_method_rest();
                self.finish_node();
            }
            SyntaxKind::CONST_KW => {
                self.start_node_at(checkpoint, SyntaxKind::CLASS_CONST_DECL);
                self.parse_class_const_rest();
                self.finish_node();
            }
            SyntaxKind::VARIABLE
            | SyntaxKind::QUESTION
            | SyntaxKind::IDENT
            | SyntaxKind::QUALIFIED_NAME
            | SyntaxKind::ARRAY_KW
            | SyntaxKind::STATIC_KW
            | SyntaxKind::L_PAREN => {
                self.start_node_at(checkpoint, SyntaxKind::PROPERTY_DECL);
                self.parse_property_rest();
                self.finish_node();
            }
            _ => {
                self.error_recover(
                    format!("unexpected token in class body: {:?}", self.current_kind()),
                    &[
                        SyntaxKind::SEMICOLON,
                        SyntaxKind::R_BRACE,
                        SyntaxKind::FUNCTION_KW,
                        SyntaxKind::CONST_KW,
                        SyntaxKind::PUBLIC_KW,
                        SyntaxKind::PROTECTED_KW,
                        SyntaxKind::PRIVATE_KW,
                    ],
                );
                self.eat(SyntaxKind::SEMICOLON);
            }
        }
    }

    /// Method = Modifiers 'function' '&'? Name ParamList ReturnType? (Block | ';')
    fn parse_method_rest(&mut self) {
        self.bump(); // function
        self.eat(SyntaxKind::AMP);
        if self.current_kind().is_member_name() {
            self.bump_remap(SyntaxKind::IDENT);
        } else {
            self.error("expected method name");
        }
        self.parse_param_list();
        if self.at(SyntaxKind::COLON) {
            self.parse_return_type();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.expect_semicolon();
        }
    }

    /// ClassConst = Modifiers 'const' Type? ConstElement (',' ConstElement)* ';'
    fn parse_class_const_rest(&mut self) {
        self.bump(); // const
        // Typed constants: `const string NAME = ...`
        if self.nth(1) != SyntaxKind::EQ && self.nth(1) != SyntaxKind::COMMA {
            self.parse_type();
        }
        loop {
            self.parse_const_element();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect_semicolon();
    }

    /// ConstElement = Name '=' Expr
    fn parse_const_element(&mut self) {
        self.start_node(SyntaxKind::CONST_ELEMENT);
        if self.current_kind().is_member_name() {
            self.bump_remap(SyntaxKind::IDENT);
        } else {
            self.error("expected constant name");
        }
        if self.expect(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// Property = Modifiers Type? PropertyElement (',' PropertyElement)* ';'
    fn parse_property_rest(&mut self) {
        if !self.at(SyntaxKind::VARIABLE) {
            self.parse_type();
        }
        loop {
            self.start_node(SyntaxKind::PROPERTY_ELEMENT);
            if !self.expect(SyntaxKind::VARIABLE) {
                self.finish_node();
                break;
            }
            if self.eat(SyntaxKind::EQ) {
                self.parse_expr();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if self.at(SyntaxKind::L_BRACE) {
            // Property hooks are kept but not interpreted.
            self.skip_braced();
        } else {
            self.expect_semicolon();
        }
    }

    /// TraitUse = 'use' Name (',' Name)* (';' | '{' Adaptation* '}')
    fn parse_trait_use(&mut self) {
        self.start_node(SyntaxKind::TRAIT_USE);
        self.bump();
        self.parse_name_list();
        if self.at(SyntaxKind::L_BRACE) {
            self.skip_braced();
        } else {
            self.expect_semicolon();
        }
        self.finish_node();
    }

    /// EnumCase = 'case' Name ('=' Expr)? ';'
    fn parse_enum_case(&mut self) {
        self.start_node(SyntaxKind::ENUM_CASE);
        self.bump();
        if self.current_kind().is_member_name() {
            self.bump_remap(SyntaxKind::IDENT);
        } else {
            self.error("expected case name");
        }
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: functions and types
    // =========================================================================

    /// Function = 'function' '&'? Ident ParamList ReturnType? Block
    fn parse_function_decl(&mut self) {
        self.start_node(SyntaxKind::FUNCTION_DECL);
        self.bump();
        self.eat(SyntaxKind::AMP);
        self.bump_remap(SyntaxKind::IDENT);
        self.parse_param_list();
        if self.at(SyntaxKind::COLON) {
            self.parse_return_type();
        }
        self.parse_block();
        self.finish_node();
    }

    /// ParamList = '(' (Param (',' Param)* ','?)? ')'
    pub(super) fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        if self.expect(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                let before = self.position();
                self.parse_param();
                if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_PAREN) {
                    self.error_recover(
                        "expected ',' or ')'",
                        &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::L_BRACE],
                    );
                    if self.at(SyntaxKind::L_BRACE) {
                        break;
                    }
                    self.eat(SyntaxKind::COMMA);
                }
                if self.position() == before {
                    break;
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// Param = Attributes? Modifiers? Type? '&'? '...'? Variable ('=' Expr)?
    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        self.parse_attributes();
        while self.at_any(&[
            SyntaxKind::PUBLIC_KW,
            SyntaxKind::PROTECTED_KW,
            SyntaxKind::PRIVATE_KW,
            SyntaxKind::READONLY_KW,
        ]) {
            self.bump();
        }
        if !self.at_any(&[SyntaxKind::VARIABLE, SyntaxKind::AMP, SyntaxKind::ELLIPSIS]) {
            self.parse_type();
        }
        self.eat(SyntaxKind::AMP);
        self.eat(SyntaxKind::ELLIPSIS);
        self.expect(SyntaxKind::VARIABLE);
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr();
        }
        self.finish_node();
    }

    /// ReturnType = ':' Type
    pub(super) fn parse_return_type(&mut self) {
        self.start_node(SyntaxKind::RETURN_TYPE);
        self.bump();
        self.parse_type();
        self.finish_node();
    }

    /// Type = '?'? TypeAtom (('|' | '&') TypeAtom)*
    pub(super) fn parse_type(&mut self) {
        self.start_node(SyntaxKind::TYPE);
        self.eat(SyntaxKind::QUESTION);
        self.parse_type_atom();
        loop {
            let intersection = self.at(SyntaxKind::AMP)
                && !matches!(
                    self.nth(1),
                    SyntaxKind::VARIABLE | SyntaxKind::ELLIPSIS | SyntaxKind::AMP
                );
            if self.at(SyntaxKind::PIPE) || intersection {
                self.bump();
                self.parse_type_atom();
            } else {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_type_atom(&mut self) {
        if self.eat(SyntaxKind::L_PAREN) {
            // DNF types: (A&B)|null
            self.parse_type_atom();
            while self.eat(SyntaxKind::AMP) {
                self.parse_type_atom();
            }
            self.expect(SyntaxKind::R_PAREN);
        } else {
            self.parse_name_ref();
        }
    }

    // =========================================================================
    // Grammar rules: control flow
    // =========================================================================

    fn parse_paren_condition(&mut self) {
        if self.expect(SyntaxKind::L_PAREN) {
            self.parse_expr();
            self.expect(SyntaxKind::R_PAREN);
        }
    }

    /// If = 'if' '(' Expr ')' Statement ElseClause*
    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IF_STMT);
        self.bump();
        self.parse_paren_condition();
        self.parse_statement();
        loop {
            if self.at(SyntaxKind::ELSEIF_KW) {
                self.start_node(SyntaxKind::ELSE_CLAUSE);
                self.bump();
                self.parse_paren_condition();
                self.parse_statement();
                self.finish_node();
            } else if self.at(SyntaxKind::ELSE_KW) {
                self.start_node(SyntaxKind::ELSE_CLAUSE);
                self.bump();
                self.parse_statement();
                self.finish_node();
                break;
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// While = 'while' '(' Expr ')' Statement
    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WHILE_STMT);
        self.bump();
        self.parse_paren_condition();
        self.parse_statement();
        self.finish_node();
    }

    /// DoWhile = 'do' Statement 'while' '(' Expr ')' ';'
    fn parse_do_while(&mut self) {
        self.start_node(SyntaxKind::DO_WHILE_STMT);
        self.bump();
        self.parse_statement();
        if self.expect(SyntaxKind::WHILE_KW) {
            self.parse_paren_condition();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// For = 'for' '(' Exprs? ';' Exprs? ';' Exprs? ')' Statement
    fn parse_for(&mut self) {
        self.start_node(SyntaxKind::FOR_STMT);
        self.bump();
        if self.expect(SyntaxKind::L_PAREN) {
            for terminator in [SyntaxKind::SEMICOLON, SyntaxKind::SEMICOLON, SyntaxKind::R_PAREN] {
                if !self.at(terminator) {
                    self.parse_expr_list();
                }
                self.expect(terminator);
            }
        }
        self.parse_statement();
        self.finish_node();
    }

    /// Foreach = 'foreach' '(' Expr 'as' (Expr '=>')? '&'? Expr ')' Statement
    fn parse_foreach(&mut self) {
        self.start_node(SyntaxKind::FOREACH_STMT);
        self.bump();
        if self.expect(SyntaxKind::L_PAREN) {
            self.parse_expr();
            if self.expect(SyntaxKind::AS_KW) {
                self.eat(SyntaxKind::AMP);
                self.parse_expr();
                if self.eat(SyntaxKind::FAT_ARROW) {
                    self.eat(SyntaxKind::AMP);
                    self.parse_expr();
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.parse_statement();
        self.finish_node();
    }

    /// Switch = 'switch' '(' Expr ')' '{' SwitchCase* '}'
    fn parse_switch(&mut self) {
        self.start_node(SyntaxKind::SWITCH_STMT);
        self.bump();
        self.parse_paren_condition();
        if self.expect(SyntaxKind::L_BRACE) {
            while self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
                self.start_node(SyntaxKind::SWITCH_CASE);
                if self.eat(SyntaxKind::CASE_KW) {
                    self.parse_expr();
                } else {
                    self.bump();
                }
                if !self.eat(SyntaxKind::COLON) {
                    self.expect(SyntaxKind::SEMICOLON);
                }
                while !self.at_eof()
                    && !self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW, SyntaxKind::R_BRACE])
                {
                    let before = self.position();
                    self.parse_statement();
                    if self.position() == before {
                        self.error_recover("unexpected token in switch", &[SyntaxKind::R_BRACE]);
                    }
                }
                self.finish_node();
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// Try = 'try' Block CatchClause* FinallyClause?
    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TRY_STMT);
        self.bump();
        self.parse_block();
        while self.at(SyntaxKind::CATCH_KW) {
            self.start_node(SyntaxKind::CATCH_CLAUSE);
            self.bump();
            if self.expect(SyntaxKind::L_PAREN) {
                self.parse_type();
                self.eat(SyntaxKind::VARIABLE);
                self.expect(SyntaxKind::R_PAREN);
            }
            self.parse_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FINALLY_KW) {
            self.start_node(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }
}
