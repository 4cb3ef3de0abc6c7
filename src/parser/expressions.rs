//! Expression grammar
//!
//! Pratt parser over binding powers. Postfix operators (`->`, `::`, calls,
//! indexing) bind tightest and are folded onto the primary expression with
//! rowan checkpoints, so `$a->b()->c` nests as `CALL(MEMBER(CALL(MEMBER($a))))`.

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

/// Tokens that end an expression; never swallowed by error recovery.
const EXPR_TERMINATORS: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
    SyntaxKind::L_BRACE,
    SyntaxKind::COMMA,
    SyntaxKind::FAT_ARROW,
    SyntaxKind::COLON,
];

/// Type names accepted inside a cast
const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "array",
    "object", "unset", "binary",
];

/// Binding power of prefix operators
const PREFIX_UNARY_BP: u8 = 38;
const PREFIX_NOT_BP: u8 = 35;
const PREFIX_LOW_BP: u8 = 7;

/// Binding powers of infix operators: (left, right, node kind)
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8, SyntaxKind)> {
    use SyntaxKind::*;
    let bp = match kind {
        OR_KW => (1, 2, BINARY_EXPR),
        XOR_KW => (3, 4, BINARY_EXPR),
        AND_KW => (5, 6, BINARY_EXPR),
        EQ | ASSIGN_OP => (8, 7, ASSIGN_EXPR),
        QUESTION => (10, 11, TERNARY_EXPR),
        QUESTION_QUESTION => (13, 12, BINARY_EXPR),
        PIPE_PIPE => (14, 15, BINARY_EXPR),
        AMP_AMP => (16, 17, BINARY_EXPR),
        PIPE => (18, 19, BINARY_EXPR),
        CARET => (20, 21, BINARY_EXPR),
        AMP => (22, 23, BINARY_EXPR),
        EQ_EQ | EQ_EQ_EQ | BANG_EQ | BANG_EQ_EQ | SPACESHIP => (24, 25, BINARY_EXPR),
        LT | GT | LT_EQ | GT_EQ => (26, 27, BINARY_EXPR),
        DOT => (28, 29, BINARY_EXPR),
        SHL | SHR => (30, 31, BINARY_EXPR),
        PLUS | MINUS => (32, 33, BINARY_EXPR),
        STAR | SLASH | PERCENT => (34, 35, BINARY_EXPR),
        INSTANCEOF_KW => (36, 37, BINARY_EXPR),
        STAR_STAR => (40, 39, BINARY_EXPR),
        _ => return None,
    };
    Some(bp)
}

impl Parser<'_> {
    /// Expr = Unary (InfixOp Expr)*
    pub(super) fn parse_expr(&mut self) {
        self.parse_expr_bp(0);
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_unary() {
            return false;
        }

        loop {
            let kind = self.current_kind();
            let Some((l_bp, r_bp, node)) = infix_binding_power(kind) else {
                break;
            };
            if self.at_eof() || l_bp < min_bp {
                break;
            }

            self.start_node_at(checkpoint, node);
            self.bump();
            match kind {
                SyntaxKind::QUESTION => {
                    // `a ? b : c` and the short `a ?: c`
                    if !self.at(SyntaxKind::COLON) {
                        self.parse_expr_bp(0);
                    }
                    if self.expect(SyntaxKind::COLON) {
                        self.parse_expr_bp(r_bp);
                    }
                }
                SyntaxKind::EQ => {
                    self.eat(SyntaxKind::AMP);
                    self.parse_operand(r_bp);
                }
                SyntaxKind::INSTANCEOF_KW if self.at_class_name() => {
                    self.parse_name_ref();
                }
                _ => self.parse_operand(r_bp),
            }
            self.finish_node();
        }
        true
    }

    /// Operand of an operator; a missing operand is reported by `parse_primary`
    fn parse_operand(&mut self, bp: u8) {
        self.parse_expr_bp(bp);
    }

    /// `(int)`, `( string )`, ...: a parenthesised cast type
    fn at_cast(&self) -> bool {
        self.at(SyntaxKind::L_PAREN)
            && matches!(self.nth(1), SyntaxKind::IDENT | SyntaxKind::ARRAY_KW)
            && self.nth(2) == SyntaxKind::R_PAREN
            && CAST_TYPES.contains(&self.nth_text(1).to_ascii_lowercase().as_str())
    }

    fn at_class_name(&self) -> bool {
        matches!(
            self.current_kind(),
            SyntaxKind::IDENT | SyntaxKind::QUALIFIED_NAME | SyntaxKind::STATIC_KW
        )
    }

    /// Unary = PrefixOp Unary | Cast Unary | Postfix
    fn parse_unary(&mut self) -> bool {
        if self.at_cast() {
            self.start_node(SyntaxKind::UNARY_EXPR);
            self.start_node(SyntaxKind::CAST);
            self.bump();
            self.bump();
            self.bump();
            self.finish_node();
            self.parse_operand(PREFIX_UNARY_BP);
            self.finish_node();
            return true;
        }
        let bp = match self.current_kind() {
            SyntaxKind::BANG => PREFIX_NOT_BP,
            SyntaxKind::MINUS
            | SyntaxKind::PLUS
            | SyntaxKind::TILDE
            | SyntaxKind::AT
            | SyntaxKind::PLUS_PLUS
            | SyntaxKind::MINUS_MINUS
            | SyntaxKind::CLONE_KW
            | SyntaxKind::AMP => PREFIX_UNARY_BP,
            SyntaxKind::PRINT_KW | SyntaxKind::THROW_KW | SyntaxKind::INCLUDE_KW => PREFIX_LOW_BP,
            SyntaxKind::YIELD_KW => {
                self.parse_yield();
                return true;
            }
            _ => return self.parse_postfix(),
        };
        if self.at_eof() {
            return false;
        }
        self.start_node(SyntaxKind::UNARY_EXPR);
        self.bump();
        self.parse_operand(bp);
        self.finish_node();
        true
    }

    /// Yield = 'yield' ('from')? (Expr ('=>' Expr)?)?
    fn parse_yield(&mut self) {
        self.start_node(SyntaxKind::UNARY_EXPR);
        self.bump();
        if self.at(SyntaxKind::IDENT) && self.current_text().eq_ignore_ascii_case("from") {
            self.bump();
        }
        if !self.at_eof() && !self.at_any(EXPR_TERMINATORS) {
            self.parse_expr_bp(PREFIX_LOW_BP);
            if self.eat(SyntaxKind::FAT_ARROW) {
                self.parse_operand(PREFIX_LOW_BP);
            }
        }
        self.finish_node();
    }

    /// Postfix = Primary ('->' Name | '::' Name | ArgList | '[' Expr? ']' | '++' | '--')*
    fn parse_postfix(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_primary() {
            return false;
        }

        loop {
            match self.current_kind() {
                _ if self.at_eof() => break,
                SyntaxKind::ARROW | SyntaxKind::NULLSAFE_ARROW => {
                    self.start_node_at(checkpoint, SyntaxKind::MEMBER_ACCESS_EXPR);
                    self.bump();
                    self.parse_member_name();
                    self.finish_node();
                }
                SyntaxKind::COLON_COLON => {
                    self.start_node_at(checkpoint, SyntaxKind::STATIC_ACCESS_EXPR);
                    self.bump();
                    self.parse_static_member_name();
                    self.finish_node();
                }
                SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                    self.parse_arg_list();
                    self.finish_node();
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                    self.bump();
                    if !self.at(SyntaxKind::R_BRACKET) {
                        self.parse_expr();
                    }
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                }
                SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                    self.start_node_at(checkpoint, SyntaxKind::POSTFIX_EXPR);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
        true
    }

    /// Name after `->`: identifier (keywords allowed), `$var` or `{expr}`
    fn parse_member_name(&mut self) {
        match self.current_kind() {
            kind if kind.is_member_name() => self.bump_remap(SyntaxKind::IDENT),
            SyntaxKind::VARIABLE => self.parse_variable(),
            SyntaxKind::L_BRACE => self.parse_braced_member_name(),
            _ => self.error("expected member name"),
        }
    }

    /// Name after `::`: identifier, `$static_prop`, `class` or `{expr}`
    fn parse_static_member_name(&mut self) {
        match self.current_kind() {
            SyntaxKind::CLASS_KW => self.bump(),
            SyntaxKind::VARIABLE => self.bump(),
            kind if kind.is_member_name() => self.bump_remap(SyntaxKind::IDENT),
            SyntaxKind::L_BRACE => self.parse_braced_member_name(),
            SyntaxKind::DOLLAR => self.parse_variable(),
            _ => self.error("expected member name"),
        }
    }

    fn parse_braced_member_name(&mut self) {
        self.start_node(SyntaxKind::MEMBER_NAME_EXPR);
        self.bump();
        self.parse_expr();
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// ArgList = '(' (Arg (',' Arg)* ','?)? ')'
    pub(super) fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        self.bump();
        // First-class callable syntax: `strlen(...)`
        if self.at(SyntaxKind::ELLIPSIS) && self.nth(1) == SyntaxKind::R_PAREN {
            self.bump();
        }
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            let before = self.position();
            self.parse_arg();
            if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_PAREN) {
                self.error_recover(
                    "expected ',' or ')'",
                    &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON],
                );
                if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_PAREN) {
                    break;
                }
            }
            if self.position() == before {
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Arg = '...'? (Name ':')? Expr
    fn parse_arg(&mut self) {
        self.start_node(SyntaxKind::ARG);
        self.eat(SyntaxKind::ELLIPSIS);
        if self.current_kind().is_member_name() && self.nth(1) == SyntaxKind::COLON {
            self.bump_remap(SyntaxKind::IDENT);
            self.bump();
        }
        self.parse_operand(0);
        self.finish_node();
    }

    /// Primary = Variable | Name | Literal | Array | '(' Expr ')' | New
    ///         | Closure | ArrowFn | Match
    fn parse_primary(&mut self) -> bool {
        match self.current_kind() {
            _ if self.at_eof() => {
                self.error("expected expression");
                false
            }
            SyntaxKind::VARIABLE | SyntaxKind::DOLLAR => {
                self.parse_variable();
                true
            }
            SyntaxKind::INTEGER | SyntaxKind::FLOAT | SyntaxKind::STRING => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::L_BRACKET => {
                self.parse_array(SyntaxKind::R_BRACKET);
                true
            }
            SyntaxKind::ARRAY_KW if self.nth(1) == SyntaxKind::L_PAREN => {
                self.parse_array(SyntaxKind::R_PAREN);
                true
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.parse_operand(0);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
                true
            }
            SyntaxKind::NEW_KW => {
                self.parse_new();
                true
            }
            SyntaxKind::FUNCTION_KW => {
                self.parse_closure();
                true
            }
            SyntaxKind::FN_KW => {
                self.parse_arrow_fn();
                true
            }
            SyntaxKind::STATIC_KW
                if matches!(self.nth(1), SyntaxKind::FUNCTION_KW | SyntaxKind::FN_KW) =>
            {
                if self.nth(1) == SyntaxKind::FN_KW {
                    self.parse_arrow_fn();
                } else {
                    self.parse_closure();
                }
                true
            }
            SyntaxKind::HASH_BRACKET => {
                // Attributes on closures: `#[Pure] fn($x) => $x`
                while self.at(SyntaxKind::HASH_BRACKET) {
                    self.parse_attribute_group();
                }
                self.parse_primary()
            }
            SyntaxKind::MATCH_KW if self.nth(1) == SyntaxKind::L_PAREN => {
                self.parse_match();
                true
            }
            SyntaxKind::IDENT | SyntaxKind::QUALIFIED_NAME | SyntaxKind::STATIC_KW => {
                self.parse_name_ref();
                true
            }
            SyntaxKind::NAMESPACE_KW if self.nth(1) == SyntaxKind::BACKSLASH => {
                // `namespace\foo()` relative names
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                self.bump();
                if self.current_kind().is_member_name() || self.at(SyntaxKind::QUALIFIED_NAME) {
                    self.bump_remap(SyntaxKind::QUALIFIED_NAME);
                }
                self.finish_node();
                true
            }
            kind if kind.is_keyword() && self.nth(1) == SyntaxKind::L_PAREN => {
                // Soft keywords used as function names: `list(...)`, `readonly()`
                self.parse_name_ref();
                true
            }
            kind if EXPR_TERMINATORS.contains(&kind) => {
                self.error("expected expression");
                false
            }
            kind => {
                self.error(format!("unexpected token in expression: {:?}", kind));
                self.start_node(SyntaxKind::ERROR);
                self.bump();
                self.finish_node();
                true
            }
        }
    }

    /// Variable = '$name' | '$' Variable | '${' Expr '}'
    fn parse_variable(&mut self) {
        self.start_node(SyntaxKind::VARIABLE_EXPR);
        if self.eat(SyntaxKind::DOLLAR) {
            if self.at(SyntaxKind::L_BRACE) {
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::R_BRACE);
            } else if self.at_any(&[SyntaxKind::VARIABLE, SyntaxKind::DOLLAR]) {
                self.parse_variable();
            } else {
                self.error("expected variable");
            }
        } else {
            self.bump();
        }
        self.finish_node();
    }

    /// Array = '[' ArrayElement (',' ArrayElement)* ']' | 'array' '(' ... ')'
    fn parse_array(&mut self, closing: SyntaxKind) {
        self.start_node(SyntaxKind::ARRAY_EXPR);
        if closing == SyntaxKind::R_PAREN {
            self.bump(); // array
        }
        self.bump();
        while !self.at_eof() && !self.at(closing) {
            let before = self.position();
            if self.at(SyntaxKind::COMMA) {
                // Skipped slot in list destructuring: `[, $b] = $pair`
                self.bump();
                continue;
            }
            self.start_node(SyntaxKind::ARRAY_ELEMENT);
            self.eat(SyntaxKind::ELLIPSIS);
            self.eat(SyntaxKind::AMP);
            self.parse_operand(0);
            if self.eat(SyntaxKind::FAT_ARROW) {
                self.eat(SyntaxKind::AMP);
                self.parse_operand(0);
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) && !self.at(closing) {
                self.error_recover("expected ',' in array", &[SyntaxKind::COMMA, closing]);
                self.eat(SyntaxKind::COMMA);
            }
            if self.position() == before {
                break;
            }
        }
        self.expect(closing);
        self.finish_node();
    }

    /// New = 'new' (ClassRef ArgList? | AnonClass)
    fn parse_new(&mut self) {
        self.start_node(SyntaxKind::NEW_EXPR);
        self.bump();
        match self.current_kind() {
            SyntaxKind::CLASS_KW => {
                self.parse_anon_class();
                self.finish_node();
                return;
            }
            SyntaxKind::HASH_BRACKET if self.nth_after_attributes_is_class() => {
                self.parse_anon_class();
                self.finish_node();
                return;
            }
            SyntaxKind::IDENT | SyntaxKind::QUALIFIED_NAME | SyntaxKind::STATIC_KW => {
                self.parse_name_ref()
            }
            SyntaxKind::VARIABLE | SyntaxKind::DOLLAR => self.parse_variable(),
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.parse_operand(0);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            _ => self.error("expected class name after 'new'"),
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        }
        self.finish_node();
    }

    fn nth_after_attributes_is_class(&self) -> bool {
        let mut n = 0;
        let mut depth = 0usize;
        loop {
            match self.nth(n) {
                SyntaxKind::HASH_BRACKET | SyntaxKind::L_BRACKET => depth += 1,
                SyntaxKind::R_BRACKET => depth = depth.saturating_sub(1),
                SyntaxKind::CLASS_KW if depth == 0 => return true,
                SyntaxKind::ERROR => return false,
                _ if depth == 0 => return false,
                _ => {}
            }
            n += 1;
        }
    }

    /// AnonClass = Attributes? 'class' ArgList? Extends? Implements? ClassBody
    fn parse_anon_class(&mut self) {
        self.start_node(SyntaxKind::ANON_CLASS);
        while self.at(SyntaxKind::HASH_BRACKET) {
            self.parse_attribute_group();
        }
        self.bump(); // class
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        }
        if self.at(SyntaxKind::EXTENDS_KW) {
            self.start_node(SyntaxKind::EXTENDS_CLAUSE);
            self.bump();
            self.parse_name_ref();
            self.finish_node();
        }
        if self.at(SyntaxKind::IMPLEMENTS_KW) {
            self.start_node(SyntaxKind::IMPLEMENTS_CLAUSE);
            self.bump();
            self.parse_name_ref();
            while self.eat(SyntaxKind::COMMA) {
                self.parse_name_ref();
            }
            self.finish_node();
        }
        self.parse_class_body();
        self.finish_node();
    }

    /// Closure = 'static'? 'function' '&'? ParamList ClosureUse? ReturnType? Block
    fn parse_closure(&mut self) {
        self.start_node(SyntaxKind::CLOSURE_EXPR);
        self.eat(SyntaxKind::STATIC_KW);
        self.bump(); // function
        self.eat(SyntaxKind::AMP);
        self.parse_param_list();
        if self.at(SyntaxKind::USE_KW) {
            self.start_node(SyntaxKind::CLOSURE_USE);
            self.bump();
            if self.expect(SyntaxKind::L_PAREN) {
                while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                    self.eat(SyntaxKind::AMP);
                    if !self.at(SyntaxKind::VARIABLE) {
                        self.error_recover("expected variable", &[SyntaxKind::R_PAREN]);
                        break;
                    }
                    self.parse_variable();
                    if !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
                self.expect(SyntaxKind::R_PAREN);
            }
            self.finish_node();
        }
        if self.at(SyntaxKind::COLON) {
            self.parse_return_type();
        }
        self.parse_block();
        self.finish_node();
    }

    /// ArrowFn = 'static'? 'fn' '&'? ParamList ReturnType? '=>' Expr
    fn parse_arrow_fn(&mut self) {
        self.start_node(SyntaxKind::ARROW_FN_EXPR);
        self.eat(SyntaxKind::STATIC_KW);
        self.bump(); // fn
        self.eat(SyntaxKind::AMP);
        self.parse_param_list();
        if self.at(SyntaxKind::COLON) {
            self.parse_return_type();
        }
        if self.expect(SyntaxKind::FAT_ARROW) {
            self.parse_operand(0);
        }
        self.finish_node();
    }

    /// Match = 'match' '(' Expr ')' '{' MatchArm (',' MatchArm)* ','? '}'
    fn parse_match(&mut self) {
        self.start_node(SyntaxKind::MATCH_EXPR);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        self.parse_operand(0);
        self.expect(SyntaxKind::R_PAREN);
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                let before = self.position();
                self.start_node(SyntaxKind::MATCH_ARM);
                if !self.eat(SyntaxKind::DEFAULT_KW) {
                    loop {
                        self.parse_operand(0);
                        if !self.eat(SyntaxKind::COMMA) || self.at(SyntaxKind::FAT_ARROW) {
                            break;
                        }
                    }
                }
                if self.expect(SyntaxKind::FAT_ARROW) {
                    self.parse_operand(0);
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) && !self.at(SyntaxKind::R_BRACE) {
                    self.error_recover("expected ',' in match", &[SyntaxKind::COMMA, SyntaxKind::R_BRACE]);
                    self.eat(SyntaxKind::COMMA);
                }
                if self.position() == before {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }
}
