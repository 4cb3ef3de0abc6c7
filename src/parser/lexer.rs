//! Logos-based lexer for PHP
//!
//! Fast tokenization using the logos crate. Keywords are lexed as identifiers
//! and classified afterwards, since PHP keywords are case-insensitive.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(LogosToken::Name(false)) => keyword_kind(text).unwrap_or(SyntaxKind::IDENT),
            Ok(LogosToken::BlockComment) if text.starts_with("/**") && text.len() > 4 => {
                SyntaxKind::DOC_COMMENT
            }
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Classify an identifier as a keyword (case-insensitively).
fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    if text.len() > 12 {
        return None;
    }
    let lower = text.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "abstract" => SyntaxKind::ABSTRACT_KW,
        "and" => SyntaxKind::AND_KW,
        "array" => SyntaxKind::ARRAY_KW,
        "as" => SyntaxKind::AS_KW,
        "break" => SyntaxKind::BREAK_KW,
        "case" => SyntaxKind::CASE_KW,
        "catch" => SyntaxKind::CATCH_KW,
        "class" => SyntaxKind::CLASS_KW,
        "clone" => SyntaxKind::CLONE_KW,
        "const" => SyntaxKind::CONST_KW,
        "continue" => SyntaxKind::CONTINUE_KW,
        "declare" => SyntaxKind::DECLARE_KW,
        "default" => SyntaxKind::DEFAULT_KW,
        "do" => SyntaxKind::DO_KW,
        "echo" => SyntaxKind::ECHO_KW,
        "else" => SyntaxKind::ELSE_KW,
        "elseif" => SyntaxKind::ELSEIF_KW,
        "enum" => SyntaxKind::ENUM_KW,
        "extends" => SyntaxKind::EXTENDS_KW,
        "final" => SyntaxKind::FINAL_KW,
        "finally" => SyntaxKind::FINALLY_KW,
        "fn" => SyntaxKind::FN_KW,
        "for" => SyntaxKind::FOR_KW,
        "foreach" => SyntaxKind::FOREACH_KW,
        "function" => SyntaxKind::FUNCTION_KW,
        "global" => SyntaxKind::GLOBAL_KW,
        "if" => SyntaxKind::IF_KW,
        "implements" => SyntaxKind::IMPLEMENTS_KW,
        "include" | "include_once" | "require" | "require_once" => SyntaxKind::INCLUDE_KW,
        "instanceof" => SyntaxKind::INSTANCEOF_KW,
        "insteadof" => SyntaxKind::INSTEADOF_KW,
        "interface" => SyntaxKind::INTERFACE_KW,
        "match" => SyntaxKind::MATCH_KW,
        "namespace" => SyntaxKind::NAMESPACE_KW,
        "new" => SyntaxKind::NEW_KW,
        "or" => SyntaxKind::OR_KW,
        "print" => SyntaxKind::PRINT_KW,
        "private" => SyntaxKind::PRIVATE_KW,
        "protected" => SyntaxKind::PROTECTED_KW,
        "public" => SyntaxKind::PUBLIC_KW,
        "readonly" => SyntaxKind::READONLY_KW,
        "return" => SyntaxKind::RETURN_KW,
        "static" => SyntaxKind::STATIC_KW,
        "switch" => SyntaxKind::SWITCH_KW,
        "throw" => SyntaxKind::THROW_KW,
        "trait" => SyntaxKind::TRAIT_KW,
        "try" => SyntaxKind::TRY_KW,
        "use" => SyntaxKind::USE_KW,
        "var" => SyntaxKind::VAR_KW,
        "while" => SyntaxKind::WHILE_KW,
        "xor" => SyntaxKind::XOR_KW,
        "yield" => SyntaxKind::YIELD_KW,
        _ => return None,
    };
    Some(kind)
}

/// Consume a heredoc/nowdoc body up to and including its closing label.
fn heredoc(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let opener = lex.slice();
    let label: String = opener
        .trim_start_matches("<<<")
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string();
    let rest = lex.remainder();

    let mut consumed = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(label.as_str()) {
            let ends_label = after
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
            if ends_label {
                let indent = line.len() - trimmed.len();
                lex.bump(consumed + indent + label.len());
                return true;
            }
        }
        consumed += line.len();
    }
    false
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic() || u32::from(c) >= 0x80
}

fn is_name_continue(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

/// Extend a name over further `\Segment`s. A `\` not followed by a name
/// (the `\{` of a grouped `use`) is left for the next token.
fn name_segments(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let mut qualified = lex.slice().starts_with('\\');
    loop {
        let Some(after) = lex.remainder().strip_prefix('\\') else {
            break;
        };
        let mut chars = after.char_indices();
        if !chars.next().is_some_and(|(_, c)| is_name_start(c)) {
            break;
        }
        let len = chars
            .find(|&(_, c)| !is_name_continue(c))
            .map_or(after.len(), |(i, _)| i);
        lex.bump(1 + len);
        qualified = true;
    }
    qualified
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    #[regex(r"#([^\[\n][^\n]*)?")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockComment,

    #[regex(r"<\?[pP][hH][pP]")]
    #[token("<?=")]
    OpenTag,

    #[token("?>")]
    CloseTag,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    /// `true` for namespaced names; see [`name_segments`]
    #[regex(r"[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*", name_segments)]
    #[regex(r"\\[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*", name_segments)]
    Name(bool),

    #[regex(r"\$[a-zA-Z_\u{80}-\u{10FFFF}][a-zA-Z0-9_\u{80}-\u{10FFFF}]*")]
    Variable,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"'([^'\\]|\\(.|\n))*'")]
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    #[regex(r"`[^`]*`")]
    #[regex(r#"<<<[ \t]*(['"]?)[a-zA-Z_][a-zA-Z0-9_]*(['"]?)\r?\n"#, heredoc)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (longest match wins)
    // =========================================================================
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("=>")]
    FatArrow,
    #[token("...")]
    Ellipsis,
    #[token("??")]
    QuestionQuestion,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    #[token("<>")]
    BangEq,
    #[token("!==")]
    BangEqEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<=>")]
    Spaceship,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token(".=")]
    #[token("%=")]
    #[token("**=")]
    #[token("??=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    AssignOp,
    #[token("#[")]
    HashBracket,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("\\")]
    Backslash,
    #[token("$")]
    Dollar,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(".")]
    Dot,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            OpenTag => SyntaxKind::OPEN_TAG,
            CloseTag => SyntaxKind::CLOSE_TAG,

            // Literals and names
            Name(false) => SyntaxKind::IDENT,
            Name(true) => SyntaxKind::QUALIFIED_NAME,
            Variable => SyntaxKind::VARIABLE,
            Integer => SyntaxKind::INTEGER,
            Float => SyntaxKind::FLOAT,
            String => SyntaxKind::STRING,

            // Multi-char punctuation
            ColonColon => SyntaxKind::COLON_COLON,
            Arrow => SyntaxKind::ARROW,
            NullsafeArrow => SyntaxKind::NULLSAFE_ARROW,
            FatArrow => SyntaxKind::FAT_ARROW,
            Ellipsis => SyntaxKind::ELLIPSIS,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            EqEq => SyntaxKind::EQ_EQ,
            EqEqEq => SyntaxKind::EQ_EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            BangEqEq => SyntaxKind::BANG_EQ_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            Spaceship => SyntaxKind::SPACESHIP,
            StarStar => SyntaxKind::STAR_STAR,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            Shl => SyntaxKind::SHL,
            Shr => SyntaxKind::SHR,
            AssignOp => SyntaxKind::ASSIGN_OP,
            HashBracket => SyntaxKind::HASH_BRACKET,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            Colon => SyntaxKind::COLON,
            Backslash => SyntaxKind::BACKSLASH,
            Dollar => SyntaxKind::DOLLAR,
            Question => SyntaxKind::QUESTION,
            At => SyntaxKind::AT,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Dot => SyntaxKind::DOT,
            Bang => SyntaxKind::BANG,
            Tilde => SyntaxKind::TILDE,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input)
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_class_header() {
        let tokens: Vec<_> = Lexer::new("class A {}").collect();
        assert_eq!(tokens.len(), 6); // class, ws, A, ws, {, }
        assert_eq!(tokens[0].kind, SyntaxKind::CLASS_KW);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[2].offset, TextSize::new(6));
        assert_eq!(tokens[4].kind, SyntaxKind::L_BRACE);
    }

    #[test]
    fn test_lex_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("CLASS Function NEW"),
            vec![SyntaxKind::CLASS_KW, SyntaxKind::FUNCTION_KW, SyntaxKind::NEW_KW]
        );
    }

    #[test]
    fn test_lex_member_access() {
        assert_eq!(
            kinds("$b->foo();"),
            vec![
                SyntaxKind::VARIABLE,
                SyntaxKind::ARROW,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::SEMICOLON,
            ]
        );
        assert_eq!(kinds("$a?->b")[1], SyntaxKind::NULLSAFE_ARROW);
    }

    #[test]
    fn test_lex_qualified_names() {
        assert_eq!(kinds("App\\Models\\User"), vec![SyntaxKind::QUALIFIED_NAME]);
        assert_eq!(kinds("\\DateTime"), vec![SyntaxKind::QUALIFIED_NAME]);
        assert_eq!(
            kinds("Foo::BAR"),
            vec![SyntaxKind::IDENT, SyntaxKind::COLON_COLON, SyntaxKind::IDENT]
        );
    }

    #[test]
    fn test_lex_group_prefix_stops_at_backslash() {
        let tokens = tokenize("App\\Models\\{User}");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["App\\Models", "\\", "{", "User", "}"]);
        assert_eq!(tokens[0].kind, SyntaxKind::QUALIFIED_NAME);
        assert_eq!(tokens[1].kind, SyntaxKind::BACKSLASH);
    }

    #[test]
    fn test_lex_keywords_stay_keywords() {
        assert_eq!(kinds("class"), vec![SyntaxKind::CLASS_KW]);
        assert_eq!(kinds("Foo\\class"), vec![SyntaxKind::QUALIFIED_NAME]);
    }

    #[test]
    fn test_lex_trivia() {
        let tokens = tokenize("<?php\n// note\n# hash\n/** doc */ /* block */ ?>");
        let trivia: Vec<_> = tokens.iter().map(|t| t.kind).filter(|k| k.is_trivia()).collect();
        assert_eq!(trivia.len(), tokens.len());
        assert!(trivia.contains(&SyntaxKind::DOC_COMMENT));
        assert!(trivia.contains(&SyntaxKind::BLOCK_COMMENT));
        assert!(trivia.contains(&SyntaxKind::OPEN_TAG));
        assert!(trivia.contains(&SyntaxKind::CLOSE_TAG));
    }

    #[test]
    fn test_lex_attribute_is_not_comment() {
        assert_eq!(kinds("#[Pure]")[0], SyntaxKind::HASH_BRACKET);
    }

    #[test]
    fn test_lex_strings_and_casts() {
        // Casts are recognised by the parser; the lexer sees plain parentheses
        assert_eq!(
            kinds(r#"'it\'s' "a $b" (int) 1.5 0x1F"#),
            vec![
                SyntaxKind::STRING,
                SyntaxKind::STRING,
                SyntaxKind::L_PAREN,
                SyntaxKind::IDENT,
                SyntaxKind::R_PAREN,
                SyntaxKind::FLOAT,
                SyntaxKind::INTEGER,
            ]
        );
    }

    #[test]
    fn test_lex_spaced_parentheses() {
        assert_eq!(
            kinds("foo( $x ) ( int )"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::VARIABLE,
                SyntaxKind::R_PAREN,
                SyntaxKind::L_PAREN,
                SyntaxKind::IDENT,
                SyntaxKind::R_PAREN,
            ]
        );
    }

    #[test]
    fn test_lex_heredoc() {
        let input = "$a = <<<EOT\nhello $name\n  EOT;\n$b;";
        assert_eq!(
            kinds(input),
            vec![
                SyntaxKind::VARIABLE,
                SyntaxKind::EQ,
                SyntaxKind::STRING,
                SyntaxKind::SEMICOLON,
                SyntaxKind::VARIABLE,
                SyntaxKind::SEMICOLON,
            ]
        );
    }

    #[test]
    fn test_lex_assign_operators() {
        assert_eq!(kinds("$a .= $b")[1], SyntaxKind::ASSIGN_OP);
        assert_eq!(kinds("$a ??= $b")[1], SyntaxKind::ASSIGN_OP);
    }
}
