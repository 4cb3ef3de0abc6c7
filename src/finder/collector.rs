//! Syntax-only gathering of nodes that could reference a member.

use rowan::{TextRange, TextSize};
use tracing::trace;

use crate::base::MemberKind;
use crate::parser::{
    AstNode, ClassConstDecl, ConstElement, EnumCase, MemberAccessExpr, MethodDecl, Param,
    PropertyElement, StaticAccessExpr, SyntaxKind, SyntaxNode, SyntaxToken,
};

use super::query::ClassMemberQuery;

/// A node structurally capable of referencing a member, before semantic checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Candidate {
    /// Method, property (element or promoted parameter), class constant or enum case
    Declaration { kind: MemberKind, node: SyntaxNode },
    /// `$expr->member` or `$expr?->member`
    InstanceAccess { kind: MemberKind, node: SyntaxNode },
    /// `Qualifier::member`
    StaticAccess { kind: MemberKind, node: SyntaxNode },
}

/// How a candidate names its member
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameSyntax {
    Literal(SyntaxToken),
    /// `$obj->$name`, `$obj->{'na' . 'me'}`, `Foo::$name()`
    Dynamic(TextRange),
    /// Lost to a syntax error
    Missing,
}

impl NameSyntax {
    /// Text of a literal name without the leading `$`
    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            NameSyntax::Literal(token) => Some(token.text().trim_start_matches('$')),
            _ => None,
        }
    }

    /// Range of the name, excluding a leading `$`
    pub(crate) fn range(&self) -> Option<TextRange> {
        match self {
            NameSyntax::Literal(token) => {
                let range = token.text_range();
                if token.text().starts_with('$') {
                    Some(TextRange::new(range.start() + TextSize::of('$'), range.end()))
                } else {
                    Some(range)
                }
            }
            NameSyntax::Dynamic(range) => Some(*range),
            NameSyntax::Missing => None,
        }
    }
}

impl Candidate {
    pub fn kind(&self) -> MemberKind {
        match self {
            Candidate::Declaration { kind, .. }
            | Candidate::InstanceAccess { kind, .. }
            | Candidate::StaticAccess { kind, .. } => *kind,
        }
    }

    pub fn node(&self) -> &SyntaxNode {
        match self {
            Candidate::Declaration { node, .. }
            | Candidate::InstanceAccess { node, .. }
            | Candidate::StaticAccess { node, .. } => node,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, Candidate::Declaration { .. })
    }

    pub(crate) fn name(&self) -> NameSyntax {
        match self {
            Candidate::Declaration { node, .. } => declaration_name(node),
            Candidate::InstanceAccess { node, .. } => instance_name(node),
            Candidate::StaticAccess { node, .. } => static_name(node),
        }
    }

    /// Start of the member name, or of the node when the name is missing
    fn position(&self) -> TextSize {
        self.name()
            .range()
            .map(|r| r.start())
            .unwrap_or_else(|| self.node().text_range().end())
    }
}

fn declaration_name(node: &SyntaxNode) -> NameSyntax {
    let token = match node.kind() {
        SyntaxKind::METHOD_DECL => MethodDecl::cast(node.clone()).and_then(|m| m.name_token()),
        SyntaxKind::PROPERTY_ELEMENT => {
            PropertyElement::cast(node.clone()).and_then(|p| p.variable_token())
        }
        SyntaxKind::PARAM => Param::cast(node.clone()).and_then(|p| p.variable_token()),
        SyntaxKind::CONST_ELEMENT => ConstElement::cast(node.clone()).and_then(|c| c.name_token()),
        SyntaxKind::ENUM_CASE => EnumCase::cast(node.clone()).and_then(|c| c.name_token()),
        _ => None,
    };
    token.map_or(NameSyntax::Missing, NameSyntax::Literal)
}

fn instance_name(node: &SyntaxNode) -> NameSyntax {
    if let Some(token) = MemberAccessExpr::cast(node.clone()).and_then(|a| a.name_token()) {
        return NameSyntax::Literal(token);
    }
    dynamic_name_after(node, |k| matches!(k, SyntaxKind::ARROW | SyntaxKind::NULLSAFE_ARROW))
}

fn static_name(node: &SyntaxNode) -> NameSyntax {
    match StaticAccessExpr::cast(node.clone()).and_then(|a| a.name_token()) {
        // `Foo::$method()` calls the method named by the variable's value
        Some(token) if token.kind() == SyntaxKind::VARIABLE && is_callee(node) => {
            NameSyntax::Dynamic(token.text_range())
        }
        Some(token) => NameSyntax::Literal(token),
        None => dynamic_name_after(node, |k| k == SyntaxKind::COLON_COLON),
    }
}

/// The computed-name node following the access operator, if any
fn dynamic_name_after(node: &SyntaxNode, is_operator: impl Fn(SyntaxKind) -> bool) -> NameSyntax {
    node.children_with_tokens()
        .skip_while(|e| !is_operator(e.kind()))
        .skip(1)
        .find_map(|e| e.into_node())
        .map_or(NameSyntax::Missing, |n| NameSyntax::Dynamic(n.text_range()))
}

/// Whether `node` is the callee of a call expression
fn is_callee(node: &SyntaxNode) -> bool {
    node.parent().is_some_and(|parent| {
        parent.kind() == SyntaxKind::CALL_EXPR && parent.first_child().as_ref() == Some(node)
    })
}

/// Collects candidates matching a query's kind and name filters.
pub struct CandidateCollector<'q> {
    query: &'q ClassMemberQuery,
    include_declarations: bool,
}

impl<'q> CandidateCollector<'q> {
    pub fn new(query: &'q ClassMemberQuery, include_declarations: bool) -> Self {
        Self {
            query,
            include_declarations,
        }
    }

    /// Candidates under `root`, ordered by the position of their member name
    pub fn collect(&self, root: &SyntaxNode) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = root
            .descendants()
            .filter_map(|node| self.candidate(node))
            .filter(|candidate| self.name_matches(candidate))
            .collect();
        candidates.sort_by_key(Candidate::position);
        trace!(count = candidates.len(), "collected candidates");
        candidates
    }

    fn candidate(&self, node: SyntaxNode) -> Option<Candidate> {
        let candidate = match node.kind() {
            SyntaxKind::METHOD_DECL => Candidate::Declaration {
                kind: MemberKind::Method,
                node,
            },
            SyntaxKind::PROPERTY_ELEMENT => Candidate::Declaration {
                kind: MemberKind::Property,
                node,
            },
            SyntaxKind::PARAM if is_promoted_param(&node) => Candidate::Declaration {
                kind: MemberKind::Property,
                node,
            },
            SyntaxKind::CONST_ELEMENT
                if node.parent().and_then(ClassConstDecl::cast).is_some() =>
            {
                Candidate::Declaration {
                    kind: MemberKind::Constant,
                    node,
                }
            }
            SyntaxKind::ENUM_CASE => Candidate::Declaration {
                kind: MemberKind::Constant,
                node,
            },
            SyntaxKind::MEMBER_ACCESS_EXPR => {
                let kind = if is_callee(&node) {
                    MemberKind::Method
                } else {
                    MemberKind::Property
                };
                Candidate::InstanceAccess { kind, node }
            }
            SyntaxKind::STATIC_ACCESS_EXPR => {
                let access = StaticAccessExpr::cast(node.clone())?;
                if access.is_class_constant() {
                    return None;
                }
                let kind = match access.name_token() {
                    Some(token) if token.kind() == SyntaxKind::VARIABLE && !is_callee(&node) => {
                        MemberKind::Property
                    }
                    _ if is_callee(&node) => MemberKind::Method,
                    _ => MemberKind::Constant,
                };
                Candidate::StaticAccess { kind, node }
            }
            _ => return None,
        };

        if candidate.is_declaration() && !self.include_declarations {
            return None;
        }
        self.query.matches_kind(candidate.kind()).then_some(candidate)
    }

    fn name_matches(&self, candidate: &Candidate) -> bool {
        if !self.query.has_member() {
            return true;
        }
        candidate
            .name()
            .text()
            .is_some_and(|name| self.query.matches_member_name(name))
    }
}

/// `public function __construct(private Foo $foo)`
fn is_promoted_param(node: &SyntaxNode) -> bool {
    let in_method = node
        .parent()
        .and_then(|list| list.parent())
        .is_some_and(|owner| owner.kind() == SyntaxKind::METHOD_DECL);
    in_method && Param::cast(node.clone()).is_some_and(|p| p.is_promoted())
}
