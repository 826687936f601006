use tidal_syntax::ast::{AstNode as _, DeclName};
use tidal_syntax::{ScopeKind, SyntaxNode, WalkEvent};

/// A node that opens a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope<'a> {
    kind: ScopeKind,
    node: SyntaxNode<'a>,
}

impl<'a> Scope<'a> {
    pub fn of(node: SyntaxNode<'a>) -> Option<Self> {
        Some(Self { kind: node.kind().scope_kind()?, node })
    }

    pub fn kind(self) -> ScopeKind {
        self.kind
    }

    pub fn node(self) -> SyntaxNode<'a> {
        self.node
    }

    /// Declarations made directly in this scope, in source order.
    /// Declarations inside nested scopes are not part of it.
    pub fn declarations(self) -> impl Iterator<Item = DeclName<'a>> {
        let mut preorder = self.node.preorder();
        std::iter::from_fn(move || {
            loop {
                match preorder.next()? {
                    WalkEvent::Enter(node) if node != self.node && node.kind().is_scope() => {
                        preorder.skip_subtree();
                    }
                    WalkEvent::Enter(node) => {
                        if let Some(decl) = DeclName::cast(node) {
                            return Some(decl);
                        }
                    }
                    WalkEvent::Leave(_) => {}
                }
            }
        })
    }
}

/// Scopes strictly enclosing `node`, innermost first.
pub fn scope_chain(node: SyntaxNode<'_>) -> impl Iterator<Item = Scope<'_>> {
    node.ancestors().skip(1).filter_map(Scope::of)
}
