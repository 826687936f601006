//! Arena storage behind the public tree handles.

use la_arena::{Arena, Idx};
use text_size::TextRange;

use crate::{NodeOrToken, SyntaxKind};

pub(crate) type NodeId = Idx<NodeData>;
pub(crate) type TokenId = Idx<TokenData>;
pub(crate) type Child = NodeOrToken<NodeId, TokenId>;

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Box<[Child]>,
    pub(crate) range: TextRange,
}

#[derive(Clone, Debug)]
pub(crate) struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: NodeId,
}

/// Tokens are allocated in source order, so neighbouring token ids are
/// neighbouring tokens in the text.
#[derive(Clone, Debug)]
pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) tokens: Arena<TokenData>,
    pub(crate) root: NodeId,
}

impl TreeInner {
    pub(crate) fn token_by_raw(&self, raw: u32) -> Option<TokenId> {
        ((raw as usize) < self.tokens.len()).then(|| Idx::from_raw(raw.into()))
    }
}
