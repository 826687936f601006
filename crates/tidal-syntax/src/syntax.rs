//! Borrowed handles into an arena-backed syntax tree.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;
use crate::nodes::{Child, NodeId, TokenId, TreeInner};

/// Lossless tree over one source text. Concatenating the leaves in order
/// gives back the text.
#[derive(Clone)]
pub struct SyntaxTree {
    pub(crate) tree: TreeInner,
}

impl SyntaxTree {
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: &self.tree, id: self.tree.root }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.tree.text
    }

    /// Leaves, counting trivia and zero-width layout tokens.
    pub fn token_count(&self) -> usize {
        self.tree.tokens.len()
    }

    /// One element per line, indented by depth: nodes as `KIND@range`,
    /// leaves as `KIND@range "text"`.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.root().preorder_with_tokens() {
            let pad = depth * 2;
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    _ = writeln!(out, "{:pad$}{node:?}", "");
                    depth += 1;
                }
                WalkEventWithTokens::LeaveNode(_) => depth -= 1,
                WalkEventWithTokens::Token(token) => {
                    _ = writeln!(out, "{:pad$}{token:?}", "");
                }
            }
        }
        out
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree").field("text_len", &self.text().len()).finish_non_exhaustive()
    }
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text() && self.debug_dump() == other.debug_dump()
    }
}

impl Eq for SyntaxTree {}

/// Leaf of a [`SyntaxTree`]. Cheap to copy; borrows the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    id: TokenId,
}

impl<'a> SyntaxToken<'a> {
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.tokens[self.id].kind
    }

    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.tokens[self.id].range
    }

    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Neighbouring leaves in source order, trivia and layout included.
    pub fn prev_token(self) -> Option<Self> {
        self.sibling_leaf(u32::from(self.id.into_raw()).checked_sub(1)?)
    }

    pub fn next_token(self) -> Option<Self> {
        self.sibling_leaf(u32::from(self.id.into_raw()) + 1)
    }

    fn sibling_leaf(self, raw: u32) -> Option<Self> {
        let id = self.tree.token_by_raw(raw)?;
        Some(Self { tree: self.tree, id })
    }

    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, id: self.tree.tokens[self.id].parent }
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxToken<'_> {}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

/// Interior node of a [`SyntaxTree`]. Its range is the union of its
/// children's ranges.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    id: NodeId,
}

impl<'a> SyntaxNode<'a> {
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.nodes[self.id].kind
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.nodes[self.id].range
    }

    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// `None` only for the root.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = self.tree.nodes[self.id].parent?;
        Some(Self { tree: self.tree, id: parent })
    }

    /// This node, then its parent, up to the root.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |node| node.parent())
    }

    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.nodes[self.id].children.iter() }
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(NodeOrToken::into_node)
    }

    pub fn child_tokens(self) -> impl DoubleEndedIterator<Item = SyntaxToken<'a>> + Clone {
        self.children_with_tokens().filter_map(NodeOrToken::into_token)
    }

    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    /// Every leaf under this node, left to right.
    pub fn descendant_tokens(self) -> impl Iterator<Item = SyntaxToken<'a>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            WalkEventWithTokens::EnterNode(_) | WalkEventWithTokens::LeaveNode(_) => None,
        })
    }

    /// This node and every node under it, parents before children.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Leaves touching `offset`. Zero-width layout tokens are skipped, so an
    /// offset sitting on a boundary yields both neighbours.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        if !self.text_range().contains_inclusive(offset) {
            return TokenAtOffset::None;
        }

        let mut touching = self
            .descendant_tokens()
            .filter(|token| !token.text_range().is_empty())
            .skip_while(|token| token.text_range().end() < offset)
            .take_while(|token| token.text_range().start() <= offset);

        match (touching.next(), touching.next()) {
            (Some(left), Some(right)) => TokenAtOffset::Between(left, right),
            (Some(token), None) => TokenAtOffset::Single(token),
            (None, _) => TokenAtOffset::None,
        }
    }

    /// Deepest element whose range contains `range`.
    pub fn covering_element(self, range: TextRange) -> SyntaxElement<'a> {
        let mut node = self;
        loop {
            let inner = node.children_with_tokens().find(|child| {
                let child_range = child.text_range();
                !child_range.is_empty() && child_range.contains_range(range)
            });
            match inner {
                Some(NodeOrToken::Node(child)) => node = child,
                Some(NodeOrToken::Token(token)) => return NodeOrToken::Token(token),
                None => return NodeOrToken::Node(node),
            }
        }
    }

    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }
}

/// Direct children of a node, in source order.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a TreeInner,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> ChildrenWithTokens<'a> {
    fn element(&self, child: Child) -> SyntaxElement<'a> {
        let tree = self.tree;
        match child {
            NodeOrToken::Node(id) => NodeOrToken::Node(SyntaxNode { tree, id }),
            NodeOrToken::Token(id) => NodeOrToken::Token(SyntaxToken { tree, id }),
        }
    }
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&child| self.element(child))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.children.next_back().map(|&child| self.element(child))
    }
}

#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Depth-first walk that only reports nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    walk: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    fn new(start: SyntaxNode<'a>) -> Self {
        Preorder { walk: PreorderWithTokens::new(start) }
    }

    /// See [`PreorderWithTokens::skip_subtree`].
    pub fn skip_subtree(&mut self) {
        self.walk.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walk.next()? {
                WalkEventWithTokens::EnterNode(node) => return Some(WalkEvent::Enter(node)),
                WalkEventWithTokens::LeaveNode(node) => return Some(WalkEvent::Leave(node)),
                WalkEventWithTokens::Token(_) => {}
            }
        }
    }
}

/// Depth-first walk over nodes and leaves. Every `EnterNode` is matched by a
/// `LeaveNode` unless the subtree was skipped.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    pending: Option<SyntaxNode<'a>>,
    open: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
}

impl<'a> PreorderWithTokens<'a> {
    fn new(start: SyntaxNode<'a>) -> Self {
        PreorderWithTokens { pending: Some(start), open: Vec::new() }
    }

    fn enter(&mut self, node: SyntaxNode<'a>) -> WalkEventWithTokens<'a> {
        self.open.push((node, node.children_with_tokens()));
        WalkEventWithTokens::EnterNode(node)
    }

    /// Drops the node entered last together with everything below it. No
    /// `LeaveNode` is reported for it.
    ///
    /// # Panics
    ///
    /// Panics if no node is open.
    pub fn skip_subtree(&mut self) {
        assert!(self.open.pop().is_some(), "no open node to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending.take() {
            return Some(self.enter(start));
        }

        let (_, children) = self.open.last_mut()?;
        Some(match children.next() {
            Some(NodeOrToken::Node(child)) => self.enter(child),
            Some(NodeOrToken::Token(token)) => WalkEventWithTokens::Token(token),
            None => {
                let (node, _) = self.open.pop()?;
                WalkEventWithTokens::LeaveNode(node)
            }
        })
    }
}

/// Locates a node by kind and range. Survives re-parsing identical text,
/// unlike [`SyntaxNode`] which borrows one tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNodePtr {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl SyntaxNodePtr {
    pub fn new(node: &SyntaxNode<'_>) -> Self {
        Self { kind: node.kind(), range: node.text_range() }
    }

    /// `root` has to be the root of a tree.
    pub fn try_to_node<'a>(&self, root: &SyntaxNode<'a>) -> Option<SyntaxNode<'a>> {
        if root.parent().is_some() {
            return None;
        }

        let innermost = match root.covering_element(self.range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent(),
        };
        innermost.ancestors().find(|node| node.kind() == self.kind && node.text_range() == self.range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    pub fn into_node(self) -> Option<N> {
        if let NodeOrToken::Node(node) = self { Some(node) } else { None }
    }

    pub fn into_token(self) -> Option<T> {
        if let NodeOrToken::Token(token) = self { Some(token) } else { None }
    }
}

/// Result of [`SyntaxNode::token_at_offset`]. Iterating yields the left
/// token first.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    None,
    Single(T),
    /// The offset is the end of the first token and the start of the second.
    Between(T, T),
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, TokenAtOffset::None) {
            TokenAtOffset::None => None,
            TokenAtOffset::Single(token) => Some(token),
            TokenAtOffset::Between(left, right) => {
                *self = TokenAtOffset::Single(right);
                Some(left)
            }
        }
    }
}
