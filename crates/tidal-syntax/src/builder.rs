//! Incremental builder for the immutable syntax tree.

use la_arena::Arena;
use text_size::{TextRange, TextSize};

use crate::nodes::{Child, NodeData, NodeId, TokenData, TreeInner};
use crate::{NodeOrToken, SyntaxKind, SyntaxTree};

/// Builds a `SyntaxTree` from parser events.
///
/// Tokens must be pushed in source order and must tile the text: each token
/// starts where the previous one ended.
pub struct Builder {
    text: Box<str>,
    nodes: Arena<NodeData>,
    tokens: Arena<TokenData>,
    opened: Vec<(NodeId, Vec<Child>)>,
    root: Option<NodeId>,
    text_len: TextSize,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 32;

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            nodes: Arena::default(),
            tokens: Arena::default(),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            root: None,
            text_len: TextSize::new(0),
        }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        let parent = self.opened.last().map(|&(parent, _)| parent);
        let node = self.nodes.alloc(NodeData {
            kind,
            parent,
            children: Box::default(),
            range: TextRange::empty(self.text_len),
        });

        match self.opened.last_mut() {
            Some((_, children)) => children.push(NodeOrToken::Node(node)),
            None => {
                assert!(self.root.is_none(), "a tree has exactly one root");
                self.root = Some(node);
            }
        }
        self.opened.push((node, Vec::new()));
    }

    /// Adds a token to the most recently started node.
    #[track_caller]
    pub fn token(&mut self, kind: SyntaxKind, range: TextRange) {
        assert_eq!(range.start(), self.text_len, "tokens must tile the source text");
        let Some((parent, children)) = self.opened.last_mut() else {
            panic!("tokens must be added inside a node");
        };

        let token = self.tokens.alloc(TokenData { kind, range, parent: *parent });
        children.push(NodeOrToken::Token(token));
        self.text_len = range.end();
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let (node, children) = self.opened.pop().expect("no opened nodes?");

        let range = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => {
                TextRange::new(self.child_range(first).start(), self.child_range(last).end())
            }
            _ => TextRange::empty(self.text_len),
        };

        let data = &mut self.nodes[node];
        data.range = range;
        data.children = children.into_boxed_slice();
    }

    fn child_range(&self, child: Child) -> TextRange {
        match child {
            NodeOrToken::Node(node) => self.nodes[node].range,
            NodeOrToken::Token(token) => self.tokens[token].range,
        }
    }

    /// Completes the tree.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes left in the builder");
        assert_eq!(
            usize::from(self.text_len),
            self.text.len(),
            "tokens must cover the whole source text"
        );
        let root = self.root.take().expect("no root node was started");

        SyntaxTree {
            tree: TreeInner {
                text: std::mem::take(&mut self.text),
                nodes: std::mem::take(&mut self.nodes),
                tokens: std::mem::take(&mut self.tokens),
                root,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    fn build() -> SyntaxTree {
        // let x = 1
        let mut builder = Builder::new("let x = 1");
        builder.start_node(FILE);
        builder.start_node(LET_SECTION);
        builder.token(LET_KW, TextRange::new(0.into(), 3.into()));
        builder.token(WHITESPACE, TextRange::new(3.into(), 4.into()));
        builder.start_node(DECL_NAME);
        builder.token(NAME, TextRange::new(4.into(), 5.into()));
        builder.finish_node();
        builder.token(WHITESPACE, TextRange::new(5.into(), 6.into()));
        builder.token(EQ, TextRange::new(6.into(), 7.into()));
        builder.token(WHITESPACE, TextRange::new(7.into(), 8.into()));
        builder.start_node(LITERAL);
        builder.token(INT_NUMBER, TextRange::new(8.into(), 9.into()));
        builder.finish_node();
        builder.finish_node();
        builder.token(SAME_INDENT, TextRange::empty(9.into()));
        builder.finish_node();
        builder.finish()
    }

    #[test]
    fn ranges_are_unions_of_children() {
        let tree = build();
        let root = tree.root();
        assert_eq!(root.text_range(), TextRange::new(0.into(), 9.into()));

        let section = root.first_child().unwrap();
        assert_eq!(section.kind(), LET_SECTION);
        assert_eq!(section.text(), "let x = 1");

        let decl = section.first_child().unwrap();
        assert_eq!(decl.kind(), DECL_NAME);
        assert_eq!(decl.text(), "x");
        assert_eq!(decl.parent(), Some(section));
    }

    #[test]
    fn token_navigation() {
        let tree = build();
        let name = tree.root().descendant_tokens().find(|token| token.kind() == NAME).unwrap();
        assert_eq!(name.prev_token().unwrap().kind(), WHITESPACE);
        assert_eq!(name.next_token().unwrap().kind(), WHITESPACE);
        assert_eq!(name.parent().kind(), DECL_NAME);

        let mut leaves = tree.root().descendant_tokens();
        assert!(leaves.next().unwrap().prev_token().is_none());
        let last = leaves.last().unwrap();
        assert_eq!(last.kind(), SAME_INDENT);
        assert!(last.next_token().is_none());
    }

    #[test]
    fn offsets_and_cover() {
        let tree = build();
        let root = tree.root();

        let at = root.token_at_offset(4.into());
        assert!(matches!(at, crate::TokenAtOffset::Between(l, r) if l.kind() == WHITESPACE && r.kind() == NAME));

        let cover = root.covering_element(TextRange::new(4.into(), 5.into()));
        assert_eq!(cover.kind(), NAME);

        let cover = root.covering_element(TextRange::new(4.into(), 9.into()));
        assert_eq!(cover.kind(), LET_SECTION);
    }

    #[test]
    fn debug_dump() {
        let tree = build();
        let expected = "\
FILE@0..9
  LET_SECTION@0..9
    LET_KW@0..3 \"let\"
    WHITESPACE@3..4 \" \"
    DECL_NAME@4..5
      NAME@4..5 \"x\"
    WHITESPACE@5..6 \" \"
    EQ@6..7 \"=\"
    WHITESPACE@7..8 \" \"
    LITERAL@8..9
      INT_NUMBER@8..9 \"1\"
  SAME_INDENT@9..9 \"\"
";
        assert_eq!(tree.debug_dump(), expected);
    }

    #[test]
    fn skip_subtree() {
        let tree = build();
        let mut seen = Vec::new();
        let mut preorder = tree.root().preorder();
        while let Some(event) = preorder.next() {
            if let crate::WalkEvent::Enter(node) = event {
                seen.push(node.kind());
                if node.kind() == LET_SECTION {
                    preorder.skip_subtree();
                }
            }
        }
        assert_eq!(seen, vec![FILE, LET_SECTION]);
    }
}
