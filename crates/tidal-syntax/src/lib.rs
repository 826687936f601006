//! Syntax kinds and the lossless, immutable syntax tree shared by the parser,
//! the resolver and hosts.

pub mod ast;
mod builder;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;

pub use builder::Builder;
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode,
    SyntaxNodePtr, SyntaxToken, SyntaxTree, TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
pub use syntax_kind::{RIGHT_ASSOC_CLASS, ScopeKind, SyntaxKind};
pub use syntax_set::SyntaxSet;
pub use text_size::{TextRange, TextSize};
