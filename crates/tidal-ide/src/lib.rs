//! Editor-facing operations: go to definition, find references and rename.

mod analysis;
pub mod rename;

pub use analysis::{Analysis, ReferenceSearch};
pub use rename::RenameError;
use tidal_db::{File, TextSize};
use tidal_syntax::{SyntaxKind, SyntaxToken, TokenAtOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    pub file: File,
    pub offset: TextSize,
}

/// A cursor between two tokens touches both; `f` ranks them.
fn pick_best_token(
    tokens: TokenAtOffset<SyntaxToken<'_>>,
    f: impl Fn(SyntaxKind) -> usize,
) -> Option<SyntaxToken<'_>> {
    tokens.max_by_key(|token| f(token.kind()))
}
