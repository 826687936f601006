//! Incremental queries over source files.
//!
//! Every query hangs off a [`File`] input, so editing a file's text only
//! invalidates what was derived from that file.

use camino::Utf8PathBuf;
pub use line_index::{LineCol, LineIndex};
use rustc_hash::FxHashMap;
use salsa::{Accumulator as _, Database};
pub use tidal_errors::Diagnostic;
pub use tidal_parse::Parse;
use tidal_syntax::SyntaxKind::NAME;
use tidal_syntax::ast::{AstNode as _, HasName as _, NameRef};
pub use tidal_syntax::{TextRange, TextSize};

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl Database for RootDatabase {}

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn parse(self, db: &dyn Database) -> Parse {
        tracing::debug!(path = %self.path(db), "parsing");
        tidal_parse::parse(self.text(db))
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }

    /// The declaration every reference of the file binds to.
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn resolutions(self, db: &dyn Database) -> Resolutions {
        let root = self.parse(db).tree().root();
        let mut targets = FxHashMap::default();

        for reference in root.descendants().filter_map(NameRef::cast) {
            if let Some(decl) = tidal_resolve::resolve_name_ref(reference) {
                targets.insert(reference.syntax().text_range(), decl.syntax().text_range());
            }
        }

        tracing::debug!(path = %self.path(db), resolved = targets.len(), "resolved references");
        Resolutions { targets }
    }
}

/// Reference ranges mapped to the ranges of their declarations.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolutions {
    targets: FxHashMap<TextRange, TextRange>,
}

impl Resolutions {
    pub fn target(&self, reference: TextRange) -> Option<TextRange> {
        self.targets.get(&reference).copied()
    }

    /// Every reference to the declaration at `decl`, in source order.
    pub fn references_to(&self, decl: TextRange) -> Vec<TextRange> {
        let mut references = self
            .targets
            .iter()
            .filter(|&(_, target)| *target == decl)
            .map(|(&reference, _)| reference)
            .collect::<Vec<_>>();
        references.sort_by_key(|range| range.start());
        references
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Reports the lexical and syntax diagnostics of `file`.
#[salsa::tracked]
pub fn check_file(db: &dyn Database, file: File) {
    for diagnostic in file.parse(db).diagnostics() {
        diagnostic.clone().accumulate(db);
    }
}

/// Diagnostics accumulated by [`check_file`], in source order.
pub fn diagnostics(db: &dyn Database, file: File) -> Vec<Diagnostic> {
    let mut diagnostics = check_file::accumulated::<Diagnostic>(db, file)
        .into_iter()
        .map(|diagnostic| Diagnostic::clone(&diagnostic))
        .collect::<Vec<_>>();
    diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
    diagnostics
}

/// Resolves the reference whose name touches `offset`, returning the
/// reference range and the range of its declaration.
pub fn resolve_at(db: &dyn Database, file: File, offset: TextSize) -> Option<(TextRange, TextRange)> {
    let root = file.parse(db).tree().root();
    let reference = root
        .token_at_offset(offset)
        .filter(|token| token.kind() == NAME)
        .find_map(|token| NameRef::cast(token.parent()))?;

    let range = reference.syntax().text_range();
    let target = file.resolutions(db).target(range);
    if target.is_none() {
        tracing::trace!(name = reference.name(), "no declaration at cursor");
    }
    Some(range).zip(target)
}
