use camino::Utf8PathBuf;
use salsa::Setter as _;
use tidal_db::{File, RootDatabase, TextRange, TextSize};
use tidal_syntax::SyntaxKind::{self, DECL_NAME};
use tidal_syntax::ast::{AstNode as _, DeclName, NameRef};

use crate::pick_best_token;

#[cfg(test)]
mod fixture;
mod goto_definition;
mod references;
mod rename;

pub use references::ReferenceSearch;

#[derive(Default)]
pub struct Analysis {
    db: RootDatabase,
}

impl Analysis {
    pub fn db(&self) -> &RootDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    pub fn add_file(&self, path: impl Into<Utf8PathBuf>, text: String) -> File {
        File::new(&self.db, path.into(), text)
    }

    pub fn set_file_text(&mut self, file: File, text: String) {
        file.set_text(&mut self.db).to(text);
    }

    /// Range of the declaration under the cursor, or of the declaration the
    /// reference under the cursor resolves to.
    fn declaration_at(&self, file: File, offset: TextSize) -> Option<TextRange> {
        let db = self.db();
        let root = file.parse(db).tree().root();

        let token = pick_best_token(root.token_at_offset(offset), |kind| match kind {
            SyntaxKind::NAME => 2,
            _ => 1,
        })?;
        let parent = token.parent();

        if let Some(decl) = DeclName::cast(parent) {
            return Some(decl.syntax().text_range());
        }
        let reference = NameRef::cast(parent)?;
        file.resolutions(db).target(reference.syntax().text_range())
    }
}

/// The `DECL_NAME` node at `range` in the current tree of `file`.
fn decl_node<'a>(root: tidal_syntax::SyntaxNode<'a>, range: TextRange) -> Option<DeclName<'a>> {
    let ptr = tidal_syntax::SyntaxNodePtr { kind: DECL_NAME, range };
    ptr.try_to_node(&root).and_then(DeclName::cast)
}
