use tidal_db::TextRange;

use crate::FilePosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSearch {
    pub declaration: TextRange,
    /// In source order.
    pub references: Vec<TextRange>,
}

impl super::Analysis {
    /// Finds the declaration under the cursor, or the one the reference under
    /// the cursor resolves to, and every reference to it.
    pub fn find_references(&self, FilePosition { file, offset }: FilePosition) -> Option<ReferenceSearch> {
        let declaration = self.declaration_at(file, offset)?;
        let references = file.resolutions(self.db()).references_to(declaration);
        Some(ReferenceSearch { declaration, references })
    }
}
