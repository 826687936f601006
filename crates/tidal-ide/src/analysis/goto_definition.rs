use tidal_db::TextRange;

use crate::FilePosition;

impl super::Analysis {
    /// The range of the reference under the cursor and the range of the
    /// declaration it resolves to.
    pub fn goto_definition(
        &self,
        FilePosition { file, offset }: FilePosition,
    ) -> Option<(TextRange, TextRange)> {
        tidal_db::resolve_at(self.db(), file, offset)
    }
}
