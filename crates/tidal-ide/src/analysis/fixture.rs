use tidal_db::TextRange;
use tidal_fixture::{extract_annotations, extract_offset};

use crate::{Analysis, FilePosition};

/// Loads the fixture into a fresh analysis, returning the cursor position
/// and the annotated ranges.
pub(super) fn load(fixture: &str) -> (Analysis, FilePosition, Vec<TextRange>) {
    let analysis = Analysis::default();
    let (offset, text) = extract_offset(fixture);
    let annotations = extract_annotations(&text);
    let file = analysis.add_file("fixture.tdl", text);
    (analysis, FilePosition { file, offset }, annotations)
}
