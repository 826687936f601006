//! Test fixture markup shared by the resolver and IDE tests.
//!
//! `$0` marks the cursor. A comment line of carets marks columns of the
//! nearest code line above it:
//!
//! ```text
//! let x = 1
//!    #^
//! ```
//!
//! Caret lines are plain comments, so they stay out of indentation.

use text_size::{TextRange, TextSize};

pub const CURSOR: &str = "$0";

/// Removes the cursor marker, returning its offset and the remaining text.
///
/// # Panics
///
/// If `fixture` has no cursor marker.
#[track_caller]
pub fn extract_offset(fixture: &str) -> (TextSize, String) {
    let Some((before, after)) = fixture.split_once(CURSOR) else {
        panic!("fixture has no `{CURSOR}` cursor:\n{fixture}");
    };
    (TextSize::of(before), format!("{before}{after}"))
}

pub fn extract_annotations(text: &str) -> Vec<TextRange> {
    let mut annotations = Vec::new();
    let mut code_line = TextSize::from(0);
    let mut line_start = TextSize::from(0);

    for line in text.split_inclusive('\n') {
        match line.split_once('#') {
            Some((indent, rest)) if indent.trim().is_empty() && rest.trim_start().starts_with('^') => {
                let mut column = TextSize::of(indent) + TextSize::of("#");
                let mut rest = rest.trim_end();
                while let Some(skip) = rest.find('^') {
                    column += TextSize::of(&rest[..skip]);
                    rest = &rest[skip..];
                    let carets = rest.len() - rest.trim_start_matches('^').len();
                    let range = TextRange::at(column, TextSize::of(&rest[..carets]));
                    annotations.push(range + code_line);
                    column = range.end();
                    rest = &rest[carets..];
                }
            }
            _ => code_line = line_start,
        }
        line_start += TextSize::of(line);
    }

    annotations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices<'a>(text: &'a str, ranges: &[TextRange]) -> Vec<&'a str> {
        ranges.iter().map(|&range| &text[range]).collect()
    }

    #[test]
    fn cursor() {
        let (offset, text) = extract_offset("echo $0x\n");
        assert_eq!(offset, TextSize::from(5));
        assert_eq!(text, "echo x\n");
    }

    #[test]
    #[should_panic(expected = "no `$0` cursor")]
    fn missing_cursor() {
        extract_offset("echo x\n");
    }

    #[test]
    fn carets_point_at_the_code_line_above() {
        let text = "let a = 1\n   #^\nproc add(left, right: int) =\n        #^^^^  ^^^^^\n  discard\n";
        let annotations = extract_annotations(text);
        assert_eq!(slices(text, &annotations), ["a", "left", "right"]);
    }

    #[test]
    fn trailing_comments_are_not_annotations() {
        let text = "echo x # ^ not a marker\n# plain comment\n";
        assert!(extract_annotations(text).is_empty());
    }
}
