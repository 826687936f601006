use tidal_syntax::SyntaxKind::{self, *};

use crate::{LexMode, Token, Tokenizer};

/// Whether a line (leading whitespace already stripped) continues a run of
/// line comments of the given flavour.
fn continues(line: &str, doc: bool) -> bool {
    if doc {
        line.starts_with("##") && !line.starts_with("##[")
    } else {
        line.starts_with('#') && !line.starts_with("##") && !line.starts_with("#[")
    }
}

/// `#` that is neither a doc comment nor a block comment.
pub(crate) fn is_plain_line_comment(rest: &str) -> bool {
    continues(rest, false)
}

impl Tokenizer<'_> {
    /// Lexes the comment starting at `#`, then continues in `resume`.
    pub(crate) fn comment(&mut self, resume: LexMode) -> Token {
        let rest = self.cursor.rest();
        if rest.starts_with("##[") {
            self.block_comment("##[", "]##", DOC_COMMENT, LexMode::DocComment, resume)
        } else if rest.starts_with("##") {
            self.line_comment(true, resume)
        } else if rest.starts_with("#[") {
            self.block_comment("#[", "]#", BLOCK_COMMENT, LexMode::BlockComment, resume)
        } else {
            self.line_comment(false, resume)
        }
    }

    fn line_comment(&mut self, doc: bool, resume: LexMode) -> Token {
        let (kind, mode) =
            if doc { (DOC_COMMENT, LexMode::DocComment) } else { (LINE_COMMENT, LexMode::LineComment) };
        self.state.mode = mode;

        loop {
            self.cursor.advance_while(|c| c != '\n' && c != '\r');

            let rest = self.cursor.rest();
            let Some(next_line) = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .or_else(|| rest.strip_prefix('\r'))
            else {
                break;
            };

            let content = next_line.trim_start_matches([' ', '\t']);
            if !continues(content, doc) {
                break;
            }
            // Newline and indentation are ASCII, one char per byte.
            self.cursor.advance_n(rest.len() - content.len());
        }

        self.state.mode = resume;
        self.token(kind, mode)
    }

    fn block_comment(
        &mut self,
        open: &str,
        close: &str,
        kind: SyntaxKind,
        mode: LexMode,
        resume: LexMode,
    ) -> Token {
        self.state.mode = mode;
        let mut depth = 0u32;

        loop {
            let rest = self.cursor.rest();
            if rest.starts_with(open) {
                depth += 1;
                self.cursor.advance_n(open.len());
            } else if rest.starts_with(close) {
                depth -= 1;
                self.cursor.advance_n(close.len());
                if depth == 0 {
                    self.state.mode = resume;
                    return self.token(kind, mode);
                }
            } else if self.cursor.is_eof() {
                tracing::trace!(depth, "unterminated comment");
                self.state.mode = LexMode::Unterminated;
                return self.token(kind, mode);
            } else {
                self.cursor.advance();
            }
        }
    }
}
