use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A dedent to a width that matches no open indentation level.
    InvalidIndent,
    BadChar,
    UnterminatedComment,
    /// The parser expected a different token or construct.
    Expected,
    /// A token that cannot start or continue anything at its position.
    Unexpected,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::InvalidIndent => "indentation does not match any open block",
            DiagnosticKind::BadChar => "not valid here",
            DiagnosticKind::UnterminatedComment => "comment starts before this point",
            DiagnosticKind::Expected | DiagnosticKind::Unexpected => "here",
        }
    }
}

#[salsa::accumulator]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, range: TextRange) -> Self {
        Self { kind, message: message.into(), range }
    }

    pub fn expected(what: &str, range: TextRange) -> Self {
        Self::new(DiagnosticKind::Expected, format!("expected {what}"), range)
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label(self.kind.label()))
                .fold(true),
        );
        renderer.render(message)
    }
}
