//! Event-based parser producing a lossless [`SyntaxTree`].
//!
//! Parsing never fails: malformed input ends up in `ERROR` nodes and in the
//! diagnostics of the returned [`Parse`].

use std::fmt::Write as _;

use tidal_errors::Diagnostic;
use tidal_syntax::SyntaxTree;

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// Result of parsing one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_tree(self) -> SyntaxTree {
        self.tree
    }

    /// Tree dump followed by one `message@range` line per diagnostic.
    pub fn debug_dump(&self) -> String {
        let mut out = self.tree.debug_dump();
        out.push_str("Errors:\n");
        for diagnostic in &self.diagnostics {
            _ = writeln!(out, "  {}@{:?}", diagnostic.message(), diagnostic.range());
        }
        out
    }
}

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::file(&mut parser);
    let (tree, diagnostics) = parser.finish();

    tracing::debug!(
        tokens = tree.token_count(),
        diagnostics = diagnostics.len(),
        "parsed source unit"
    );
    Parse { tree, diagnostics }
}
