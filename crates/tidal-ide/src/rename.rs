//! Renaming a declaration together with the references that resolve to it.

use rustc_hash::FxHashSet;
use tidal_syntax::ast::{AstNode as _, DeclName, HasName as _};
use tidal_syntax::{Builder, SyntaxTree, TextRange, TextSize, WalkEventWithTokens};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),
    #[error("the declaration has no name to rename")]
    MissingName,
    #[error("no declaration or reference at the cursor")]
    NoDeclaration,
}

/// Renames `decl` and every reference resolving to it, producing a new tree.
///
/// `new_name` is checked by parsing it where a declaration name would be.
/// Only the renamed leaves change text; the rest of the tree keeps its
/// shape, and ranges after a renamed leaf move by the length difference.
pub fn rename_declaration(
    tree: &SyntaxTree,
    decl: DeclName<'_>,
    new_name: &str,
) -> Result<SyntaxTree, RenameError> {
    let new_name = parse_name(new_name)?;
    let decl_token = decl.name_token().ok_or(RenameError::MissingName)?;

    let mut renamed = FxHashSet::default();
    renamed.insert(decl_token.text_range());
    for reference in tidal_resolve::references(decl) {
        if let Some(token) = reference.name_token() {
            renamed.insert(token.text_range());
        }
    }

    let new_tree = rebuild(tree, &renamed, &new_name);
    tracing::debug!(
        from = decl_token.text(),
        to = %new_name,
        leaves = renamed.len(),
        "renamed declaration"
    );
    Ok(new_tree)
}

/// The name leaf of `let <name> = 0`, when that fragment parses cleanly and
/// the leaf covers all of `name`.
fn parse_name(name: &str) -> Result<String, RenameError> {
    let fragment = tidal_parse::parse(&format!("let {name} = 0"));
    let leaf = fragment
        .tree()
        .root()
        .descendants()
        .find_map(DeclName::cast)
        .and_then(|decl| decl.name_token());

    match leaf {
        Some(leaf) if fragment.diagnostics().is_empty() && leaf.text() == name => {
            Ok(leaf.text().to_owned())
        }
        _ => Err(RenameError::InvalidName(name.to_owned())),
    }
}

fn rebuild(tree: &SyntaxTree, renamed: &FxHashSet<TextRange>, new_name: &str) -> SyntaxTree {
    let old_text = tree.text();
    let mut text = String::with_capacity(old_text.len());
    let mut leaves = Vec::new();

    for event in tree.root().preorder_with_tokens() {
        if let WalkEventWithTokens::Token(token) = event {
            let start = TextSize::of(text.as_str());
            if renamed.contains(&token.text_range()) {
                text.push_str(new_name);
            } else {
                text.push_str(token.text());
            }
            leaves.push(TextRange::new(start, TextSize::of(text.as_str())));
        }
    }

    let mut builder = Builder::new(&text);
    let mut leaves = leaves.into_iter();
    for event in tree.root().preorder_with_tokens() {
        match event {
            WalkEventWithTokens::EnterNode(node) => builder.start_node(node.kind()),
            WalkEventWithTokens::LeaveNode(_) => builder.finish_node(),
            WalkEventWithTokens::Token(token) => {
                if let Some(range) = leaves.next() {
                    builder.token(token.kind(), range);
                }
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use tidal_syntax::SyntaxKind::NAME;
    use tidal_syntax::ast::{AstNode as _, HasName as _};

    use super::*;

    fn decl<'a>(tree: &'a SyntaxTree, name: &str, nth: usize) -> DeclName<'a> {
        tree.root()
            .descendants()
            .filter_map(DeclName::cast)
            .filter(|decl| decl.name() == name)
            .nth(nth)
            .unwrap()
    }

    fn names(tree: &SyntaxTree) -> Vec<(&str, TextRange)> {
        tree.root()
            .descendant_tokens()
            .filter(|token| token.kind() == NAME)
            .map(|token| (token.text(), token.text_range()))
            .collect()
    }

    #[test]
    fn renames_declaration_and_references() {
        let parse = tidal_parse::parse("let x = 1\necho x\nblock:\n  let x = 2\n  echo x\necho x + 1\n");
        let tree = parse.tree();

        let renamed = rename_declaration(tree, decl(tree, "x", 0), "count").unwrap();
        assert_eq!(
            renamed.text(),
            "let count = 1\necho count\nblock:\n  let x = 2\n  echo x\necho count + 1\n"
        );
        assert_eq!(renamed.debug_dump(), tidal_parse::parse(renamed.text()).tree().debug_dump());
    }

    #[test]
    fn preserves_structure() {
        let text = "proc f(a: int): int =\n  return a * a\necho f(2)\n";
        let tree = tidal_parse::parse(text).into_tree();

        let renamed = rename_declaration(&tree, decl(&tree, "a", 0), "b").unwrap();
        assert_eq!(renamed.text(), "proc f(b: int): int =\n  return b * b\necho f(2)\n");

        let kinds = |tree: &SyntaxTree| tree.root().descendants().map(|node| node.kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&renamed), kinds(&tree));
        assert_eq!(names(&renamed), names(&tidal_parse::parse(renamed.text()).into_tree()));
    }

    #[test]
    fn shifts_ranges_after_longer_name() {
        let tree = tidal_parse::parse("var i = 0\ni = i + 1\n").into_tree();
        let renamed = rename_declaration(&tree, decl(&tree, "i", 0), "idx").unwrap();

        assert_eq!(names(&renamed), [
            ("idx", TextRange::new(4.into(), 7.into())),
            ("idx", TextRange::new(12.into(), 15.into())),
            ("idx", TextRange::new(18.into(), 21.into())),
        ]);
        assert_eq!(renamed.root().text_range().len(), TextSize::of("var idx = 0\nidx = idx + 1\n"));
    }

    #[test]
    fn rejects_invalid_names() {
        let tree = tidal_parse::parse("let x = 1\n").into_tree();
        let x = decl(&tree, "x", 0);

        for name in ["", "let", "a b", "1a", "x = 2", "x#", "+"] {
            assert_eq!(
                rename_declaration(&tree, x, name),
                Err(RenameError::InvalidName(name.to_owned())),
                "{name:?}"
            );
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            RenameError::InvalidName("let".to_owned()).to_string(),
            "`let` is not a valid identifier"
        );
    }
}
