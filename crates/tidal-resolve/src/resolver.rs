use tidal_syntax::SyntaxNode;
use tidal_syntax::ast::{AstNode as _, DeclName, HasName as _, NameRef};

use crate::scope_chain;

/// Finds the declaration `reference` binds to.
///
/// # Panics
///
/// If `reference` is not a `NAME_REF` node.
#[track_caller]
pub fn resolve(reference: SyntaxNode<'_>) -> Option<DeclName<'_>> {
    match NameRef::cast(reference) {
        Some(name_ref) => resolve_name_ref(name_ref),
        None => panic!("cannot resolve a {:?} node, only NAME_REF", reference.kind()),
    }
}

/// The nearest preceding declaration of the same name in the innermost
/// enclosing scope that has one.
pub fn resolve_name_ref(reference: NameRef<'_>) -> Option<DeclName<'_>> {
    let name = reference.name();
    let offset = reference.offset();

    let resolved = scope_chain(reference.syntax()).find_map(|scope| {
        let decl = scope
            .declarations()
            .take_while(|decl| decl.offset() < offset)
            .filter(|decl| decl.name() == name)
            .last()?;
        tracing::trace!(name, scope = scope.kind().name(), "resolved reference");
        Some(decl)
    });

    if resolved.is_none() {
        tracing::trace!(name, ?offset, "unresolved reference");
    }
    resolved
}

/// Every reference that resolves to `decl`, in source order.
pub fn references(decl: DeclName<'_>) -> Vec<NameRef<'_>> {
    let name = decl.name();
    let Some(root) = decl.syntax().ancestors().last() else { return Vec::new() };

    root.descendants()
        .filter_map(NameRef::cast)
        .filter(|name_ref| name_ref.name() == name && resolve_name_ref(*name_ref) == Some(decl))
        .collect()
}
