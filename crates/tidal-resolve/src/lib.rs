//! Lexical name resolution over the syntax tree.
//!
//! A reference sees the declarations of every scope enclosing it, innermost
//! scope first, but only declarations that come before it in the text.

mod resolver;
mod scope;

pub use resolver::{references, resolve, resolve_name_ref};
pub use scope::{Scope, scope_chain};
