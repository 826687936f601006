//! Operator classification and reserved words.
//!
//! An operator's precedence class follows from its spelling alone, so
//! user-defined operators get a class without any declaration.

use tidal_syntax::SyntaxKind::{self, *};

pub(crate) fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '=' | '+'
            | '-'
            | '*'
            | '/'
            | '<'
            | '>'
            | '@'
            | '$'
            | '~'
            | '&'
            | '%'
            | '|'
            | '!'
            | '?'
            | '^'
            | '.'
            | ':'
            | '\\'
    )
}

/// Classifies a maximal run of operator characters.
pub(crate) fn operator(text: &str) -> SyntaxKind {
    match text {
        "=" => return EQ,
        ":" => return COLON,
        "." => return DOT,
        ".." => return DOT_DOT,
        _ => {}
    }

    let first = text.chars().next().unwrap_or_default();
    if text.len() > 1 && text.ends_with('=') && !matches!(first, '<' | '>' | '!' | '=' | '~' | '?')
    {
        return OP0;
    }
    if text.ends_with("->") || text.ends_with("~>") || text.ends_with("=>") {
        return OP1;
    }

    match first {
        '@' => OP2_SIGIL,
        ':' | '?' => OP2,
        '=' | '<' | '>' | '!' => OP5,
        '.' => OP6,
        '&' => OP7,
        '+' | '-' | '~' | '|' => OP8,
        '*' | '/' | '%' | '\\' => OP9,
        '$' | '^' => OP10,
        _ => unreachable!("not an operator: {text:?}"),
    }
}

/// Keywords and word operators.
pub(crate) fn word(text: &str) -> Option<SyntaxKind> {
    Some(match text {
        "let" => LET_KW,
        "var" => VAR_KW,
        "const" => CONST_KW,
        "block" => BLOCK_KW,
        "if" => IF_KW,
        "elif" => ELIF_KW,
        "else" => ELSE_KW,
        "while" => WHILE_KW,
        "for" => FOR_KW,
        "proc" => PROC_KW,
        "return" => RETURN_KW,
        "discard" => DISCARD_KW,

        "or" | "xor" => OP3,
        "and" => OP4,
        "not" | "in" | "notin" | "is" | "isnot" | "of" | "as" | "from" => OP5,
        "div" | "mod" | "shl" | "shr" => OP9,
        _ => return None,
    })
}
