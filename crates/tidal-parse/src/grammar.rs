use tidal_syntax::SyntaxKind::{self, *};
use tidal_syntax::SyntaxSet;

use crate::parser::Parser;

mod exprs;
mod stmts;

/// Tokens that end a statement.
const STMT_END: SyntaxSet =
    SyntaxSet::new([SAME_INDENT, INVALID_INDENT, INDENT, DEDENT, EOF, SEMICOLON, DOC_COMMENT]);

/// Tokens that are never swallowed into an error node while looking for an
/// expression; some enclosing rule knows what to do with them.
const EXPR_RECOVERY: SyntaxSet = SyntaxSet::new([
    SAME_INDENT,
    INVALID_INDENT,
    INDENT,
    DEDENT,
    SEMICOLON,
    DOC_COMMENT,
    RIGHT_PAREN,
    RIGHT_BRACKET,
    RIGHT_BRACE,
    COLON,
    COMMA,
    EQ,
    LET_KW,
    VAR_KW,
    CONST_KW,
    BLOCK_KW,
    IF_KW,
    ELIF_KW,
    ELSE_KW,
    WHILE_KW,
    FOR_KW,
    PROC_KW,
    RETURN_KW,
    DISCARD_KW,
]);

pub(crate) fn file(p: &mut Parser<'_>) {
    let m = p.start();
    stmt_list(p, true);
    m.complete(p, FILE);
}

/// Statements separated by `SAME_INDENT`. A nested list ends at its
/// `DEDENT`, which is left for the caller.
fn stmt_list(p: &mut Parser<'_>, top_level: bool) {
    let m = p.start();
    loop {
        match p.current() {
            EOF => break,
            DEDENT if !top_level => break,
            DEDENT => p.err_and_bump("a statement"),
            SAME_INDENT | INVALID_INDENT | SEMICOLON => p.advance(),
            INDENT => unexpected_indent(p),
            _ => {
                stmts::stmt(p);
                stmt_end(p);
            }
        }
    }
    m.complete(p, STMT_LIST);
}

fn unexpected_indent(p: &mut Parser<'_>) {
    let m = p.start();
    p.error_unexpected("unexpected indentation");
    p.advance();
    stmt_list(p, false);
    p.eat(DEDENT);
    m.complete(p, ERROR);
}

/// Anything left on the line after a complete statement becomes one error
/// node.
fn stmt_end(p: &mut Parser<'_>) {
    if !p.at_set(&STMT_END) {
        error_to_stmt_end(p, "end of statement");
    }
}

/// Reports `what` once and swallows the rest of the statement.
fn error_to_stmt_end(p: &mut Parser<'_>, what: &str) {
    if p.at_set(&STMT_END) {
        p.error(what);
        return;
    }

    let m = p.start();
    p.error(what);
    while !p.at_set(&STMT_END) {
        p.advance();
    }
    m.complete(p, ERROR);
}

/// Body after `:` or `=`: an indented statement list, or a single statement
/// on the same line.
fn body(p: &mut Parser<'_>) {
    // `= ## docs` followed by the indented body documents the owner.
    if p.at(DOC_COMMENT) && p.nth(1) == INDENT {
        stmts::doc(p);
    }

    if p.eat(INDENT) {
        stmt_list(p, false);
        p.eat(DEDENT);
    } else if !p.at_set(&STMT_END) || p.at(DOC_COMMENT) {
        let m = p.start();
        stmts::stmt(p);
        m.complete(p, STMT_LIST);
    } else {
        p.error("an indented block");
    }
}

fn colon_body(p: &mut Parser<'_>) {
    p.expect(COLON, "`:`");
    body(p);
}

fn decl_name(p: &mut Parser<'_>) {
    if p.at(NAME) {
        let m = p.start();
        p.advance();
        m.complete(p, DECL_NAME);
    } else {
        p.err_recover("a name", &EXPR_RECOVERY);
    }
}

/// `bra` elements separated by `delim` `ket`, with layout allowed between
/// elements. `parser` returns `false` when it could not make progress.
fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.current(), bra);
    p.advance();
    p.eat_layout();

    while !p.at(ket) && !p.at(EOF) {
        if p.at_set(delim) {
            p.err_and_bump("an element");
            continue;
        }

        if !parser(p) {
            break;
        }

        p.eat_layout();
        if !p.at_set(delim) {
            break;
        }
        p.advance();
        p.eat_layout();
    }

    p.eat_layout();
    p.expect(ket, ket_name(ket));
}

fn ket_name(ket: SyntaxKind) -> &'static str {
    match ket {
        RIGHT_PAREN => "`)`",
        RIGHT_BRACKET => "`]`",
        RIGHT_BRACE => "`}`",
        _ => "a closing delimiter",
    }
}
