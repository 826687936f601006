use tidal_syntax::SyntaxKind::{self, *};
use tidal_syntax::SyntaxSet;

use super::exprs::{expr, expr_continued, type_ref};
use super::{
    STMT_END, body, colon_body, decl_name, delimited, error_to_stmt_end, stmt_end, unexpected_indent,
};
use crate::parser::Parser;

const PARAM_DELIMITERS: SyntaxSet = SyntaxSet::new([COMMA, SEMICOLON]);

pub(super) fn stmt(p: &mut Parser<'_>) {
    match p.current() {
        LET_KW => decl_section(p, LET_SECTION),
        VAR_KW => decl_section(p, VAR_SECTION),
        CONST_KW => decl_section(p, CONST_SECTION),
        BLOCK_KW => block_stmt(p),
        IF_KW => if_stmt(p),
        WHILE_KW => while_stmt(p),
        FOR_KW => for_stmt(p),
        PROC_KW => proc_def(p),
        RETURN_KW => keyword_stmt(p, RETURN_STMT),
        DISCARD_KW => keyword_stmt(p, DISCARD_STMT),
        DOC_COMMENT => doc(p),
        _ => expr_stmt(p),
    }
}

pub(super) fn doc(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    m.complete(p, DOC);
}

/// `let x = 1`, or the keyword followed by an indented list of definitions.
fn decl_section(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();

    if p.eat(INDENT) {
        loop {
            match p.current() {
                DEDENT | EOF => break,
                SAME_INDENT | INVALID_INDENT | SEMICOLON => p.advance(),
                INDENT => unexpected_indent(p),
                DOC_COMMENT => doc(p),
                NAME => {
                    ident_def(p);
                    stmt_end(p);
                }
                _ => p.err_and_bump("a definition"),
            }
        }
        p.eat(DEDENT);
    } else if p.at(NAME) {
        ident_def(p);
    } else {
        error_to_stmt_end(p, "a name");
    }

    m.complete(p, kind);
}

/// `a, b: T = value`, where both the type and the value are optional.
fn ident_def(p: &mut Parser<'_>) {
    let m = p.start();
    decl_name(p);
    while p.eat(COMMA) {
        decl_name(p);
    }

    if p.eat(COLON) {
        type_ref(p);
    }

    if p.eat(EQ) {
        expr_continued(p);
    }

    m.complete(p, IDENT_DEF);
}

fn block_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    if p.at(NAME) {
        let label = p.start();
        p.advance();
        label.complete(p, BLOCK_LABEL);
    }

    colon_body(p);
    m.complete(p, BLOCK_STMT);
}

fn if_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    conditional_branch(p, IF_BRANCH);

    loop {
        let next = if p.at(SAME_INDENT) { p.nth(1) } else { p.current() };
        if !matches!(next, ELIF_KW | ELSE_KW) {
            break;
        }
        p.eat(SAME_INDENT);

        if p.at(ELIF_KW) {
            conditional_branch(p, ELIF_BRANCH);
        } else {
            let branch = p.start();
            p.advance();
            colon_body(p);
            branch.complete(p, ELSE_BRANCH);
            break;
        }
    }

    m.complete(p, IF_STMT);
}

fn conditional_branch(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    expr(p);
    colon_body(p);
    m.complete(p, kind);
}

fn while_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    expr(p);
    colon_body(p);
    m.complete(p, WHILE_STMT);
}

/// `for a, b in items:`. `in` is a word operator, so it is matched by text.
fn for_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    decl_name(p);
    while p.eat(COMMA) {
        decl_name(p);
    }

    if p.at_word(OP5, "in") {
        p.advance();
    } else {
        p.error("`in`");
    }

    expr(p);
    colon_body(p);
    m.complete(p, FOR_STMT);
}

/// The name is declared where the `proc` statement is; everything after it
/// belongs to the routine scope.
fn proc_def(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    decl_name(p);

    let routine = p.start();
    if p.at(LEFT_PAREN) {
        param_list(p);
    }

    if p.at(COLON) {
        let ret = p.start();
        p.advance();
        type_ref(p);
        ret.complete(p, RETURN_TYPE);
    }

    if p.eat(EQ) {
        body(p);
    }
    routine.complete(p, ROUTINE);

    m.complete(p, PROC_DEF);
}

/// Parameters may wrap onto indented lines; that indentation must not leak
/// into the body.
fn param_list(p: &mut Parser<'_>) {
    let outer_indent = std::mem::take(&mut p.expr_indent);
    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, &PARAM_DELIMITERS, |p| {
        let before = p.consumed();
        param(p);
        p.consumed() != before
    });
    m.complete(p, PARAM_LIST);
    p.expr_indent = outer_indent;
}

fn param(p: &mut Parser<'_>) {
    let m = p.start();
    decl_name(p);

    if p.eat(COLON) {
        type_ref(p);
    }

    if p.eat(EQ) {
        expr_continued(p);
    }

    m.complete(p, PARAM);
}

/// `return` and `discard`, with an optional operand.
fn keyword_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    if !p.at_set(&STMT_END) {
        expr(p);
    }
    m.complete(p, kind);
}

fn expr_stmt(p: &mut Parser<'_>) {
    let Some(lhs) = expr(p) else { return };

    if p.at(EQ) {
        let m = lhs.precede(p);
        p.advance();
        expr_continued(p);
        m.complete(p, ASSIGN_STMT);
    } else {
        let m = lhs.precede(p);
        m.complete(p, EXPR_STMT);
    }
}
