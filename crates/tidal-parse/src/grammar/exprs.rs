use tidal_syntax::SyntaxKind::{self, *};
use tidal_syntax::{RIGHT_ASSOC_CLASS, SyntaxSet};

use super::{EXPR_RECOVERY, delimited};
use crate::parser::{CompletedMarker, Parser};

const LITERALS: SyntaxSet = SyntaxSet::new([INT_NUMBER, FLOAT_NUMBER, STRING, CHAR]);
const COMMA_SET: SyntaxSet = SyntaxSet::new([COMMA]);

/// A statement-level expression, including command calls (`echo a, b`).
///
/// Indentation opened inside the expression is closed here; a `SAME_INDENT`
/// after it is left for the statement list.
pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let outer_indent = std::mem::take(&mut p.expr_indent);
    let lhs = expr_with_layout(p);
    p.expr_indent = outer_indent;
    lhs
}

/// Like [`expr`], but the expression may start on an indented next line, as
/// after `=`.
pub(crate) fn expr_continued(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let outer_indent = std::mem::take(&mut p.expr_indent);
    p.eat_layout();
    let lhs = expr_with_layout(p);
    p.expr_indent = outer_indent;
    lhs
}

fn expr_with_layout(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = expr_bp(p, 0);
    if let Some(callee) = lhs
        && matches!(callee.kind(), NAME_REF | FIELD_EXPR)
        && at_command_arg(p)
    {
        lhs = Some(command(p, callee));
    }

    while p.expr_indent > 0 && p.at(DEDENT) {
        p.expr_indent -= 1;
        p.advance();
    }
    lhs
}

/// Type annotation: a name with optional postfix suffixes (`seq[int]`).
pub(crate) fn type_ref(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(NAME) || p.at(LEFT_PAREN) || p.at(LEFT_BRACKET) {
        postfix(p);
    } else {
        p.err_recover("a type", &EXPR_RECOVERY);
    }
    m.complete(p, TYPE);
}

/// Precedence climbing over the operator classes. Only the caret class is
/// right-associative.
fn expr_bp(p: &mut Parser<'_>, min_class: u8) -> Option<CompletedMarker> {
    let mut lhs = unary(p)?;

    loop {
        let Some(class) = p.current().operator_class() else { break };
        if class < min_class || p.unary_shaped() {
            break;
        }

        let m = lhs.precede(p);
        p.advance();
        p.eat_layout();

        let next_min = if class == RIGHT_ASSOC_CLASS { class } else { class + 1 };
        expr_bp(p, next_min);
        lhs = m.complete(p, BINARY_EXPR);
    }

    Some(lhs)
}

fn unary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.current() {
        OP2_SIGIL => Some(sigil(p)),
        kind if kind.is_operator() => {
            let m = p.start();
            p.advance();
            unary(p);
            Some(m.complete(p, PREFIX_EXPR))
        }
        _ => postfix(p),
    }
}

/// Sigil operators attach to a single primary, never to a prefix
/// expression, and may be separated from it by whitespace.
fn sigil(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    if p.at(NAME) || p.at(LEFT_BRACKET) || p.at_set(&LITERALS) {
        primary(p);
    } else {
        p.err_recover("an identifier or a literal", &EXPR_RECOVERY);
    }
    let sigil = m.complete(p, SIGIL_EXPR);
    postfix_suffixes(p, sigil)
}

fn postfix(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let lhs = primary(p)?;
    Some(postfix_suffixes(p, lhs))
}

fn postfix_suffixes(p: &mut Parser<'_>, mut lhs: CompletedMarker) -> CompletedMarker {
    loop {
        lhs = match p.current() {
            LEFT_PAREN if !p.has_whitespace_before() => {
                let m = lhs.precede(p);
                arg_list(p, LEFT_PAREN, RIGHT_PAREN);
                m.complete(p, CALL_EXPR)
            }
            LEFT_BRACKET if !p.has_whitespace_before() => {
                let m = lhs.precede(p);
                arg_list(p, LEFT_BRACKET, RIGHT_BRACKET);
                m.complete(p, INDEX_EXPR)
            }
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                if p.at(NAME) {
                    let field = p.start();
                    p.advance();
                    field.complete(p, FIELD_NAME);
                } else {
                    p.err_recover("a field name", &EXPR_RECOVERY);
                }
                m.complete(p, FIELD_EXPR)
            }
            _ => return lhs,
        };
    }
}

fn arg_list(p: &mut Parser<'_>, bra: SyntaxKind, ket: SyntaxKind) {
    let m = p.start();
    delimited(p, bra, ket, &COMMA_SET, |p| expr_bp(p, 0).is_some());
    m.complete(p, ARG_LIST);
}

fn primary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.current() {
        kind if LITERALS.contains(kind) => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, LITERAL))
        }
        NAME => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, NAME_REF))
        }
        LEFT_PAREN => {
            let m = p.start();
            delimited(p, LEFT_PAREN, RIGHT_PAREN, &COMMA_SET, |p| expr_bp(p, 0).is_some());
            Some(m.complete(p, PAREN_EXPR))
        }
        LEFT_BRACKET => {
            let m = p.start();
            delimited(p, LEFT_BRACKET, RIGHT_BRACKET, &COMMA_SET, |p| expr_bp(p, 0).is_some());
            Some(m.complete(p, ARRAY_EXPR))
        }
        _ => {
            p.err_recover("an expression", &EXPR_RECOVERY);
            None
        }
    }
}

/// Whether the current token can start the first argument of a command
/// call: it must be separated from the callee by whitespace.
fn at_command_arg(p: &Parser<'_>) -> bool {
    if !p.has_whitespace_before() {
        return false;
    }
    match p.current() {
        NAME | LEFT_PAREN | LEFT_BRACKET | OP2_SIGIL => true,
        kind if LITERALS.contains(kind) => true,
        kind if kind.is_operator() => p.unary_shaped(),
        _ => false,
    }
}

fn command(p: &mut Parser<'_>, callee: CompletedMarker) -> CompletedMarker {
    let m = callee.precede(p);
    let args = p.start();
    loop {
        if expr_bp(p, 0).is_none() {
            break;
        }
        if !p.eat(COMMA) {
            break;
        }
        p.eat_layout();
    }
    args.complete(p, ARG_LIST);
    m.complete(p, COMMAND_EXPR)
}
